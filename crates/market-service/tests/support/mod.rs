//! In-memory repository implementations and a test harness for
//! service-level behavior tests.
//!
//! The in-memory order store mirrors the real store's transactional
//! contract: stock checks and decrements happen under one lock, so either
//! every line item is applied or none are.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use market_common::auth::JwtService;
use market_core::{
    Account, AccountRepository, Category, CategoryRepository, DomainError, Order,
    OrderRepository, OrderStatus, Page, Product, ProductFilter, ProductRepository, RepoResult,
    RevenueStats, Review, ReviewRepository, Role, StatusCount, TopProduct, Uid, UidGenerator,
};
use market_notify::{EmailMessage, NotificationDispatcher, Notifier, NotifyError};
use market_service::{ServiceContext, ServiceContextBuilder};
use rust_decimal::Decimal;

pub type SharedProducts = Arc<Mutex<HashMap<i64, Product>>>;
pub type SentMessages = Arc<Mutex<Vec<EmailMessage>>>;

// ============================================================================
// Accounts
// ============================================================================

#[derive(Default)]
pub struct MemAccountRepository {
    accounts: Mutex<HashMap<i64, Account>>,
    hashes: Mutex<HashMap<i64, String>>,
}

#[async_trait]
impl AccountRepository for MemAccountRepository {
    async fn find_by_id(&self, id: Uid) -> RepoResult<Option<Account>> {
        Ok(self.accounts.lock().unwrap().get(&id.into_inner()).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .any(|a| a.email == email))
    }

    async fn create(&self, account: &Account, password_hash: &str) -> RepoResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.values().any(|a| a.email == account.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        accounts.insert(account.id.into_inner(), account.clone());
        self.hashes
            .lock()
            .unwrap()
            .insert(account.id.into_inner(), password_hash.to_string());
        Ok(())
    }

    async fn update(&self, account: &Account) -> RepoResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.get_mut(&account.id.into_inner()) {
            Some(existing) => {
                existing.name.clone_from(&account.name);
                existing.phone.clone_from(&account.phone);
                existing.address.clone_from(&account.address);
                Ok(())
            }
            None => Err(DomainError::AccountNotFound(account.id)),
        }
    }

    async fn set_banned(&self, id: Uid, banned: bool) -> RepoResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.get_mut(&id.into_inner()) {
            Some(account) => {
                account.banned = banned;
                Ok(())
            }
            None => Err(DomainError::AccountNotFound(id)),
        }
    }

    async fn get_password_hash(&self, id: Uid) -> RepoResult<Option<String>> {
        Ok(self.hashes.lock().unwrap().get(&id.into_inner()).cloned())
    }

    async fn update_password(&self, id: Uid, password_hash: &str) -> RepoResult<()> {
        self.hashes
            .lock()
            .unwrap()
            .insert(id.into_inner(), password_hash.to_string());
        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: Uid,
        token_digest: &str,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.get_mut(&id.into_inner()) {
            Some(account) => {
                account.password_reset_token = Some(token_digest.to_string());
                account.password_reset_expires = Some(expires_at);
                Ok(())
            }
            None => Err(DomainError::AccountNotFound(id)),
        }
    }

    async fn find_by_reset_token(&self, token_digest: &str) -> RepoResult<Option<Account>> {
        let now = Utc::now();
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| {
                a.password_reset_token.as_deref() == Some(token_digest)
                    && a.password_reset_expires.is_some_and(|exp| exp > now)
            })
            .cloned())
    }

    async fn clear_reset_token(&self, id: Uid) -> RepoResult<()> {
        if let Some(account) = self.accounts.lock().unwrap().get_mut(&id.into_inner()) {
            account.password_reset_token = None;
            account.password_reset_expires = None;
        }
        Ok(())
    }

    async fn list(&self, role: Option<Role>, page: Page) -> RepoResult<(Vec<Account>, i64)> {
        let accounts = self.accounts.lock().unwrap();
        let mut matching: Vec<Account> = accounts
            .values()
            .filter(|a| role.is_none_or(|r| a.role == r))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn count(&self, role: Option<Role>) -> RepoResult<i64> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .filter(|a| role.is_none_or(|r| a.role == r))
            .count() as i64)
    }
}

// ============================================================================
// Products
// ============================================================================

pub struct MemProductRepository {
    products: SharedProducts,
}

impl MemProductRepository {
    pub fn new(products: SharedProducts) -> Self {
        Self { products }
    }
}

#[async_trait]
impl ProductRepository for MemProductRepository {
    async fn find_by_id(&self, id: Uid) -> RepoResult<Option<Product>> {
        Ok(self.products.lock().unwrap().get(&id.into_inner()).cloned())
    }

    async fn create(&self, product: &Product) -> RepoResult<()> {
        self.products
            .lock()
            .unwrap()
            .insert(product.id.into_inner(), product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> RepoResult<()> {
        let mut products = self.products.lock().unwrap();
        if !products.contains_key(&product.id.into_inner()) {
            return Err(DomainError::ProductNotFound(product.id));
        }
        products.insert(product.id.into_inner(), product.clone());
        Ok(())
    }

    async fn delete(&self, id: Uid) -> RepoResult<()> {
        self.products
            .lock()
            .unwrap()
            .remove(&id.into_inner())
            .map(|_| ())
            .ok_or(DomainError::ProductNotFound(id))
    }

    async fn list_active(
        &self,
        filter: &ProductFilter,
        page: Page,
    ) -> RepoResult<(Vec<Product>, i64)> {
        let products = self.products.lock().unwrap();
        let mut matching: Vec<Product> = products
            .values()
            .filter(|p| p.active)
            .filter(|p| filter.category.as_ref().is_none_or(|c| &p.category == c))
            .filter(|p| filter.min_price.is_none_or(|min| p.price >= min))
            .filter(|p| filter.max_price.is_none_or(|max| p.price <= max))
            .filter(|p| filter.tag.as_ref().is_none_or(|t| p.tags.contains(t)))
            .filter(|p| filter.featured.is_none_or(|f| p.featured == f))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn search(&self, query: &str, page: Page) -> RepoResult<(Vec<Product>, i64)> {
        let needle = query.to_lowercase();
        let products = self.products.lock().unwrap();
        let mut matching: Vec<Product> = products
            .values()
            .filter(|p| p.active)
            .filter(|p| {
                p.title.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn list_by_seller(
        &self,
        seller_id: Uid,
        active: Option<bool>,
        page: Page,
    ) -> RepoResult<(Vec<Product>, i64)> {
        let products = self.products.lock().unwrap();
        let mut matching: Vec<Product> = products
            .values()
            .filter(|p| p.seller_id == seller_id)
            .filter(|p| active.is_none_or(|a| p.active == a))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn count_by_seller(&self, seller_id: Uid, active: Option<bool>) -> RepoResult<i64> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.seller_id == seller_id)
            .filter(|p| active.is_none_or(|a| p.active == a))
            .count() as i64)
    }

    async fn count_by_category_name(&self, category_name: &str) -> RepoResult<i64> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.category == category_name)
            .count() as i64)
    }

    async fn count(&self) -> RepoResult<i64> {
        Ok(self.products.lock().unwrap().len() as i64)
    }
}

// ============================================================================
// Categories
// ============================================================================

#[derive(Default)]
pub struct MemCategoryRepository {
    categories: Mutex<HashMap<i64, Category>>,
}

#[async_trait]
impl CategoryRepository for MemCategoryRepository {
    async fn find_by_id(&self, id: Uid) -> RepoResult<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .get(&id.into_inner())
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .values()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn slug_exists(&self, slug: &str) -> RepoResult<bool> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .values()
            .any(|c| c.slug == slug))
    }

    async fn create(&self, category: &Category) -> RepoResult<()> {
        let mut categories = self.categories.lock().unwrap();
        if categories
            .values()
            .any(|c| c.name.eq_ignore_ascii_case(&category.name))
        {
            return Err(DomainError::CategoryNameExists);
        }
        if categories.values().any(|c| c.slug == category.slug) {
            return Err(DomainError::SlugExists);
        }
        categories.insert(category.id.into_inner(), category.clone());
        Ok(())
    }

    async fn update(&self, category: &Category) -> RepoResult<()> {
        let mut categories = self.categories.lock().unwrap();
        if !categories.contains_key(&category.id.into_inner()) {
            return Err(DomainError::CategoryNotFound(category.id));
        }
        if categories
            .values()
            .any(|c| c.id != category.id && c.slug == category.slug)
        {
            return Err(DomainError::SlugExists);
        }
        categories.insert(category.id.into_inner(), category.clone());
        Ok(())
    }

    async fn delete(&self, id: Uid) -> RepoResult<()> {
        self.categories
            .lock()
            .unwrap()
            .remove(&id.into_inner())
            .map(|_| ())
            .ok_or(DomainError::CategoryNotFound(id))
    }

    async fn list(&self, active: Option<bool>) -> RepoResult<Vec<Category>> {
        let categories = self.categories.lock().unwrap();
        let mut matching: Vec<Category> = categories
            .values()
            .filter(|c| active.is_none_or(|a| c.active == a))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matching)
    }

    async fn list_by_owner(
        &self,
        owner_id: Uid,
        active: Option<bool>,
    ) -> RepoResult<Vec<Category>> {
        let categories = self.categories.lock().unwrap();
        let mut matching: Vec<Category> = categories
            .values()
            .filter(|c| c.owner_id == owner_id)
            .filter(|c| active.is_none_or(|a| c.active == a))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matching)
    }
}

// ============================================================================
// Orders
// ============================================================================

pub struct MemOrderRepository {
    products: SharedProducts,
    orders: Mutex<HashMap<i64, Order>>,
}

impl MemOrderRepository {
    pub fn new(products: SharedProducts) -> Self {
        Self {
            products,
            orders: Mutex::new(HashMap::new()),
        }
    }

    fn filtered(
        &self,
        predicate: impl Fn(&Order) -> bool,
        status: Option<OrderStatus>,
    ) -> Vec<Order> {
        let orders = self.orders.lock().unwrap();
        let mut matching: Vec<Order> = orders
            .values()
            .filter(|o| predicate(o))
            .filter(|o| status.is_none_or(|s| o.status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }
}

#[async_trait]
impl OrderRepository for MemOrderRepository {
    async fn create(&self, order: &Order) -> RepoResult<()> {
        // One lock over products and orders: the check-and-decrement is
        // atomic and all-or-nothing, like the SQL transaction it stands for.
        let mut products = self.products.lock().unwrap();
        let mut orders = self.orders.lock().unwrap();

        if orders
            .values()
            .any(|o| o.order_number == order.order_number)
        {
            return Err(DomainError::OrderNumberExists);
        }

        for item in &order.items {
            let product = products
                .get(&item.product_id.into_inner())
                .ok_or(DomainError::ProductNotFound(item.product_id))?;
            if product.stock < item.quantity {
                return Err(DomainError::InsufficientStock(item.product_id.to_string()));
            }
        }

        for item in &order.items {
            if let Some(product) = products.get_mut(&item.product_id.into_inner()) {
                product.stock -= item.quantity;
            }
        }

        orders.insert(order.id.into_inner(), order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uid) -> RepoResult<Option<Order>> {
        Ok(self.orders.lock().unwrap().get(&id.into_inner()).cloned())
    }

    async fn update_status(&self, id: Uid, status: OrderStatus) -> RepoResult<()> {
        let mut orders = self.orders.lock().unwrap();
        match orders.get_mut(&id.into_inner()) {
            Some(order) => {
                order.status = status;
                order.updated_at = Utc::now();
                Ok(())
            }
            None => Err(DomainError::OrderNotFound(id)),
        }
    }

    async fn list_by_buyer(
        &self,
        buyer_id: Uid,
        status: Option<OrderStatus>,
        page: Page,
    ) -> RepoResult<(Vec<Order>, i64)> {
        let matching = self.filtered(|o| o.buyer_id == buyer_id, status);
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn list_by_seller(
        &self,
        seller_id: Uid,
        status: Option<OrderStatus>,
        page: Page,
    ) -> RepoResult<(Vec<Order>, i64)> {
        let matching = self.filtered(|o| o.seller_id == seller_id, status);
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn count(&self, seller_id: Option<Uid>) -> RepoResult<i64> {
        Ok(self
            .filtered(|o| seller_id.is_none_or(|s| o.seller_id == s), None)
            .len() as i64)
    }

    async fn status_breakdown(&self, seller_id: Option<Uid>) -> RepoResult<Vec<StatusCount>> {
        let matching = self.filtered(|o| seller_id.is_none_or(|s| o.seller_id == s), None);
        let mut grouped: HashMap<OrderStatus, (i64, Decimal)> = HashMap::new();
        for order in matching {
            let entry = grouped.entry(order.status).or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += order.total_amount;
        }
        Ok(grouped
            .into_iter()
            .map(|(status, (count, total_amount))| StatusCount {
                status,
                count,
                total_amount,
            })
            .collect())
    }

    async fn revenue_stats(&self, seller_id: Option<Uid>) -> RepoResult<RevenueStats> {
        let completed = self.filtered(
            |o| seller_id.is_none_or(|s| o.seller_id == s),
            Some(OrderStatus::Completed),
        );
        let completed_orders = completed.len() as i64;
        let total_revenue: Decimal = completed.iter().map(|o| o.total_amount).sum();
        let average_order_value = if completed_orders > 0 {
            total_revenue / Decimal::from(completed_orders)
        } else {
            Decimal::ZERO
        };
        Ok(RevenueStats {
            total_revenue,
            average_order_value,
            completed_orders,
        })
    }

    async fn top_products(
        &self,
        seller_id: Option<Uid>,
        limit: i64,
    ) -> RepoResult<Vec<TopProduct>> {
        let matching = self.filtered(|o| seller_id.is_none_or(|s| o.seller_id == s), None);
        let products = self.products.lock().unwrap();
        let mut grouped: HashMap<Uid, (i64, Decimal)> = HashMap::new();
        for order in &matching {
            for item in &order.items {
                let entry = grouped.entry(item.product_id).or_insert((0, Decimal::ZERO));
                entry.0 += i64::from(item.quantity);
                entry.1 += item.line_total();
            }
        }
        let mut top: Vec<TopProduct> = grouped
            .into_iter()
            .map(|(product_id, (quantity_sold, revenue))| {
                let product = products.get(&product_id.into_inner());
                TopProduct {
                    product_id,
                    title: product
                        .map_or_else(|| "(deleted product)".to_string(), |p| p.title.clone()),
                    image: product.and_then(|p| p.images.first().cloned()),
                    quantity_sold,
                    revenue,
                }
            })
            .collect();
        top.sort_by(|a, b| b.quantity_sold.cmp(&a.quantity_sold));
        top.truncate(limit as usize);
        Ok(top)
    }

    async fn recent(&self, seller_id: Option<Uid>, limit: i64) -> RepoResult<Vec<Order>> {
        let mut matching = self.filtered(|o| seller_id.is_none_or(|s| o.seller_id == s), None);
        matching.truncate(limit as usize);
        Ok(matching)
    }
}

// ============================================================================
// Reviews
// ============================================================================

#[derive(Default)]
pub struct MemReviewRepository {
    reviews: Mutex<HashMap<i64, Review>>,
}

#[async_trait]
impl ReviewRepository for MemReviewRepository {
    async fn create(&self, review: &Review) -> RepoResult<()> {
        let mut reviews = self.reviews.lock().unwrap();
        if reviews.values().any(|r| r.order_id == review.order_id) {
            return Err(DomainError::ReviewAlreadyExists);
        }
        reviews.insert(review.id.into_inner(), review.clone());
        Ok(())
    }

    async fn find_by_order(&self, order_id: Uid) -> RepoResult<Option<Review>> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .values()
            .find(|r| r.order_id == order_id)
            .cloned())
    }

    async fn list_by_product(&self, product_id: Uid) -> RepoResult<Vec<Review>> {
        let reviews = self.reviews.lock().unwrap();
        let mut matching: Vec<Review> = reviews
            .values()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }
}

// ============================================================================
// Notifier
// ============================================================================

/// Notifier that records every message and can be switched into failure
/// mode to simulate an unreachable notification service.
pub struct RecordingNotifier {
    pub sent: SentMessages,
    pub fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn new(sent: SentMessages) -> Self {
        Self {
            sent,
            fail: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(message.clone());
        if self.fail.load(Ordering::SeqCst) {
            Err(NotifyError::Transport("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// Harness
// ============================================================================

/// Everything a behavior test needs
pub struct TestHarness {
    pub ctx: ServiceContext,
    pub products: SharedProducts,
    pub sent: SentMessages,
    pub notifier: Arc<RecordingNotifier>,
    ids: Arc<UidGenerator>,
}

impl TestHarness {
    pub fn new() -> Self {
        let products: SharedProducts = Arc::new(Mutex::new(HashMap::new()));
        let sent: SentMessages = Arc::new(Mutex::new(Vec::new()));
        let notifier = Arc::new(RecordingNotifier::new(Arc::clone(&sent)));

        let dispatcher = NotificationDispatcher::spawn(
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            "no-reply@market.test",
            64,
            4,
            Duration::from_secs(1),
        );

        let ids = Arc::new(UidGenerator::new(0));

        let ctx = ServiceContextBuilder::new()
            .account_repo(Arc::new(MemAccountRepository::default()))
            .product_repo(Arc::new(MemProductRepository::new(Arc::clone(&products))))
            .category_repo(Arc::new(MemCategoryRepository::default()))
            .order_repo(Arc::new(MemOrderRepository::new(Arc::clone(&products))))
            .review_repo(Arc::new(MemReviewRepository::default()))
            .jwt_service(Arc::new(JwtService::new("test-secret-long-enough", 900, 604_800)))
            .uid_generator(Arc::clone(&ids))
            .dispatcher(dispatcher)
            .notifier(Arc::clone(&notifier) as Arc<dyn Notifier>)
            .build()
            .expect("test context");

        Self {
            ctx,
            products,
            sent,
            notifier,
            ids,
        }
    }

    pub fn next_id(&self) -> Uid {
        self.ids.generate()
    }

    /// Seed an account directly into the store
    pub async fn seed_account(&self, role: Role) -> Account {
        let id = self.next_id();
        let account = Account::new(
            id,
            format!("Account {}", id.into_inner()),
            format!("account-{}@example.com", id.into_inner()),
            role,
        );
        self.ctx
            .account_repo()
            .create(&account, "$argon2id$seeded")
            .await
            .unwrap();
        account
    }

    /// Seed a product directly into the store
    pub async fn seed_product(&self, seller_id: Uid, price: i64, stock: i32) -> Product {
        let id = self.next_id();
        let mut product = Product::new(
            id,
            seller_id,
            format!("Product {}", id.into_inner()),
            "A seeded product for testing".to_string(),
            "Testing".to_string(),
            Decimal::from(price),
            stock,
        );
        product.images = vec!["http://localhost:5000/uploads/seed.jpg".to_string()];
        self.ctx.product_repo().create(&product).await.unwrap();
        product
    }

    /// Wait for the dispatcher to drain (notification side effects are
    /// asynchronous)
    pub async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(150)).await;
    }

    /// Current stock of a product
    pub fn stock_of(&self, id: Uid) -> i32 {
        self.products
            .lock()
            .unwrap()
            .get(&id.into_inner())
            .map(|p| p.stock)
            .unwrap_or(-1)
    }

    /// Number of sent notifications whose subject contains the fragment
    pub fn sent_matching(&self, fragment: &str) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.subject.contains(fragment) || m.body.contains(fragment))
            .count()
    }
}
