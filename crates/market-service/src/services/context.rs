//! Service context - dependency container for services
//!
//! Holds every repository, the JWT service, the id generator, and the
//! notification dispatcher. All dependencies are constructed at startup
//! and injected; services never reach for ambient singletons.

use std::sync::Arc;

use market_common::auth::JwtService;
use market_core::{
    AccountRepository, CategoryRepository, OrderRepository, ProductRepository, ReviewRepository,
    Uid, UidGenerator,
};
use market_notify::{NotificationDispatcher, Notifier};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    account_repo: Arc<dyn AccountRepository>,
    product_repo: Arc<dyn ProductRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    order_repo: Arc<dyn OrderRepository>,
    review_repo: Arc<dyn ReviewRepository>,

    // Services
    jwt_service: Arc<JwtService>,
    uid_generator: Arc<UidGenerator>,

    // Notifications
    dispatcher: NotificationDispatcher,
    notifier: Arc<dyn Notifier>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_repo: Arc<dyn AccountRepository>,
        product_repo: Arc<dyn ProductRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        order_repo: Arc<dyn OrderRepository>,
        review_repo: Arc<dyn ReviewRepository>,
        jwt_service: Arc<JwtService>,
        uid_generator: Arc<UidGenerator>,
        dispatcher: NotificationDispatcher,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            account_repo,
            product_repo,
            category_repo,
            order_repo,
            review_repo,
            jwt_service,
            uid_generator,
            dispatcher,
            notifier,
        }
    }

    // === Repositories ===

    /// Get the account repository
    pub fn account_repo(&self) -> &dyn AccountRepository {
        self.account_repo.as_ref()
    }

    /// Get the product repository
    pub fn product_repo(&self) -> &dyn ProductRepository {
        self.product_repo.as_ref()
    }

    /// Get the category repository
    pub fn category_repo(&self) -> &dyn CategoryRepository {
        self.category_repo.as_ref()
    }

    /// Get the order repository
    pub fn order_repo(&self) -> &dyn OrderRepository {
        self.order_repo.as_ref()
    }

    /// Get the review repository
    pub fn review_repo(&self) -> &dyn ReviewRepository {
        self.review_repo.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Generate a new unique id
    pub fn generate_id(&self) -> Uid {
        self.uid_generator.generate()
    }

    // === Notifications ===

    /// Get the fire-and-forget notification dispatcher
    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    /// Get the notification client for the rare synchronous send
    /// (password-reset delivery, whose failure must surface)
    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    account_repo: Option<Arc<dyn AccountRepository>>,
    product_repo: Option<Arc<dyn ProductRepository>>,
    category_repo: Option<Arc<dyn CategoryRepository>>,
    order_repo: Option<Arc<dyn OrderRepository>>,
    review_repo: Option<Arc<dyn ReviewRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    uid_generator: Option<Arc<UidGenerator>>,
    dispatcher: Option<NotificationDispatcher>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_repo(mut self, repo: Arc<dyn AccountRepository>) -> Self {
        self.account_repo = Some(repo);
        self
    }

    pub fn product_repo(mut self, repo: Arc<dyn ProductRepository>) -> Self {
        self.product_repo = Some(repo);
        self
    }

    pub fn category_repo(mut self, repo: Arc<dyn CategoryRepository>) -> Self {
        self.category_repo = Some(repo);
        self
    }

    pub fn order_repo(mut self, repo: Arc<dyn OrderRepository>) -> Self {
        self.order_repo = Some(repo);
        self
    }

    pub fn review_repo(mut self, repo: Arc<dyn ReviewRepository>) -> Self {
        self.review_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn uid_generator(mut self, generator: Arc<UidGenerator>) -> Self {
        self.uid_generator = Some(generator);
        self
    }

    pub fn dispatcher(mut self, dispatcher: NotificationDispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        Ok(ServiceContext::new(
            self.account_repo
                .ok_or_else(|| ServiceError::validation("account_repo is required"))?,
            self.product_repo
                .ok_or_else(|| ServiceError::validation("product_repo is required"))?,
            self.category_repo
                .ok_or_else(|| ServiceError::validation("category_repo is required"))?,
            self.order_repo
                .ok_or_else(|| ServiceError::validation("order_repo is required"))?,
            self.review_repo
                .ok_or_else(|| ServiceError::validation("review_repo is required"))?,
            self.jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            self.uid_generator
                .ok_or_else(|| ServiceError::validation("uid_generator is required"))?,
            self.dispatcher
                .ok_or_else(|| ServiceError::validation("dispatcher is required"))?,
            self.notifier
                .ok_or_else(|| ServiceError::validation("notifier is required"))?,
        ))
    }
}
