//! Test fixtures - account and catalog setup over the HTTP API

use anyhow::{Context, Result};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::helpers::TestServer;

/// A registered account with its access token
pub struct TestAccount {
    pub id: String,
    pub email: String,
    pub token: String,
}

/// Register a fresh account with a unique email
pub async fn register_account(server: &TestServer, role: &str) -> Result<TestAccount> {
    let email = format!("{role}-{}@example.com", Uuid::new_v4());
    let response = server
        .post(
            "/api/v1/auth/register",
            &json!({
                "name": format!("Test {role}"),
                "email": email,
                "password": "SecurePass1",
                "role": role,
            }),
            None,
        )
        .await?;

    anyhow::ensure!(
        response.status().as_u16() == 201,
        "registration failed: {}",
        response.text().await?
    );

    let body: Value = response.json().await?;
    Ok(TestAccount {
        id: body["data"]["account"]["id"]
            .as_str()
            .context("account id")?
            .to_string(),
        email,
        token: body["data"]["access_token"]
            .as_str()
            .context("access token")?
            .to_string(),
    })
}

/// Create a product through the seller API; returns its id
pub async fn create_product(
    server: &TestServer,
    seller: &TestAccount,
    price: i64,
    stock: i32,
) -> Result<String> {
    let response = server
        .post(
            "/api/v1/seller/products",
            &json!({
                "title": format!("Fixture Product {}", Uuid::new_v4()),
                "description": "A product created by the integration fixtures",
                "category": "Fixtures",
                "price": price.to_string(),
                "stock": stock,
                "images": ["http://localhost:5000/uploads/fixture.jpg"],
            }),
            Some(&seller.token),
        )
        .await?;

    anyhow::ensure!(
        response.status().as_u16() == 201,
        "product creation failed: {}",
        response.text().await?
    );

    let body: Value = response.json().await?;
    Ok(body["data"]["id"].as_str().context("product id")?.to_string())
}

/// Place an order for one product; returns its id
pub async fn place_order(
    server: &TestServer,
    buyer: &TestAccount,
    product_id: &str,
    quantity: i32,
) -> Result<(String, Value)> {
    let response = server
        .post(
            "/api/v1/orders",
            &json!({
                "items": [{"product_id": product_id, "quantity": quantity}],
                "shipping_address": "12 Integration Lane, Testville",
            }),
            Some(&buyer.token),
        )
        .await?;

    anyhow::ensure!(
        response.status().as_u16() == 201,
        "order creation failed: {}",
        response.text().await?
    );

    let body: Value = response.json().await?;
    let id = body["data"]["id"].as_str().context("order id")?.to_string();
    Ok((id, body["data"].clone()))
}
