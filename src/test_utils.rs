//! Shared test utilities for the catalog service.
//!
//! This module provides common helper functions for setting up test databases,
//! creating test beans with sensible defaults, and minting bearer tokens.

#![allow(clippy::expect_used)]

use crate::{
    auth::JwtSettings,
    core::bean::{self, BeanFields},
    entities::{self, Bean},
    errors::Result,
};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{Value, json};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = crate::config::database::create_connection("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Bean fields with sensible defaults.
///
/// # Defaults
/// * `cost`: "$10.00"
/// * `colour`: "medium roast"
/// * `country`: "Colombia"
pub fn bean_fields(name: &str) -> BeanFields {
    BeanFields {
        cost: "$10.00".to_string(),
        image: Some("https://example.com/bean.jpg".to_string()),
        colour: Some("medium roast".to_string()),
        name: name.to_string(),
        description: Some("A balanced cup with chocolate notes".to_string()),
        country: Some("Colombia".to_string()),
    }
}

/// Bean fields with the searchable columns and cost chosen by the test.
pub fn custom_bean_fields(name: &str, country: &str, colour: &str, cost: &str) -> BeanFields {
    BeanFields {
        cost: cost.to_string(),
        colour: Some(colour.to_string()),
        country: Some(country.to_string()),
        ..bean_fields(name)
    }
}

/// Inserts a test bean with default fields.
pub async fn create_test_bean(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::bean::Model> {
    bean::insert_bean(db, bean_fields(name)).await
}

/// Inserts a test bean with custom searchable fields.
pub async fn create_custom_bean(
    db: &DatabaseConnection,
    name: &str,
    country: &str,
    colour: &str,
    cost: &str,
) -> Result<entities::bean::Model> {
    bean::insert_bean(db, custom_bean_fields(name, country, colour, cost)).await
}

/// Counts beans currently flagged as bean of the day.
pub async fn count_botd(db: &DatabaseConnection) -> Result<u64> {
    Bean::find()
        .filter(entities::bean::Column::IsBotd.eq(true))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Token settings shared by the auth and HTTP tests.
pub fn test_jwt_settings() -> JwtSettings {
    JwtSettings {
        secret: "test-secret-key".to_string(),
        issuer: "test-issuer".to_string(),
        audience: "test-audience".to_string(),
    }
}

/// Claims matching `settings` that expire `seconds` from now (negative for the past).
pub fn claims_expiring_in(settings: &JwtSettings, seconds: i64, role: Option<&str>) -> Value {
    let now = Utc::now().timestamp();
    let mut claims = json!({
        "sub": "user",
        "iss": settings.issuer,
        "aud": settings.audience,
        "iat": now,
        "exp": now + seconds,
    });
    if let Some(role) = role {
        claims["role"] = json!(role);
    }
    claims
}

/// Signs `claims` with HS256 and `secret`.
pub fn mint_token(secret: &str, claims: &Value) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("test claims always encode")
}

/// A valid admin token for the test settings.
pub fn admin_token() -> String {
    let settings = test_jwt_settings();
    mint_token(&settings.secret, &claims_expiring_in(&settings, 3600, Some("admin")))
}

/// A valid token without the admin role for the test settings.
pub fn user_token() -> String {
    let settings = test_jwt_settings();
    mint_token(&settings.secret, &claims_expiring_in(&settings, 3600, None))
}
