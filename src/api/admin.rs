//! Admin bean endpoints - list, fetch, create, update and delete.
//!
//! Every handler requires a token with the admin role. Bodies are validated here, at the
//! request boundary, before anything reaches the service layer.

use super::{
    AppState,
    auth::Admin,
    error::{MessageResponse, json_body},
};
use crate::{
    core::{bean::BeanFields, catalog},
    entities::BeanModel,
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

/// Body of `POST /admin/bean` and `PUT /admin/bean/:id`.
///
/// Accepts both lowercase names and the capitalised catalog feed names.
#[derive(Debug, Default, Deserialize)]
pub struct BeanRequest {
    /// Display-formatted cost
    #[serde(alias = "Cost")]
    pub cost: Option<String>,
    /// Image URL
    #[serde(alias = "Image")]
    pub image: Option<String>,
    /// Roast colour
    pub colour: Option<String>,
    /// Display name
    #[serde(alias = "Name")]
    pub name: Option<String>,
    /// Tasting notes
    #[serde(alias = "Description")]
    pub description: Option<String>,
    /// Country of origin
    #[serde(alias = "Country")]
    pub country: Option<String>,
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::validation(format!("{field} must be a non-empty string"))),
    }
}

impl BeanRequest {
    /// Checks that every field is present and non-blank.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] naming the first missing field.
    pub fn validate(self) -> Result<BeanFields> {
        Ok(BeanFields {
            cost: required(self.cost, "cost")?,
            image: Some(required(self.image, "image")?),
            colour: Some(required(self.colour, "colour")?),
            name: required(self.name, "name")?,
            description: Some(required(self.description, "description")?),
            country: Some(required(self.country, "country")?),
        })
    }
}

/// Response of `POST /admin/bean`.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    /// Outcome message
    pub message: &'static str,
    /// The stored bean, including its assigned id
    pub bean: BeanModel,
}

/// `GET /admin/bean`
pub async fn list_beans(
    Admin(_claims): Admin,
    State(state): State<AppState>,
) -> Result<Json<Vec<BeanModel>>> {
    catalog::get_beans(&state.db).await.map(Json)
}

/// `GET /admin/bean/:id`
pub async fn get_bean(
    Admin(_claims): Admin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BeanModel>> {
    catalog::get_bean(&state.db, &id).await.map(Json)
}

/// `POST /admin/bean`
pub async fn create_bean(
    Admin(_claims): Admin,
    State(state): State<AppState>,
    payload: std::result::Result<Json<BeanRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let fields = json_body(payload)?.validate()?;
    let bean = catalog::create_bean(&state.db, fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Bean created successfully",
            bean,
        }),
    ))
}

/// `PUT /admin/bean/:id`
pub async fn update_bean(
    Admin(_claims): Admin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<BeanRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let fields = json_body(payload)?.validate()?;
    catalog::update_bean(&state.db, &id, fields).await?;
    Ok(Json(MessageResponse::new("Bean updated successfully")))
}

/// `DELETE /admin/bean/:id`
pub async fn delete_bean(
    Admin(_claims): Admin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    catalog::delete_bean(&state.db, &id).await?;
    Ok(Json(MessageResponse::new("Bean deleted successfully")))
}
