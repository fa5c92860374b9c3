//! Search endpoints. Both the query-string and JSON-body forms require a valid token.

use super::{
    AppState,
    auth::Authenticated,
    error::{json_body, query_params},
};
use crate::{
    core::search::{self, SearchQuery},
    entities::BeanModel,
    errors::Result,
};
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};

/// `GET /search?criteria=...&value=...`
pub async fn search_by_query(
    Authenticated(_claims): Authenticated,
    State(state): State<AppState>,
    params: std::result::Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<BeanModel>>> {
    let query = query_params(params)?;
    search::search(&state.db, &query).await.map(Json)
}

/// `POST /search` with body `{"criteria": ..., "value": ...}`
pub async fn search_by_body(
    Authenticated(_claims): Authenticated,
    State(state): State<AppState>,
    payload: std::result::Result<Json<SearchQuery>, JsonRejection>,
) -> Result<Json<Vec<BeanModel>>> {
    let query = json_body(payload)?;
    search::search(&state.db, &query).await.map(Json)
}
