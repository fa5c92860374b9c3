//! Public bean of the day endpoint.

use super::AppState;
use crate::{core::catalog, entities::BeanModel, errors::Result};
use axum::{Json, extract::State};

/// `GET /botd` - the current bean of the day, or 404 when none is selected.
pub async fn get_botd(State(state): State<AppState>) -> Result<Json<BeanModel>> {
    catalog::get_botd(&state.db).await.map(Json)
}
