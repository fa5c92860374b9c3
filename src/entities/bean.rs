//! Bean entity - Represents one coffee bean in the catalog.
//!
//! The JSON field names follow the catalog feed (`_id`, `Cost`, `Name`, ...) so the
//! seed file and the HTTP responses share one format.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Bean database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "beans")]
pub struct Model {
    /// Opaque identifier, assigned once and never changed
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(rename = "_id")]
    pub id: String,
    /// Display ordering (not unique)
    pub index: i64,
    /// Whether this bean is the current bean of the day
    #[serde(rename = "isBOTD")]
    pub is_botd: bool,
    /// Display-formatted cost (e.g. "$12.99")
    #[serde(rename = "Cost")]
    pub cost: String,
    /// Image URL
    #[serde(rename = "Image")]
    pub image: Option<String>,
    /// Roast colour (e.g. "dark roast")
    pub colour: Option<String>,
    /// Display name
    #[serde(rename = "Name")]
    pub name: String,
    /// Free-text tasting notes
    #[serde(rename = "Description")]
    pub description: Option<String>,
    /// Country of origin
    #[serde(rename = "Country")]
    pub country: Option<String>,
}

/// `Bean` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
