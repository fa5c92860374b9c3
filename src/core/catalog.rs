//! Bean service - the operations behind the admin and bean of the day endpoints.
//!
//! This layer turns store results into domain errors: a missing row becomes
//! [`Error::BeanNotFound`] or [`Error::BotdNotFound`], and zero affected rows surface as
//! [`Error::WriteFailed`] from the store.

use crate::{
    core::bean::{self as store, BeanFields},
    entities::bean,
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use tracing::info;

/// Lists every bean in the catalog.
pub async fn get_beans(db: &DatabaseConnection) -> Result<Vec<bean::Model>> {
    store::list_beans(db).await
}

/// Fetches one bean or fails with [`Error::BeanNotFound`].
pub async fn get_bean(db: &DatabaseConnection, id: &str) -> Result<bean::Model> {
    store::get_bean(db, id)
        .await?
        .ok_or_else(|| Error::BeanNotFound { id: id.to_string() })
}

/// Creates a bean and returns the stored row.
pub async fn create_bean(db: &DatabaseConnection, fields: BeanFields) -> Result<bean::Model> {
    let created = store::insert_bean(db, fields).await?;
    info!(id = %created.id, name = %created.name, "Bean created");
    Ok(created)
}

/// Replaces a bean's display fields.
pub async fn update_bean(db: &DatabaseConnection, id: &str, fields: BeanFields) -> Result<()> {
    store::update_bean(db, id, fields).await?;
    info!(id, "Bean updated");
    Ok(())
}

/// Deletes a bean.
pub async fn delete_bean(db: &DatabaseConnection, id: &str) -> Result<()> {
    store::delete_bean(db, id).await?;
    info!(id, "Bean deleted");
    Ok(())
}

/// Returns the current bean of the day or fails with [`Error::BotdNotFound`].
pub async fn get_botd(db: &DatabaseConnection) -> Result<bean::Model> {
    store::get_current_botd(db).await?.ok_or(Error::BotdNotFound)
}
