//! Bean store - Handles all reads and writes against the `beans` table.
//!
//! Writes report the number of affected rows and treat zero as a failure instead of a
//! silent success. Moving the bean of the day flag and loading seed data are the only
//! multi-statement writes; both run inside a single database transaction.

use crate::{
    config::seed::SeedBean,
    core::search::SearchCriteria,
    entities::{Bean, bean},
    errors::{Error, Result, WriteOperation},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Display fields supplied by an admin insert or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanFields {
    /// Display-formatted cost
    pub cost: String,
    /// Image URL
    pub image: Option<String>,
    /// Roast colour
    pub colour: Option<String>,
    /// Display name
    pub name: String,
    /// Tasting notes
    pub description: Option<String>,
    /// Country of origin
    pub country: Option<String>,
}

/// Retrieves every bean, ordered by display index.
pub async fn list_beans<C>(db: &C) -> Result<Vec<bean::Model>>
where
    C: ConnectionTrait,
{
    Bean::find()
        .order_by_asc(bean::Column::Index)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a bean by id, returning None if it does not exist.
pub async fn get_bean<C>(db: &C, id: &str) -> Result<Option<bean::Model>>
where
    C: ConnectionTrait,
{
    Bean::find_by_id(id.to_owned())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Next free display index: one past the current maximum, or zero for an empty store.
async fn next_index<C>(db: &C) -> Result<i64>
where
    C: ConnectionTrait,
{
    let last = Bean::find()
        .order_by_desc(bean::Column::Index)
        .one(db)
        .await?;
    Ok(last.map_or(0, |bean| bean.index + 1))
}

/// Inserts a new bean with a fresh id and returns the stored row.
///
/// New beans are never the bean of the day; the rotation task decides that.
pub async fn insert_bean<C>(db: &C, fields: BeanFields) -> Result<bean::Model>
where
    C: ConnectionTrait,
{
    let id = Uuid::new_v4().simple().to_string();
    let index = next_index(db).await?;

    let model = bean::ActiveModel {
        id: Set(id.clone()),
        index: Set(index),
        is_botd: Set(false),
        cost: Set(fields.cost),
        image: Set(fields.image),
        colour: Set(fields.colour),
        name: Set(fields.name),
        description: Set(fields.description),
        country: Set(fields.country),
    };

    let inserted = Bean::insert(model).exec_without_returning(db).await?;
    if inserted == 0 {
        return Err(Error::write_failed(WriteOperation::Insert, id));
    }

    match get_bean(db, &id).await? {
        Some(stored) => Ok(stored),
        None => Err(Error::write_failed(WriteOperation::Insert, id)),
    }
}

/// Replaces the display fields of an existing bean.
///
/// The id, index and bean of the day flag are left untouched. Returns the number of
/// rows changed; zero is reported as [`Error::WriteFailed`].
pub async fn update_bean<C>(db: &C, id: &str, fields: BeanFields) -> Result<u64>
where
    C: ConnectionTrait,
{
    let changes = bean::ActiveModel {
        cost: Set(fields.cost),
        image: Set(fields.image),
        colour: Set(fields.colour),
        name: Set(fields.name),
        description: Set(fields.description),
        country: Set(fields.country),
        ..Default::default()
    };

    let result = Bean::update_many()
        .set(changes)
        .filter(bean::Column::Id.eq(id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::write_failed(WriteOperation::Update, id));
    }
    Ok(result.rows_affected)
}

/// Deletes a bean. Returns the number of rows removed; zero is reported as
/// [`Error::WriteFailed`].
pub async fn delete_bean<C>(db: &C, id: &str) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = Bean::delete_by_id(id.to_owned()).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::write_failed(WriteOperation::Delete, id));
    }
    Ok(result.rows_affected)
}

/// Returns the bean currently flagged as bean of the day, if any.
pub async fn get_current_botd<C>(db: &C) -> Result<Option<bean::Model>>
where
    C: ConnectionTrait,
{
    Bean::find()
        .filter(bean::Column::IsBotd.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Picks one random bean whose id differs from `exclude`.
///
/// With `exclude = None` any bean may be picked. Returns None when no other bean exists.
pub async fn pick_random_other_than<C>(db: &C, exclude: Option<&str>) -> Result<Option<bean::Model>>
where
    C: ConnectionTrait,
{
    let mut query = Bean::find();
    if let Some(id) = exclude {
        query = query.filter(bean::Column::Id.ne(id));
    }

    query
        .order_by_asc(Expr::cust("RANDOM()"))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Moves the bean of the day flag to `id`.
///
/// Clearing every flag and setting the new one run in one transaction, so readers never
/// observe zero or two flagged beans. If `id` does not exist the transaction is rolled
/// back, the previous bean of the day stays flagged, and [`Error::WriteFailed`] is returned.
#[instrument(skip(db))]
pub async fn set_botd(db: &DatabaseConnection, id: &str) -> Result<()> {
    let txn = db.begin().await?;

    let cleared = Bean::update_many()
        .col_expr(bean::Column::IsBotd, Expr::value(false))
        .filter(bean::Column::IsBotd.eq(true))
        .exec(&txn)
        .await?;

    let flagged = Bean::update_many()
        .col_expr(bean::Column::IsBotd, Expr::value(true))
        .filter(bean::Column::Id.eq(id))
        .exec(&txn)
        .await?;

    if flagged.rows_affected == 0 {
        txn.rollback().await?;
        return Err(Error::write_failed(WriteOperation::SetBotd, id));
    }

    txn.commit().await?;
    debug!(cleared = cleared.rows_affected, "Bean of the day flag moved");
    Ok(())
}

/// Finds beans whose `criteria` column contains `value` (SQL `LIKE '%value%'`).
///
/// The column always comes from the [`SearchCriteria`] allow-list, never from caller text.
/// `SQLite` matches ASCII letters case-insensitively.
pub async fn search_beans<C>(
    db: &C,
    criteria: SearchCriteria,
    value: &str,
) -> Result<Vec<bean::Model>>
where
    C: ConnectionTrait,
{
    Bean::find()
        .filter(criteria.column().contains(value))
        .order_by_asc(bean::Column::Index)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Loads seed records in one transaction, skipping ids that already exist.
///
/// A record flagged as bean of the day keeps its flag only while no other bean holds it,
/// so seeding never breaks the single-flag invariant. Returns how many beans were inserted.
#[instrument(skip(db, records), fields(records = records.len()))]
pub async fn seed_beans(db: &DatabaseConnection, records: Vec<SeedBean>) -> Result<usize> {
    let txn = db.begin().await?;
    let mut botd_taken = get_current_botd(&txn).await?.is_some();
    let mut inserted = 0;

    for record in records {
        if get_bean(&txn, &record.id).await?.is_some() {
            debug!(id = %record.id, "Bean already present, skipping");
            continue;
        }

        let is_botd = record.is_botd && !botd_taken;
        if record.is_botd && !is_botd {
            warn!(id = %record.id, "Seed record flagged as bean of the day, but one is already set");
        }
        botd_taken |= is_botd;

        let model = bean::ActiveModel {
            id: Set(record.id),
            index: Set(record.index),
            is_botd: Set(is_botd),
            cost: Set(record.cost),
            image: Set(record.image),
            colour: Set(record.colour),
            name: Set(record.name),
            description: Set(record.description),
            country: Set(record.country),
        };
        Bean::insert(model).exec_without_returning(&txn).await?;
        inserted += 1;
    }

    txn.commit().await?;
    info!(inserted, "Catalog seed applied");
    Ok(inserted)
}
