//! Core business logic - framework-agnostic catalog, search and rotation operations.
//!
//! Every function takes an explicitly constructed `SeaORM` connection (or transaction)
//! and returns [`crate::errors::Result`].

/// Bean store - typed reads and writes over the `beans` table
pub mod bean;
/// Bean of the day rotation cycle and its ticker task
pub mod botd;
/// Bean service - store results translated into domain errors
pub mod catalog;
/// Search criteria allow-list and request validation
pub mod search;
