/// Database configuration and connection management
pub mod database;

/// Catalog seed data loading from the JSON feed
pub mod seed;

/// Service settings loading from config.toml and the environment
pub mod settings;
