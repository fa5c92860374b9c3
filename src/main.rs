use all_the_beans::{
    api::{self, AppState},
    auth::JwtVerifier,
    config::{database, seed, settings},
    core::{bean, botd},
    errors::Result,
};
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load service settings
    let settings = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;

    // 4. Open the database and make sure the schema exists
    let db = database::create_connection(&database::get_database_url())
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed the catalog from the JSON feed, if present
    if let Some(records) = seed::load_seed_file(&settings.seed.path)? {
        let inserted = bean::seed_beans(&db, records)
            .await
            .inspect_err(|e| error!("Failed to seed beans: {}", e))?;
        info!("Seeded {} beans", inserted);
    }

    // 6. Token verification; routes requiring a token reject everything if unconfigured
    let verifier = Arc::new(JwtVerifier::from_env());

    // 7. Start the bean of the day rotation
    let rotation = botd::spawn_rotation_task(db.clone(), settings.botd_interval())?;

    // 8. Serve until shutdown
    let served = api::serve(&settings, AppState::new(db.clone(), verifier)).await;

    rotation.abort();
    if let Err(e) = db.close().await {
        error!("Failed to close database: {}", e);
    }
    info!("Shutdown complete");

    served
}
