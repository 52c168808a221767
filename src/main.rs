use validator_key_manager::{
    api::Server,
    config::Config,
    registry::{self, SqliteValidatorRepository},
    service::ValidatorService,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// The main entry point for the validator key manager.
///
/// Initializes logging, loads configuration (file first, then environment),
/// opens the database, makes sure the schema exists and serves the HTTP API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = Config::load("config/default.toml")?;
    config.apply_env_overrides()?;
    info!("Validator key manager starting with config: {:?}", config);

    let pool = registry::connect(&config.database).await?;
    registry::init_schema(&pool).await?;
    info!("Connected to database");

    let repo = Arc::new(SqliteValidatorRepository::new(pool.clone()));
    let service = ValidatorService::new(repo);

    let server = Server::new(config, service, pool);
    server.start().await?;

    Ok(())
}
