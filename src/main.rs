use anyhow::{bail, Context};
use clap::Parser;
use cat_agency::adapters::{start_api_server, CatApiClient, PostgresStore};
use cat_agency::api::AppState;
use cat_agency::cli::{Cli, Commands};
use cat_agency::config::AppConfig;
use cat_agency::logging::init_logging;
use cat_agency::services::{AgentDirectory, MissionEngine};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config_dir, port } => {
            let mut config = load_config(&config_dir)?;
            if let Some(port) = port {
                config.server.port = port;
            }
            let _guard = init_logging(&config.logging);
            check_config(&config)?;
            serve(config).await
        }
        Commands::Migrate { config_dir } => {
            let config = load_config(&config_dir)?;
            let _guard = init_logging(&config.logging);
            check_config(&config)?;
            let store = connect(&config).await?;
            store.migrate().await.context("failed to apply migrations")?;
            Ok(())
        }
    }
}

fn load_config(config_dir: &str) -> anyhow::Result<AppConfig> {
    AppConfig::load_from(config_dir)
        .with_context(|| format!("failed to load configuration from {config_dir}"))
}

fn check_config(config: &AppConfig) -> anyhow::Result<()> {
    if let Err(errors) = config.validate() {
        for e in &errors {
            warn!("Invalid configuration: {}", e);
        }
        bail!("configuration has {} problem(s)", errors.len());
    }
    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<PostgresStore> {
    let db = &config.database;
    PostgresStore::new(&db.connection_url(), db.max_connections, db.connect_timeout())
        .await
        .context("failed to connect to PostgreSQL")
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let store = Arc::new(connect(&config).await?);
    if config.database.run_migrations {
        store.migrate().await.context("failed to apply migrations")?;
    }

    let mut agents = AgentDirectory::new(store.clone());
    let breed_api = &config.services.breed_api;
    if breed_api.enabled {
        info!("Breed validation enabled against {}", breed_api.base_url);
        let client = CatApiClient::from_config(breed_api)?;
        agents = agents
            .with_breed_validator(Arc::new(client))
            .with_validation_timeout(breed_api.timeout() + Duration::from_secs(1));
    } else {
        info!("Breed validation disabled");
    }
    let missions = MissionEngine::new(store, agents.clone());

    let state = AppState::new(agents, missions);
    start_api_server(state, &config.server).await?;
    Ok(())
}
