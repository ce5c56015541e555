use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hsn_navigator::config_manager::Config;
use hsn_navigator::routes;
use hsn_navigator::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hsn_navigator=debug,tower_http=debug")),
        )
        .init();

    // Load configuration - try multiple paths
    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.json".to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut config = match Config::load_first(&config_paths) {
        Some((config, path)) => {
            info!("Loaded configuration from: {}", path);
            config
        }
        None => {
            warn!("No config file found (tried {:?}), using defaults", config_paths);
            Config::default()
        }
    };
    config.llm_config = config.llm_config.with_env_credentials();

    let app_state = AppState::new(config.clone())?;
    if !app_state.model_info.credential_configured {
        warn!("No API key configured; every turn will fall back to canned replies");
    }
    info!(
        "Using {} model {}",
        app_state.model_info.provider, app_state.model_info.model
    );

    let app = routes::build_app(app_state);

    let addr = config.system_config.bind_address();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
