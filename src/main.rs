use lift_energy::error::AppError;
use lift_energy::estimation::{EstimationSettings, create_model};
use lift_energy::store::{InMemoryResultStore, ResultStore, SqliteResultStore};
use lift_energy::{api, config, state};
use std::net::SocketAddr;
use std::sync::Arc;

fn init_tracing(level: tracing::Level) {
    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_default().map_err(AppError::from)?;
    init_tracing(config.log_level());
    tracing::info!(
        app = %config.app.name,
        config_path = config::DEFAULT_CONFIG_PATH,
        "lift-energy starting"
    );

    let settings = EstimationSettings::from(config.estimation.as_ref());
    let model = create_model(&settings);
    tracing::info!(model = model.name(), "Energy model selected");

    let store = open_store(&config).await?;
    let state = Arc::new(state::AppState::from_config(
        &config,
        Arc::from(model),
        store,
    ));

    let app = api::router(state);
    let port = config.server_port();
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::from)?;
    tracing::info!(%addr, "HTTP server listening");
    axum::serve(listener, app).await.map_err(AppError::from)?;

    Ok(())
}

async fn open_store(config: &config::Config) -> Result<Arc<dyn ResultStore>, AppError> {
    match config.database_url() {
        Some(url) => {
            let store = SqliteResultStore::open(url).await?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("No [store].database_url configured, results are kept in memory only");
            Ok(Arc::new(InMemoryResultStore::new()))
        }
    }
}
