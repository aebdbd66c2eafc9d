use mimalloc::MiMalloc;
use stockroom::App;
use stockroom::config::Config;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database.database_url,
        schema_version = cfg.database.schema_version,
        migration = ?cfg.database.migration,
        loglevel = %cfg.basic.loglevel
    );

    let app = match App::bootstrap(cfg).await {
        Ok(app) => app,
        Err(e) if e.is_schema_error() => {
            error!(error = %e, "database schema is incompatible; refusing to start");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    let inventory = app.inventory().await;
    let total: u64 = inventory.items().iter().map(|i| u64::from(i.quantity())).sum();
    info!(
        items = inventory.len(),
        total_quantity = total,
        receive_notifications = app.preferences().receive_notifications(),
        "inventory ready"
    );

    app.shutdown().await;
    Ok(())
}
