use potato_server::{config::ServerConfig, run::run, Result};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

const DEFAULT_LOG_FILTER: &str = "potato_server=debug,potato_app=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = ServerConfig::load()?;
    run(args).await
}
