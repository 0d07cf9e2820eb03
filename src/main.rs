//! Shopkit server: loads configuration, wires every crate together and
//! serves the HTTP API.

use anyhow::Context;

use shopkit_core::config::AppConfig;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("shopkit-server: {e:#}");
        std::process::exit(1);
    }
}

/// Load configuration from `SHOPKIT_CONFIG`, or from the layered files
/// selected by `SHOPKIT_ENV`.
fn load_configuration() -> anyhow::Result<AppConfig> {
    let config = match std::env::var("SHOPKIT_CONFIG") {
        Ok(path) => AppConfig::from_file(&path)
            .with_context(|| format!("loading configuration from '{path}'"))?,
        Err(_) => {
            let env = std::env::var("SHOPKIT_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
                .with_context(|| format!("loading configuration for environment '{env}'"))?
        }
    };
    Ok(config)
}

async fn run() -> anyhow::Result<()> {
    let config = load_configuration()?;
    shopkit_api::telemetry::init_logging(&config.logging);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.database.backend,
        "Starting shopkit"
    );

    let state = shopkit_api::build_state(config, true)
        .await
        .context("initializing application state")?;

    shopkit_api::run_server(state)
        .await
        .context("running HTTP server")?;

    Ok(())
}
