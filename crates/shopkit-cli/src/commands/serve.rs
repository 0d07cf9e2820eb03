//! Start the shopkit server.

use clap::Args;

use shopkit_api::telemetry::init_logging;
use shopkit_api::{build_state, run_server};
use shopkit_core::result::AppResult;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Apply pending migrations before serving (postgres backend)
    #[arg(long)]
    pub migrate: bool,

    /// Seed reference data and the admin account before serving
    #[arg(long)]
    pub seed: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, config_path: Option<&str>) -> AppResult<()> {
    let mut config = super::load_config(config_path)?;
    init_logging(&config.logging);

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }

    let state = build_state(config, args.migrate).await?;

    if args.seed {
        super::seed::seed_with(&state.services, &state.config.seed).await?;
    }

    run_server(state).await
}
