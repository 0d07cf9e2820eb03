//! CLI command definitions and dispatch.

pub mod admin;
pub mod migrate;
pub mod routes;
pub mod seed;
pub mod serve;
pub mod user;

use clap::{Parser, Subcommand};

use shopkit_api::app::open_stores;
use shopkit_cache::CacheManager;
use shopkit_core::config::AppConfig;
use shopkit_core::error::AppError;
use shopkit_core::result::AppResult;
use shopkit_database::DatabasePool;
use shopkit_service::ServiceRegistry;

use crate::output::OutputFormat;

/// shopkit: e-commerce API server and administration tool
#[derive(Debug, Parser)]
#[command(name = "shopkit", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file. Without it, `config/default.toml` and
    /// `config/{SHOPKIT_ENV}.toml` are layered.
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Insert reference roles and permissions and create the admin account
    Seed,
    /// Print the route table
    Routes,
    /// User management
    User(user::UserArgs),
    /// Admin account management
    Admin(admin::AdminArgs),
}

impl Cli {
    pub fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve(_))
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> AppResult<()> {
        let config_path = self.config.as_deref();
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config_path).await,
            Commands::Migrate(args) => migrate::execute(args, config_path, self.format).await,
            Commands::Seed => seed::execute(config_path).await,
            Commands::Routes => routes::execute(self.format),
            Commands::User(args) => user::execute(args, config_path, self.format).await,
            Commands::Admin(args) => admin::execute(args, config_path).await,
        }
    }
}

/// Load configuration from `path`, or from the layered defaults.
pub fn load_config(path: Option<&str>) -> AppResult<AppConfig> {
    match path {
        Some(path) => AppConfig::from_file(path),
        None => {
            let env = std::env::var("SHOPKIT_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Connect to PostgreSQL. Fails for the memory backend, which has no
/// schema to manage.
pub async fn connect_database(config: &AppConfig) -> AppResult<DatabasePool> {
    DatabasePool::connect_if_postgres(&config.database)
        .await?
        .ok_or_else(|| AppError::configuration("this command needs the postgres backend"))
}

/// Build the services against the configured backend.
pub async fn open_services(config: &AppConfig) -> AppResult<ServiceRegistry> {
    let stores = open_stores(&config.database, false).await?;
    let cache = CacheManager::new(&config.cache).await?;
    Ok(ServiceRegistry::new(stores, cache, config))
}

/// Map a dialoguer failure into the application error type.
pub fn prompt_error(e: dialoguer::Error) -> AppError {
    AppError::internal(format!("Input error: {e}"))
}
