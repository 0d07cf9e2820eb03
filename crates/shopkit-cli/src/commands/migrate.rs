//! Database migration management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use shopkit_core::result::AppResult;
use shopkit_database::migration::{migration_status, revert_all, revert_latest, run_migrations};

use crate::output::{self, OutputFormat};

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Show migration status
    Status,
    /// Revert the latest applied migration
    Down {
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Revert every migration, dropping all tables
    Reset {
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct MigrationRow {
    version: i64,
    description: String,
    applied: String,
}

/// Execute migration commands
pub async fn execute(
    args: &MigrateArgs,
    config_path: Option<&str>,
    format: OutputFormat,
) -> AppResult<()> {
    let config = super::load_config(config_path)?;
    let pool = super::connect_database(&config).await?;

    match &args.command {
        MigrateCommand::Run => {
            run_migrations(pool.pool()).await?;
            output::print_success("All migrations applied.");
        }
        MigrateCommand::Status => {
            let rows: Vec<MigrationRow> = migration_status(pool.pool())
                .await?
                .into_iter()
                .map(|m| MigrationRow {
                    version: m.version,
                    description: m.description,
                    applied: m
                        .installed_on
                        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "pending".to_string()),
                })
                .collect();
            output::print_list(&rows, format);
        }
        MigrateCommand::Down { yes } => {
            if !*yes && !confirm("Revert the latest migration?")? {
                println!("Cancelled.");
                return Ok(());
            }
            match revert_latest(pool.pool()).await? {
                Some(version) => output::print_success(&format!("Reverted migration {version}.")),
                None => output::print_warning("No applied migrations."),
            }
        }
        MigrateCommand::Reset { yes } => {
            if !*yes && !confirm("This will DROP all tables. Continue?")? {
                println!("Cancelled.");
                return Ok(());
            }
            revert_all(pool.pool()).await?;
            output::print_success("All migrations reverted.");
        }
    }

    pool.close().await;
    Ok(())
}

fn confirm(prompt: &str) -> AppResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(super::prompt_error)
}
