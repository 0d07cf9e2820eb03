//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use shopkit_core::result::AppResult;
use shopkit_core::types::{PageRequest, QuerySpec};
use shopkit_entity::user::{User, UserFilter, UserStatus};

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List users
    List {
        /// Filter by status (active, inactive)
        #[arg(short, long)]
        status: Option<UserStatus>,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 20)]
        per_page: u64,
    },
    /// Enable a user
    Enable {
        /// Email address
        email: String,
    },
    /// Disable a user and end their sessions
    Disable {
        /// Email address
        email: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: i64,
    email: String,
    name: String,
    status: String,
    created_at: String,
}

impl From<User> for UserRow {
    fn from(u: User) -> Self {
        Self {
            id: u.id.get(),
            name: format!("{} {}", u.first_name, u.last_name),
            email: u.email,
            status: u.status.to_string(),
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config_path: Option<&str>,
    format: OutputFormat,
) -> AppResult<()> {
    let config = super::load_config(config_path)?;
    let services = super::open_services(&config).await?;
    let admin = &services.admin;

    match &args.command {
        UserCommand::List {
            status,
            page,
            per_page,
        } => {
            let spec = QuerySpec::new()
                .filter_opt(status.map(UserFilter::Status))
                .paginate(PageRequest::new(*page, *per_page));
            let result = admin.list_users(&spec).await?;
            output::print_page(result, format, UserRow::from);
        }
        UserCommand::Enable { email } => {
            let user = admin.user_by_email(email).await?;
            admin.update_status(None, user.id, UserStatus::Active).await?;
            output::print_success(&format!("User '{email}' enabled"));
        }
        UserCommand::Disable { email } => {
            let user = admin.user_by_email(email).await?;
            admin.update_status(None, user.id, UserStatus::Inactive).await?;
            output::print_success(&format!("User '{email}' disabled"));
        }
    }

    Ok(())
}
