//! Admin account management commands.

use clap::{Args, Subcommand};

use shopkit_core::error::AppError;
use shopkit_core::result::AppResult;
use shopkit_service::RegisterInput;

use crate::output;

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create an admin account (prompts for anything not given)
    Create {
        #[arg(short, long)]
        email: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Set a generated password and end every session of the account
    ResetPassword {
        /// Email address of the account
        email: String,
    },
}

/// Role given to accounts created here.
const ADMIN_ROLE: &str = "admin";

/// Execute admin commands
pub async fn execute(args: &AdminArgs, config_path: Option<&str>) -> AppResult<()> {
    let config = super::load_config(config_path)?;
    let services = super::open_services(&config).await?;

    match &args.command {
        AdminCommand::Create {
            email,
            first_name,
            last_name,
        } => {
            let email = or_prompt(email, "Email")?;
            let first_name = or_prompt(first_name, "First name")?;
            let last_name = or_prompt(last_name, "Last name")?;
            let password: String = dialoguer::Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()
                .map_err(super::prompt_error)?;

            let user = services
                .accounts
                .provision(RegisterInput {
                    first_name,
                    middle_name: None,
                    last_name,
                    email,
                    password,
                    phone: None,
                })
                .await?;

            if !services
                .accounts
                .assign_named_role(user.id, ADMIN_ROLE, None)
                .await?
            {
                return Err(AppError::not_found(format!(
                    "role {ADMIN_ROLE} does not exist, run `shopkit seed` first"
                )));
            }

            output::print_success(&format!(
                "Admin '{}' created (id: {})",
                user.email, user.id
            ));
        }
        AdminCommand::ResetPassword { email } => {
            let password = services.accounts.reset_password(email).await?;
            output::print_success(&format!("Password reset for '{email}'"));
            output::print_kv("New password", &password);
        }
    }

    Ok(())
}

fn or_prompt(value: &Option<String>, prompt: &str) -> AppResult<String> {
    match value {
        Some(v) => Ok(v.clone()),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(super::prompt_error),
    }
}
