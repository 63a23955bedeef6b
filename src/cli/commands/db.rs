use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::bootstrap;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create the registry tables and seed the bootstrap administrator")]
    Init,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DbCommands::Init => {
            let pool = pool().await?;
            let security = &config::config().security;
            let seeded = bootstrap(&pool, &security.bootstrap_admin_username, &security.bootstrap_admin_password).await?;

            let message = if seeded {
                format!("Registry initialized; seeded administrator '{}'", security.bootstrap_admin_username)
            } else {
                "Registry initialized".to_string()
            };
            output_success(&output_format, &message, Some(json!({ "seeded_admin": seeded })))
        }
    }
}
