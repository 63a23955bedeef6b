use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::services::CredentialService;

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "Replace the administrator credential (recovery when the password is lost)")]
    Reset {
        #[arg(long, help = "New username")]
        username: String,

        #[arg(long, help = "New password")]
        password: String,
    },
}

pub async fn handle(cmd: AdminCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AdminCommands::Reset { username, password } => {
            let credentials = CredentialService::new(pool().await?);
            let admin = credentials.rotate(&username, &password).await?;
            output_success(
                &output_format,
                &format!("Administrator credential set to '{}'", admin.username),
                Some(json!({ "username": admin.username })),
            )
        }
    }
}
