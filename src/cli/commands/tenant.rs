use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::database::models::{Branding, Tenant};
use crate::services::TenantService;

#[derive(Subcommand)]
pub enum TenantCommands {
    #[command(about = "List tenants")]
    List {
        #[arg(long, help = "Include soft-deleted tenants")]
        include_deleted: bool,
    },

    #[command(about = "Create a tenant and provision its schema")]
    Create {
        #[arg(help = "Tenant display name")]
        name: String,

        #[arg(long, value_parser = parse_date, help = "Subscription start (YYYY-MM-DD)")]
        start: NaiveDate,

        #[arg(long, value_parser = parse_date, help = "Subscription end (YYYY-MM-DD)")]
        end: NaiveDate,

        #[arg(long, help = "Logo URL")]
        logo_url: Option<String>,

        #[arg(long, help = "Primary color")]
        primary_color: Option<String>,
    },

    #[command(about = "Re-run schema provisioning for one tenant")]
    Provision {
        #[arg(help = "Tenant ID")]
        id: i32,
    },

    #[command(about = "Re-provision every live tenant whose schema is incomplete")]
    Reconcile,

    #[command(about = "Disable tenants whose subscription has ended")]
    Expire {
        #[arg(long, value_parser = parse_date, help = "Evaluate as of this date (default: today, UTC)")]
        today: Option<NaiveDate>,
    },
}

fn tenant_json(tenant: &Tenant, today: NaiveDate) -> serde_json::Value {
    json!({
        "id": tenant.id,
        "name": tenant.name,
        "schema_name": tenant.schema_name,
        "subscription_start": tenant.subscription_start,
        "subscription_end": tenant.subscription_end,
        "enabled": tenant.enabled,
        "deleted_at": tenant.deleted_at,
        "status": tenant.status(today).label(),
    })
}

pub async fn handle(cmd: TenantCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let tenants = TenantService::new(pool().await?);
    let today = chrono::Utc::now().date_naive();

    match cmd {
        TenantCommands::List { include_deleted } => {
            let list = tenants.list(include_deleted).await?;
            if list.is_empty() {
                return output_empty_collection(&output_format, "tenants", "No tenants");
            }

            match output_format {
                OutputFormat::Json => {
                    let rows: Vec<_> = list.iter().map(|t| tenant_json(t, today)).collect();
                    println!("{}", serde_json::to_string_pretty(&json!({ "tenants": rows }))?);
                }
                OutputFormat::Text => {
                    println!("{:<6} {:<28} {:<30} {:<12} {:<12} {}", "ID", "NAME", "SCHEMA", "START", "END", "STATUS");
                    println!("{}", "-".repeat(100));
                    for t in &list {
                        println!(
                            "{:<6} {:<28} {:<30} {:<12} {:<12} {}",
                            t.id,
                            t.name,
                            t.schema_name,
                            t.subscription_start,
                            t.subscription_end,
                            t.status(today).label()
                        );
                    }
                }
            }
            Ok(())
        }
        TenantCommands::Create { name, start, end, logo_url, primary_color } => {
            let tenant = tenants.create(&name, start, end, Branding { logo_url, primary_color }).await?;
            output_success(
                &output_format,
                &format!("Created tenant '{}' with schema {}", tenant.name, tenant.schema_name),
                Some(json!({ "tenant": tenant_json(&tenant, today) })),
            )
        }
        TenantCommands::Provision { id } => {
            let tenant = tenants.provision(id).await?;
            output_success(
                &output_format,
                &format!("Provisioned schema {}", tenant.schema_name),
                Some(json!({ "tenant": tenant_json(&tenant, today) })),
            )
        }
        TenantCommands::Reconcile => {
            let repaired = tenants.reconcile().await?;
            if repaired.is_empty() {
                return output_success(&output_format, "All tenant schemas are complete", Some(json!({ "repaired": [] })));
            }

            let rows: Vec<_> = repaired
                .iter()
                .map(|r| json!({ "id": r.tenant.id, "schema_name": r.tenant.schema_name, "missing": r.missing }))
                .collect();
            if let OutputFormat::Text = output_format {
                for r in &repaired {
                    println!("{}: recreated {}", r.tenant.schema_name, r.missing.join(", "));
                }
            }
            output_success(
                &output_format,
                &format!("Repaired {} tenant schema(s)", repaired.len()),
                Some(json!({ "repaired": rows })),
            )
        }
        TenantCommands::Expire { today: as_of } => {
            let disabled = tenants.enforce_subscription_expiry(as_of.unwrap_or(today)).await?;
            output_success(
                &output_format,
                &format!("Disabled {} expired tenant(s)", disabled),
                Some(json!({ "disabled": disabled })),
            )
        }
    }
}
