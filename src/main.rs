//! krabber-provision: create the krabber DynamoDB table and configure
//! autoscaling for it and its secondary indexes.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use krabber_provision::client::{ClientConfig, build_clients};
use krabber_provision::scaling::{ScalingSettings, apply_autoscaling, scaling_plan};
use krabber_provision::schema::{TABLE_NAME, TableSchema};
use krabber_provision::table_operations::{create_table, table_exists, wait_for_table_active};

#[derive(Parser, Debug)]
#[command(name = "krabber-provision")]
#[command(about = "Provision the krabber DynamoDB table and its autoscaling policies")]
#[command(version)]
struct Cli {
    /// AWS region (falls back to the environment, then us-west-2)
    #[arg(long, global = true)]
    region: Option<String>,

    /// AWS profile from ~/.aws/credentials
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Custom DynamoDB endpoint URL (DynamoDB Local)
    #[arg(long, global = true)]
    endpoint_url: Option<String>,

    /// Table name
    #[arg(long, global = true, default_value = TABLE_NAME)]
    table: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the table with its key schema and ten secondary indexes
    CreateTable,

    /// Register scalable targets and target-tracking policies
    ApplyAutoscaling {
        /// JSON file overriding capacity bounds and utilization settings
        #[arg(long)]
        settings: Option<PathBuf>,
    },

    /// Create the table, wait for it to become active, then apply autoscaling
    Provision {
        /// JSON file overriding capacity bounds and utilization settings
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Seconds to wait for the table to become active
        #[arg(long, default_value = "300")]
        wait_timeout: u64,
    },

    /// Print the derived autoscaling plan without calling AWS
    Plan,
}

fn load_settings(path: Option<&PathBuf>) -> Result<ScalingSettings> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read settings file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid settings file {}", path.display()))
        }
        None => Ok(ScalingSettings::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let schema = TableSchema::new(&cli.table);
    let client_config = ClientConfig {
        region: cli.region,
        profile: cli.profile,
        endpoint_url: cli.endpoint_url,
    };

    match cli.command {
        Command::CreateTable => {
            let clients = build_clients(&client_config).await;
            create_table(&clients.dynamodb, &schema).await?;
            println!("Successfully created table.");
        }

        Command::ApplyAutoscaling { settings } => {
            let settings = load_settings(settings.as_ref())?;
            let clients = build_clients(&client_config).await;
            apply_autoscaling(
                &clients.autoscaling,
                &schema.table_name,
                &schema.index_names(),
                &settings,
            )
            .await?;
            println!("Autoscaling policy successfully applied");
        }

        Command::Provision {
            settings,
            wait_timeout,
        } => {
            let settings = load_settings(settings.as_ref())?;
            let clients = build_clients(&client_config).await;

            if table_exists(&clients.dynamodb, &schema.table_name).await? {
                info!(table = %schema.table_name, "table already exists, skipping create");
            } else {
                create_table(&clients.dynamodb, &schema).await?;
                println!("Successfully created table.");
            }

            wait_for_table_active(
                &clients.dynamodb,
                &schema.table_name,
                Duration::from_secs(wait_timeout),
            )
            .await?;

            apply_autoscaling(
                &clients.autoscaling,
                &schema.table_name,
                &schema.index_names(),
                &settings,
            )
            .await?;
            println!("Autoscaling policy successfully applied");
        }

        Command::Plan => {
            let plan = scaling_plan(&schema.table_name, &schema.index_names());
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
    }

    Ok(())
}
