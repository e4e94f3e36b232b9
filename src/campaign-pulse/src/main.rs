//! Campaign Pulse: deterministic synthetic campaign analytics and scoring.
//!
//! `serve` runs the REST API; `snapshot` prints one simulated dashboard as
//! JSON on stdout.

use campaign_api::ApiServer;
use campaign_core::config::AppConfig;
use campaign_core::types::{GoalType, Scenario, SnapshotRequest};
use campaign_reporting::{build_dashboard, DashboardOptions};
use chrono::{NaiveDateTime, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "campaign-pulse")]
#[command(about = "Deterministic synthetic campaign analytics and scoring")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, global = true, env = "CAMPAIGN_PULSE__NODE_ID")]
    node_id: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API and metrics exporter
    Serve {
        /// HTTP port (overrides config)
        #[arg(long, env = "CAMPAIGN_PULSE__API__HTTP_PORT")]
        http_port: Option<u16>,

        /// Metrics port (overrides config)
        #[arg(long, env = "CAMPAIGN_PULSE__METRICS__PORT")]
        metrics_port: Option<u16>,
    },
    /// Print a simulated dashboard for one entity
    Snapshot {
        /// Campaign, ad set or account identifier
        #[arg(long)]
        entity: String,

        /// sales | lead_gen | growth | awareness | advocacy (defaults to config)
        #[arg(long)]
        goal: Option<GoalType>,

        /// baseline | growth_spike | fatigue_alert | conversion_drop (defaults to config)
        #[arg(long)]
        scenario: Option<Scenario>,

        /// Bump to force a fresh sample
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        round: u32,

        /// End of the reporting period, e.g. 2024-06-01T00:00:00 (defaults to today)
        #[arg(long)]
        anchor: Option<NaiveDateTime>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `snapshot` output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campaign_pulse=info,campaign_api=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }

    match cli.command {
        Command::Serve {
            http_port,
            metrics_port,
        } => {
            if let Some(port) = http_port {
                config.api.http_port = port;
            }
            if let Some(port) = metrics_port {
                config.metrics.port = port;
            }
            serve(config).await
        }
        Command::Snapshot {
            entity,
            goal,
            scenario,
            round,
            anchor,
        } => {
            let request = SnapshotRequest::new(
                entity,
                goal.unwrap_or(config.simulation.default_goal),
                scenario.unwrap_or(config.simulation.default_scenario),
                round,
            );
            let anchor =
                anchor.unwrap_or_else(|| Utc::now().date_naive().and_time(NaiveTime::MIN));
            let options = DashboardOptions::from_config(&config.simulation, anchor);
            let dashboard = build_dashboard(&request, &options);
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        metrics_port = config.metrics.port,
        default_goal = %config.simulation.default_goal,
        default_scenario = %config.simulation.default_scenario,
        "Configuration loaded"
    );

    let api_server = ApiServer::new(config);

    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("Campaign Pulse is ready to serve traffic");

    // Blocks until shutdown
    api_server.start_http().await?;

    Ok(())
}
