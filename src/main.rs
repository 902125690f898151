use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use safebreathe::api::AppState;
use safebreathe::{
    Aggregator, DashboardAssembler, HttpPayloadSource, LocalPayloadSource, LocationQuery,
    Orchestrator, PayloadSource, SafeBreatheConfig, logging, web,
};

#[derive(Parser)]
#[command(name = "safebreathe")]
#[command(version, about = "Air quality, UV and pollen snapshot for outdoor exercise")]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service (default)
    Serve,
    /// Fetch one dashboard and print it as JSON
    Report {
        /// City name to look up
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Ask a running service instead of the upstream providers
        #[arg(long)]
        remote: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = SafeBreatheConfig::load_from_path(cli.config)
        .with_context(|| "Failed to load configuration")?;
    logging::init(&config.logging)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config).await,
        Commands::Report {
            city,
            lat,
            lon,
            remote,
        } => {
            let query = LocationQuery::from_params(city.as_deref(), lat, lon)?;
            let aggregator = Aggregator::new(config.defaults.locale);
            if remote {
                let source = HttpPayloadSource::from_config(&config)?;
                report(Orchestrator::new(source, aggregator), query).await
            } else {
                let source = local_source(&config)?;
                report(Orchestrator::new(source, aggregator), query).await
            }
        }
    }
}

fn local_source(config: &SafeBreatheConfig) -> Result<LocalPayloadSource> {
    let assembler = DashboardAssembler::from_config(config)?;
    Ok(LocalPayloadSource::new(Arc::new(assembler)))
}

async fn serve(config: &SafeBreatheConfig) -> Result<()> {
    info!("Starting SafeBreathe {}", safebreathe::VERSION);
    let state = AppState {
        source: Arc::new(local_source(config)?),
        aggregator: Aggregator::new(config.defaults.locale),
    };
    web::run(&config.server, state).await
}

async fn report<S: PayloadSource>(orchestrator: Orchestrator<S>, query: LocationQuery) -> Result<()> {
    orchestrator.refresh(query).await?;
    let state = orchestrator.store().current();

    if let Some(view) = state.view() {
        println!("{}", serde_json::to_string_pretty(view)?);
        Ok(())
    } else if let Some(failure) = state.failure() {
        anyhow::bail!("{}", failure.message())
    } else {
        anyhow::bail!("No dashboard was produced")
    }
}
