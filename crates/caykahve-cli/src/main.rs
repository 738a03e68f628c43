mod terminal;

use std::sync::Arc;

use anyhow::Context;
use caykahve_core::{radius_from_step, AppConfig, Category, Location, Notification, Notifier};
use caykahve_discovery::{
    Discovery, GeoIpSource, LocationError, LocationResolver, LocationSource, StaticSource,
};
use caykahve_search::SearchClient;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::terminal::{TerminalBusy, TerminalNotifier, TerminalRenderer};

#[derive(Debug, Parser)]
#[command(name = "caykahve")]
#[command(about = "Find tea and coffee places near you")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for places around the current location.
    Find(FindArgs),
    /// Print the resolved configuration.
    Config,
}

#[derive(Debug, clap::Args)]
struct FindArgs {
    /// `coffee` or `tea`.
    #[arg(value_parser = parse_category)]
    category: Category,

    /// Search radius in metres.
    #[arg(long, conflicts_with = "radius_step")]
    radius: Option<u32>,

    /// Index into the 200/500/1000/2000/5000 m radius table.
    #[arg(long)]
    radius_step: Option<usize>,

    /// Use this latitude instead of looking up the device location.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Behave as if location permission was refused.
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    no_location: bool,

    /// Override the configured result window.
    #[arg(long)]
    max_results: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_category(raw: &str) -> Result<Category, String> {
    raw.parse::<Category>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        TerminalNotifier.notify(Notification::greeting());
        return Ok(());
    };

    let config = caykahve_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Find(args) => run_find(&config, args).await,
        Commands::Config => {
            println!("{config:#?}");
            Ok(())
        }
    }
}

async fn run_find(config: &AppConfig, args: FindArgs) -> anyhow::Result<()> {
    let radius = match (args.radius, args.radius_step) {
        (Some(r), _) => Some(r),
        (None, Some(step)) => Some(radius_from_step(step)?),
        (None, None) => None,
    };
    let max_results = match args.max_results {
        Some(0) => anyhow::bail!("--max-results must be at least 1"),
        Some(n) => n,
        None => config.max_results,
    };

    let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);
    let busy = Arc::new(TerminalBusy::default());

    let (source, probe_permission) = location_source(config, &args)?;
    let resolver = LocationResolver::new(config.fallback_location, Arc::clone(&notifier))
        .with_deadline(Some(config.location_timeout()))
        .with_device_timeout(config.device_timeout())
        .with_permission_probe(probe_permission);

    let search = SearchClient::new(
        &config.proxy_url,
        config.search_timeout_secs,
        &config.user_agent,
    )
    .context("failed to build search client")?
    .with_busy_indicator(busy.clone());

    let discovery = Discovery::new(
        resolver,
        source,
        Arc::new(search),
        Arc::new(TerminalRenderer::new(args.format)),
        notifier,
        busy,
        max_results,
    );

    discovery.discover(args.category, radius).await;
    Ok(())
}

/// Pick the location source for this run; the flag says whether the
/// permission probe should run first.
fn location_source(
    config: &AppConfig,
    args: &FindArgs,
) -> anyhow::Result<(Arc<dyn LocationSource>, bool)> {
    if args.no_location {
        return Ok((Arc::new(StaticSource::denied()), true));
    }
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        let location = Location::new(lat, lon)?;
        return Ok((Arc::new(StaticSource::at(location)), false));
    }
    if let Some(url) = &config.geoip_url {
        let source = GeoIpSource::new(url, &config.user_agent)
            .context("failed to build geoip client")?;
        return Ok((Arc::new(source), true));
    }
    Ok((
        Arc::new(StaticSource::failing(LocationError::Unsupported)),
        false,
    ))
}
