use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, error, info};

use chile_labor_engine::api::{AppState, create_router};
use chile_labor_engine::config::{ConfigLoader, EconomicConfig, HolidayCalendar};
use chile_labor_engine::indicators::{
    IndicatorCache, IndicatorService, MINDICADOR_URL, MindicadorSource,
};

/// Serve severance and net salary calculations over HTTP
#[derive(Parser, Debug)]
#[command(name = "chile-labor-engine", version)]
#[command(about = "Finiquito and sueldo líquido calculations for Chilean labor law", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "LABOR_ENGINE_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Configuration directory (indicators, tax brackets, pension funds, holidays)
    #[arg(short = 'c', long, env = "LABOR_ENGINE_CONFIG")]
    config: Option<PathBuf>,

    /// JSON array of ISO holiday dates, replacing the configured calendar
    #[arg(long, env = "LABOR_ENGINE_HOLIDAYS")]
    holidays: Option<PathBuf>,

    /// File holding the last indicators fetched
    #[arg(long, env = "LABOR_ENGINE_CACHE", default_value = "indicators-cache.json")]
    cache: PathBuf,

    /// Indicator provider endpoint
    #[arg(long, env = "LABOR_ENGINE_PROVIDER", default_value = MINDICADOR_URL)]
    provider_url: String,

    /// Seconds between indicator refreshes
    #[arg(long, default_value = "21600")]
    refresh_interval: u64,

    /// Provider request timeout in seconds
    #[arg(long, default_value = "10")]
    fetch_timeout: u64,

    /// Never contact the indicator provider
    #[arg(long)]
    offline: bool,

    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace,hyper=debug,tower=debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.verbose >= 2)
        .init();

    debug!(?cli, "Starting");

    if let Err(e) = run(cli).await {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(dir) => ConfigLoader::load(dir)?.into_config(),
        None => EconomicConfig::default(),
    };
    if let Some(path) = &cli.holidays {
        let calendar = HolidayCalendar::load_or_fallback(path, config.holidays().clone());
        config = config.with_holidays(calendar);
    }

    let timeout = Duration::from_secs(cli.fetch_timeout);
    let mut service = IndicatorService::new(config)
        .with_cache(IndicatorCache::new(&cli.cache))
        .with_timeout(timeout);
    if !cli.offline {
        service = service.with_source(Arc::new(MindicadorSource::new(&cli.provider_url, timeout)?));
    }
    let service = Arc::new(service);

    if cli.offline {
        service.refresh().await;
    } else {
        Arc::clone(&service).spawn_periodic(Duration::from_secs(cli.refresh_interval));
    }

    let app = create_router(AppState::new(service));
    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    info!(address = %cli.bind, "Listening");
    axum::serve(listener, app).await?;
    Ok(())
}
