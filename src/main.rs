use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use survey_geocode::app::geocode_use_case::{GeocodeUseCase, GeocoderSettings};
use survey_geocode::app::ports::ClockPort;
use survey_geocode::app::survey_use_case::SurveyGeocodeUseCase;
use survey_geocode::config::Config;
use survey_geocode::fallback::FallbackTable;
use survey_geocode::infra::clock::TokioClock;
use survey_geocode::infra::dataset_output_adapter::FileDatasetOutputAdapter;
use survey_geocode::infra::http_client::ReqwestHttp;
use survey_geocode::infra::rate_limiter_adapter::RateLimiterAdapter;
use survey_geocode::logging;
use survey_geocode::rate_limiter::{Limits, RateLimiter};
use survey_geocode::survey;

#[derive(Parser)]
#[command(name = "survey_geocode")]
#[command(about = "Geocode stakeholder survey organizations into the site's map dataset")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to ./config.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Survey CSV export, overriding the configured path
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output JSON path, overriding the configured path
    #[arg(long)]
    output: Option<PathBuf>,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(input) = cli.input {
        config.paths.input = input;
    }
    if let Some(output) = cli.output {
        config.paths.output = output;
    }

    let table = match &config.paths.fallback_table {
        Some(path) => FallbackTable::load(path)?,
        None => FallbackTable::embedded()?,
    };
    info!("{} fallback coordinates available", table.len());

    let rows = survey::read_survey(&config.paths.input)
        .with_context(|| format!("reading survey {}", config.paths.input.display()))?;

    let clock: Arc<dyn ClockPort> = Arc::new(TokioClock::new());
    let http = ReqwestHttp::new(&config.geocoder.user_agent, config.geocoder.timeout())
        .map_err(|e| anyhow::anyhow!("building HTTP client: {}", e))?;
    let limiter = RateLimiter::new(
        Limits {
            min_interval: config.geocoder.request_interval(),
        },
        clock.clone(),
    );
    let geocoder = GeocodeUseCase::new(
        Box::new(http),
        Box::new(RateLimiterAdapter(limiter)),
        table,
        GeocoderSettings::from(&config.geocoder),
    );

    let output = FileDatasetOutputAdapter::new(&config.paths.output);
    let use_case = SurveyGeocodeUseCase::new(
        geocoder,
        clock,
        Box::new(output),
        config.pacing.row_delay(),
    );

    let dataset = use_case
        .run(&rows)
        .await
        .with_context(|| format!("writing {}", config.paths.output.display()))?;

    let meta = &dataset.metadata;
    println!("\n=== GEOCODING COMPLETE ===");
    println!("Total organizations: {}", meta.total_organizations);
    println!("Successfully geocoded: {}", meta.geocoded_organizations);
    println!("Failed to geocode: {}", meta.failed_geocode);
    println!("Success rate: {:.1}%", meta.success_rate);
    println!("Output saved to: {}", config.paths.output.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _guard = logging::init_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("Geocoding run failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}
