use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use clap::{Parser, ValueEnum};
use impact_simulation::*;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CompositionArg {
    Rocky,
    Metallic,
    Carbonaceous,
    Porous,
}

impl From<CompositionArg> for Composition {
    fn from(arg: CompositionArg) -> Self {
        match arg {
            CompositionArg::Rocky => Composition::Rocky,
            CompositionArg::Metallic => Composition::Metallic,
            CompositionArg::Carbonaceous => Composition::Carbonaceous,
            CompositionArg::Porous => Composition::Porous,
        }
    }
}

/// Defaults describe the 2013 Chelyabinsk event.
#[derive(Parser, Debug)]
#[command(name = "impact-sim", version, about = "Meteoroid impact consequence simulator")]
struct Cli {
    #[arg(long, default_value_t = 20.0, help = "Impactor diameter [m]")]
    diameter: f64,
    #[arg(long, default_value_t = 19.0, help = "Entry velocity [km/s]")]
    velocity: f64,
    #[arg(long, value_enum, default_value_t = CompositionArg::Rocky)]
    composition: CompositionArg,
    #[arg(long, help = "Bulk density [kg/m³], overrides --composition")]
    density: Option<f64>,
    #[arg(long, default_value_t = 18.0, help = "Entry angle from horizontal [deg]")]
    angle: f64,
    #[arg(long, default_value_t = 54.8, allow_hyphen_values = true)]
    lat: f64,
    #[arg(long, default_value_t = 61.1, allow_hyphen_values = true)]
    lon: f64,
    #[arg(long, help = "Catalog object id or name to attach to the report")]
    catalog_id: Option<String>,
    #[arg(long, help = "Engine configuration (JSON)")]
    config: Option<PathBuf>,
    #[arg(long, help = "Captured NASA NeoWs feed response")]
    neo_feed: Option<PathBuf>,
    #[arg(long, help = "Captured USGS event query response")]
    usgs_events: Option<PathBuf>,
    #[arg(long, help = "Captured USGS elevation query response")]
    usgs_elevation: Option<PathBuf>,
    #[arg(long, help = "Replay the entry, pausing this many ms per state")]
    playback_ms: Option<u64>,
    #[arg(long, help = "Print plain-text narrative parameters instead of JSON")]
    narrative: bool,
    #[arg(long, help = "Print the upstream queries for this request and exit")]
    print_queries: bool,
}

fn build_engine(cli: &Cli, config: EngineConfig) -> Result<ImpactEngine, SimulationError> {
    let catalog: Box<dyn AsteroidCatalogSource> = match &cli.neo_feed {
        Some(path) => Box::new(FileCatalogSource::new(path)),
        None => Box::new(UnavailableSource::new(DataSource::AsteroidCatalog)),
    };

    let geology: Box<dyn GeologicalSource> = match &cli.usgs_events {
        Some(path) => {
            let source = FileGeologicalSource::new(path, &config.sources);
            match &cli.usgs_elevation {
                Some(elevation) => Box::new(source.with_elevation(elevation)),
                None => Box::new(source),
            }
        }
        None => Box::new(UnavailableSource::new(DataSource::Geological)),
    };

    ImpactEngine::new(config, catalog, geology, Box::new(RegionalPopulationSource))
}

async fn play_back(simulator: &EntrySimulator, pause: Duration) {
    let mut telemetry = EntryTelemetry::new();
    let mut steps = simulator.steps();

    for state in steps.by_ref() {
        println!("{}", telemetry.collect_data(&state));
        tokio::time::sleep(pause).await;
    }
    if let Some(outcome) = steps.outcome() {
        telemetry.record_outcome(outcome);
    }

    println!();
    for line in telemetry.summary() {
        println!("{}", line);
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let default = "info,impact_simulation=info";
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp_secs()
        .try_init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if config.sources.nasa_api_key.is_none() {
        config.sources.nasa_api_key = std::env::var("NASA_API_KEY").ok();
    }

    let impactor = match cli.density {
        Some(density) => ImpactorSpec::new(cli.diameter, cli.velocity, density, cli.angle),
        None => ImpactorSpec::from_composition(
            cli.diameter,
            cli.velocity,
            cli.composition.into(),
            cli.angle,
        ),
    };
    let location = Location::checked(cli.lat, cli.lon)?;

    if cli.print_queries {
        let window = DateRange::ending_on(
            Utc::now().date_naive(),
            config.sources.catalog_window_days,
        )?;
        println!("{}", neo_feed_url(window, config.sources.nasa_api_key.as_deref()));
        println!("{}", earthquake_url(&SeismicQuery::new(location, &config.sources)));
        println!("{}", elevation_url(location));
        return Ok(());
    }

    let engine = build_engine(&cli, config)?;

    if let Some(pause_ms) = cli.playback_ms {
        let simulator = engine.simulator(impactor)?;
        play_back(&simulator, Duration::from_millis(pause_ms)).await;
    }

    let mut request = ImpactRequest::new(impactor, location);
    if let Some(id) = &cli.catalog_id {
        request = request.with_catalog_object(id.as_str());
    }

    let report = engine.run(&request).await?;

    if cli.narrative {
        for (key, value) in report.narrative_parameters() {
            println!("{}: {}", key, value);
        }
    } else {
        println!("{}", report.to_json()?);
    }

    if report.uses_reference_data() {
        eprintln!("note: report uses reference data, see fallback_sources");
    }

    Ok(())
}
