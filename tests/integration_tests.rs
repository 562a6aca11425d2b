mod common;

use std::time::Duration;

use chrono::NaiveDate;
use impact_simulation::{
    Composition, DataSource, DateRange, EngineConfig, EntryConfig, EntryOutcome, EntrySimulator,
    FileGeologicalSource, ImpactEngine, ImpactRequest, ImpactorSpec, Location, Severity,
    SimulationError, SourceSettings,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;
use tokio::time::Instant;

use common::{live_engine, short_timeouts, FixedCatalog, FixedPopulation, Unresponsive};

fn chelyabinsk() -> ImpactorSpec {
    ImpactorSpec::from_composition(20.0, 19.0, Composition::Rocky, 18.0)
}

fn energy_megatons(spec: &ImpactorSpec) -> f64 {
    live_engine(100.0)
        .assess_physics(spec)
        .unwrap()
        .consequences
        .energy_megatons
}

#[tokio::test]
async fn test_chelyabinsk_is_minor() {
    println!("INTEGRATION TEST: Chelyabinsk reference event");

    let request = ImpactRequest::new(chelyabinsk(), Location::new(54.8, 61.1));
    let report = live_engine(20.0).run(&request).await.unwrap();

    println!(
        "energy {:.3} Mt, {:?}, terminal velocity {:.2} km/s",
        report.consequences.energy_megatons, report.entry_outcome, report.terminal_state.velocity_km_s
    );

    assert!(report.consequences.energy_megatons > 0.0);
    assert!(report.consequences.energy_megatons < 1.0);
    assert_eq!(report.severity, Severity::Minor);
    assert!(report.fallback_sources.is_empty());
}

#[tokio::test]
async fn test_kilometre_impactor_is_catastrophic() {
    println!("INTEGRATION TEST: 1 km impactor");

    let impactor = ImpactorSpec::from_composition(1000.0, 25.0, Composition::Rocky, 45.0);
    let request = ImpactRequest::new(impactor, Location::new(35.0, -40.0));
    let report = live_engine(5.0).run(&request).await.unwrap();

    assert_eq!(report.severity, Severity::Catastrophic);
    assert_eq!(report.entry_outcome, EntryOutcome::GroundImpact);

    // kilometres, not metres
    let crater = report.consequences.crater_diameter_km;
    assert!(crater > 1.0 && crater < 100.0, "crater {} km", crater);

    let rings = &report.consequences.blast_rings;
    assert!(rings.len() >= 3);
    for pair in rings.windows(2) {
        assert!(pair[0].radius_km > 0.0);
        assert!(pair[1].radius_km > pair[0].radius_km);
        assert!(pair[1].overpressure_kpa < pair[0].overpressure_kpa);
    }
}

#[tokio::test(start_paused = true)]
async fn test_all_sources_timing_out_still_produce_a_report() {
    println!("INTEGRATION TEST: every upstream source times out");

    let config = short_timeouts();
    let longest = config.timeouts.longest();
    let engine = ImpactEngine::new(
        config,
        Box::new(Unresponsive),
        Box::new(Unresponsive),
        Box::new(Unresponsive),
    )
    .unwrap();

    let window = DateRange::ending_on(NaiveDate::from_ymd_opt(2025, 10, 4).unwrap(), 7).unwrap();
    let request = ImpactRequest::new(
        ImpactorSpec::from_composition(150.0, 18.0, Composition::Metallic, 60.0),
        Location::new(-33.9, 18.4),
    )
    .with_catalog_object("2099942")
    .with_catalog_window(window);

    let started = Instant::now();
    let report = engine.run(&request).await.unwrap();
    let elapsed = started.elapsed();

    assert!(report.enrichment.all_fallback());
    assert!(report.uses_reference_data());
    assert_eq!(
        report.fallback_sources,
        vec![
            DataSource::AsteroidCatalog,
            DataSource::Geological,
            DataSource::Population
        ]
    );
    assert_eq!(report.enrichment.population_density_per_km2.value, 15.0);
    assert_eq!(report.enrichment.historical_seismicity.value.event_count, 0);
    assert!(report.enrichment.catalog_object.is_some());
    assert!(report.population_affected > 0);

    // bounded by the longest budget, not the 800 ms sum
    assert!(elapsed >= longest);
    assert!(elapsed < longest + Duration::from_millis(100));

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    for field in ["population_density_per_km2", "historical_seismicity", "elevation_m"] {
        assert_eq!(json["enrichment"][field]["provenance"], "fallback");
    }
}

#[tokio::test]
async fn test_zero_density_means_no_casualties_or_damage() {
    let request = ImpactRequest::new(
        ImpactorSpec::from_composition(2000.0, 30.0, Composition::Metallic, 90.0),
        Location::new(-85.0, 0.0),
    );
    let report = live_engine(0.0).run(&request).await.unwrap();

    assert_eq!(report.severity, Severity::Catastrophic);
    assert_eq!(report.population_affected, 0);
    assert_eq!(report.economic_damage_usd, 0.0);
    assert!(!report.enrichment.population_density_per_km2.is_fallback());
}

#[tokio::test]
async fn test_live_catalog_object_is_attached() {
    let object = impact_simulation::CatalogObject {
        id: "3542519".to_string(),
        name: "(2010 PK9)".to_string(),
        diameter_km: 0.2,
        velocity_km_h: 54_000.0,
        miss_distance_km: 4_000_000.0,
        approach_date: "2025-10-02".to_string(),
        hazardous: true,
    };
    let engine = ImpactEngine::new(
        EngineConfig::default(),
        Box::new(FixedCatalog(vec![object.clone()])),
        Box::new(common::FixedGeology(common::seismic_context())),
        Box::new(FixedPopulation(80.0)),
    )
    .unwrap();

    let impactor = ImpactorSpec::from_catalog_object(&object, Composition::Rocky, 45.0);
    let request = ImpactRequest::new(impactor, Location::new(10.0, 10.0)).with_catalog_object("3542519");
    let report = engine.run(&request).await.unwrap();

    assert!(report.fallback_sources.is_empty());
    let attached = report.enrichment.catalog_object.unwrap();
    assert!(!attached.is_fallback());
    assert_eq!(attached.value, object);
    assert_eq!(report.impactor.diameter_m, 200.0);
    assert_eq!(report.impactor.velocity_km_s, 15.0);
}

#[test]
fn test_energy_monotonic_in_diameter() {
    let mut rng = StdRng::seed_from_u64(2013);

    for _ in 0..40 {
        let velocity = rng.gen_range(5.0..70.0);
        let density = rng.gen_range(1000.0..8000.0);
        let angle = rng.gen_range(5.0..90.0);

        let mut previous = 0.0;
        for diameter in [1.0, 5.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0] {
            let energy = energy_megatons(&ImpactorSpec::new(diameter, velocity, density, angle));
            assert!(
                energy >= previous,
                "energy fell from {} to {} Mt at d={} m, v={}, angle={}",
                previous,
                energy,
                diameter,
                velocity,
                angle
            );
            previous = energy;
        }
    }
}

#[test]
fn test_energy_monotonic_in_velocity() {
    let mut rng = StdRng::seed_from_u64(1908);

    for _ in 0..40 {
        let diameter = rng.gen_range(5.0..2000.0);
        let density = rng.gen_range(1000.0..8000.0);
        let angle = rng.gen_range(5.0..90.0);

        let mut previous = 0.0;
        for step in 1..=14 {
            let velocity = step as f64 * 5.0;
            let energy = energy_megatons(&ImpactorSpec::new(diameter, velocity, density, angle));
            assert!(
                energy >= previous,
                "energy fell from {} to {} Mt at v={} km/s, d={}, angle={}",
                previous,
                energy,
                velocity,
                diameter,
                angle
            );
            previous = energy;
        }
    }
}

#[test]
fn test_entry_terminates_for_random_inputs() {
    let mut rng = StdRng::seed_from_u64(42);
    let config = EntryConfig::default();

    for _ in 0..200 {
        let spec = ImpactorSpec::new(
            rng.gen_range(1.0..5000.0),
            rng.gen_range(1.0..72.0),
            rng.gen_range(500.0..8000.0),
            rng.gen_range(1.0..=90.0),
        );
        let trajectory = EntrySimulator::new(spec, config.clone()).unwrap().run();

        assert!(trajectory.outcome.is_some(), "{:?} did not terminate", spec);
        assert!(trajectory.states.len() <= config.max_steps);

        let floor = config.airburst_mass_fraction;
        for state in &trajectory.states {
            assert!(state.mass_fraction_remaining >= floor - 1e-12);
        }
        for pair in trajectory.states.windows(2) {
            assert!(pair[1].altitude_km < pair[0].altitude_km);
        }
    }
}

#[tokio::test]
async fn test_lazy_and_eager_consumption_agree() {
    let engine = live_engine(10.0);
    let simulator = engine.simulator(chelyabinsk()).unwrap();

    let mut steps = simulator.steps();
    let mut last = None;
    for state in steps.by_ref() {
        tokio::task::yield_now().await;
        last = Some(state);
    }

    let trajectory = simulator.run();
    assert_eq!(last.as_ref(), trajectory.terminal_state());
    assert_eq!(steps.outcome(), trajectory.outcome);

    let physics = engine.assess_physics(&chelyabinsk()).unwrap();
    assert_eq!(Some(&physics.terminal_state), trajectory.terminal_state());
}

#[tokio::test]
async fn test_request_errors_are_caller_visible() {
    let engine = live_engine(10.0);

    let result = engine
        .run(&ImpactRequest::new(
            ImpactorSpec::new(20.0, -3.0, 3000.0, 45.0),
            Location::new(0.0, 0.0),
        ))
        .await;
    assert!(matches!(result, Err(SimulationError::InvalidInput(_))));

    let result = engine
        .run(&ImpactRequest::new(chelyabinsk(), Location::new(-91.0, 0.0)))
        .await;
    assert!(matches!(result, Err(SimulationError::InvalidInput(_))));
}

#[test]
fn test_config_file_round_trip() {
    let config = EngineConfig::from_json_str(r#"{ "timeouts": { "population_ms": 2500 } }"#).unwrap();
    assert_eq!(config.timeouts.population_ms, 2500);
    assert_eq!(config.timeouts.catalog_ms, EngineConfig::default().timeouts.catalog_ms);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("engine.json");
    std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
    assert_eq!(EngineConfig::load(&path).unwrap(), config);
}

#[test]
fn test_oversized_catalog_window_rejected() {
    let result =
        EngineConfig::from_json_str(r#"{ "sources": { "catalog_window_days": 10000000000 } }"#);
    assert!(matches!(result, Err(SimulationError::Configuration(_))));

    let today = NaiveDate::from_ymd_opt(2025, 10, 4).unwrap();
    assert!(DateRange::ending_on(today, 10_000_000_000).is_err());
}

#[tokio::test]
async fn test_missing_elevation_is_reported_as_fallback() {
    println!("INTEGRATION TEST: seismic capture without a usable elevation");

    let dir = TempDir::new().unwrap();
    let events = dir.path().join("events.json");
    std::fs::write(&events, r#"{ "features": [] }"#).unwrap();
    let no_data = dir.path().join("elevation.json");
    std::fs::write(
        &no_data,
        r#"{ "USGS_Elevation_Point_Query_Service": { "Elevation_Query": { "Elevation": -1000000 } } }"#,
    )
    .unwrap();

    let settings = SourceSettings::default();
    let request = ImpactRequest::new(chelyabinsk(), Location::new(27.99, 86.93));

    for geology in [
        FileGeologicalSource::new(&events, &settings),
        FileGeologicalSource::new(&events, &settings).with_elevation(&no_data),
    ] {
        let engine = ImpactEngine::new(
            EngineConfig::default(),
            Box::new(FixedCatalog(Vec::new())),
            Box::new(geology),
            Box::new(FixedPopulation(20.0)),
        )
        .unwrap();
        let report = engine.run(&request).await.unwrap();

        assert!(report.enrichment.elevation_m.is_fallback());
        assert_eq!(report.fallback_sources, vec![DataSource::Geological]);

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["enrichment"]["elevation_m"]["provenance"], "fallback");
    }
}

#[tokio::test(start_paused = true)]
async fn test_degenerate_impact_does_not_wait_for_sources() {
    println!("INTEGRATION TEST: degenerate entry with unresponsive sources");

    let mut config = short_timeouts();
    config.entry.max_steps = 2;
    let engine = ImpactEngine::new(
        config,
        Box::new(Unresponsive),
        Box::new(Unresponsive),
        Box::new(Unresponsive),
    )
    .unwrap();

    let started = Instant::now();
    let result = engine
        .run(&ImpactRequest::new(chelyabinsk(), Location::new(54.8, 61.1)))
        .await;

    assert!(matches!(result, Err(SimulationError::DegenerateImpact(_))));
    assert!(started.elapsed() < Duration::from_millis(150));
}
