//! Skycast command-line front end.
//!
//! Renders one forecast snapshot and exits. The interesting parts live
//! in `skycast-core`; this binary only wires the services together and
//! prints whatever state the controller publishes.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;

use skycast_core::AppStateController;
use skycast_prefs::PreferencesStore;
use skycast_weather::{
    Coordinate, FixedLocationSource, ForecastClient, GeocodingClient, LocationError,
    LocationResolver, LocationSource, NominatimGeocoder, UnitSystem,
};

/// Hosts without a positioning service; the user picks a city instead.
struct NoLocationService;

#[async_trait]
impl LocationSource for NoLocationService {
    async fn current_location(&self) -> Result<Coordinate, LocationError> {
        Err(LocationError::Unavailable)
    }
}

enum Mode {
    Coordinate(Coordinate),
    CityQuery(String),
}

fn parse_args() -> Result<Mode> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() == 2 {
        if let (Ok(latitude), Ok(longitude)) = (args[0].parse::<f64>(), args[1].parse::<f64>()) {
            return Ok(Mode::Coordinate(Coordinate {
                latitude,
                longitude,
            }));
        }
    }
    if args.is_empty() {
        bail!("usage: skycast <latitude> <longitude> | skycast <city name>");
    }
    Ok(Mode::CityQuery(args.join(" ")))
}

fn prefs_path() -> Result<std::path::PathBuf> {
    let dir = dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("skycast");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    Ok(dir.join("prefs.json"))
}

#[tokio::main]
async fn main() -> Result<()> {
    skycast_core::init()?;
    tracing::info!("Skycast started");

    let mode = parse_args()?;
    let prefs_path = prefs_path()?;
    let prefs = Arc::new(
        PreferencesStore::open(&prefs_path)
            .await
            .with_context(|| format!("Failed to open preferences: {}", prefs_path.display()))?,
    );

    // SKYCAST_UNITS overrides the persisted unit system for this run.
    match std::env::var("SKYCAST_UNITS").as_deref() {
        Ok("imperial") => prefs.set_unit_system(UnitSystem::Imperial).await?,
        Ok("metric") => prefs.set_unit_system(UnitSystem::Metric).await?,
        _ => {}
    }

    let source: Arc<dyn LocationSource> = match &mode {
        Mode::Coordinate(coord) => Arc::new(FixedLocationSource { coordinate: *coord }),
        Mode::CityQuery(_) => Arc::new(NoLocationService),
    };
    let resolver = LocationResolver::new(source, Arc::new(NominatimGeocoder::new()));

    let controller = AppStateController::new(
        ForecastClient::new()?,
        GeocodingClient::new()?,
        resolver,
        prefs,
    );
    controller.initialize().await;

    if let Mode::CityQuery(query) = &mode {
        controller.search(query).await;
        let candidate = controller.state().await.search_results.first().cloned();
        match candidate {
            Some(candidate) => controller.select_city(&candidate).await,
            None => bail!("No city matched \"{query}\""),
        }
    }

    let state = controller.state().await;
    print_state(&state);

    if let Some(kind) = state.last_error {
        bail!("{}", kind.user_message());
    }
    Ok(())
}

fn print_state(state: &skycast_core::AppState) {
    let snap = &state.snapshot;

    println!("{}", state.active_city);
    println!("{}  {}", snap.current_temp, snap.condition);
    println!("{}", snap.high_low);
    println!();
    println!("Feels like   {}", snap.apparent_temp);
    println!("Humidity     {}", snap.humidity);
    println!("Pressure     {}", snap.pressure);
    println!("Wind         {} {}", snap.wind_speed, snap.wind_direction);
    println!("Sunrise      {}", snap.sunrise);
    println!("Sunset       {}", snap.sunset);

    if !snap.hourly.is_empty() {
        println!();
        for item in snap.hourly.iter().take(6) {
            println!("  {:>5}  {}", item.hour_label, item.temp);
        }
    }
    if !snap.daily.is_empty() {
        println!();
        for item in &snap.daily {
            println!("  {}  {} / {}", item.day_label, item.max_temp, item.min_temp);
        }
    }
}
