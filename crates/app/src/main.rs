mod state;

use std::env;
use std::error::Error;
use std::process::ExitCode;

use forecast::{
    client::{DemandPredictor as _, PredictionClient, PredictorConfig},
    series,
    time::TimeOfDay,
    wire::PredictionRequest,
};
use model::{demand::DemandLevel, zone::Zone, WithDistance};
use nominatim::{Geocoder as _, NominatimClient};
use render::{
    chart::ChartLayout,
    projection::{ProjectedZone, Projector, Viewport},
};
use utility::id::Id;

use crate::state::AppState;

const ZONES_ENV: &str = "TAXIMAP_ZONES";
const DEFAULT_ZONES: &str = "data/taxi_zones.geojson";

const MAP_WIDTH: f64 = 800.0;
const MAP_HEIGHT: f64 = 600.0;
const CHART_WIDTH: f64 = 320.0;
const CHART_HEIGHT: f64 = 240.0;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args().skip(1);
    let address = match args.next() {
        Some(address) => address,
        None => {
            eprintln!("usage: taximap <address> [time]");
            return ExitCode::from(2);
        }
    };
    let time_input = args.next().unwrap_or_else(|| "08:00".to_owned());

    match run(&address, &time_input).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(why) => {
            log::error!("{why}");
            eprintln!("Error: {why}");
            ExitCode::FAILURE
        }
    }
}

async fn run(address: &str, time_input: &str) -> Result<(), Box<dyn Error>> {
    let time: TimeOfDay = time_input.parse()?;
    let source = env::var(ZONES_ENV).unwrap_or_else(|_| DEFAULT_ZONES.to_owned());
    let zones = zones::load(&source).await?;

    let projector = Projector::city(Viewport::new(MAP_WIDTH, MAP_HEIGHT))?;
    let projected: Vec<ProjectedZone> = zones
        .iter()
        .map(|zone| projector.project_zone(zone.id, &zone.content))
        .collect();

    let mut state = AppState::new();

    let location = NominatimClient::new().lookup(address).await?;
    state.set_user_location(location);
    log::info!(
        "'{address}' resolved to ({}, {}).",
        location.latitude,
        location.longitude
    );

    let predictor = PredictionClient::new(PredictorConfig::env());
    let generation = state.begin_request();
    let request = PredictionRequest::new(location, time.request_timestamp_today());
    let response = predictor.predict(&request).await?;
    state.apply_records(generation, series::build_records(&response));

    let scale = state.color_scale();
    if let Some(records) = state.records() {
        for (id, record) in records {
            let style = state.controller.zone_style(id);
            log::debug!(
                "{}: demand {:.1}, fill {}, opacity {}",
                record.zone_name,
                record.demand,
                scale.color(Some(record.demand)),
                style.opacity
            );
        }
    }

    // select the zone under the pickup point; for a point outside every
    // zone (a pier, say) fall back to the nearest zone by centroid
    let pickup = projector.project(location.longitude, location.latitude);
    let selected = state.controller.click_at(pickup, &projected).or_else(|| {
        nearest_zone(&zones, location.latitude, location.longitude).map(
            |(id, nearest)| {
                log::info!(
                    "Pickup point is outside every zone; nearest is {} ({:.2} km away).",
                    nearest.content.display_name(&id),
                    nearest.distance_km
                );
                state.controller.click_zone(id)
            },
        )
    });
    if selected.is_none() {
        log::warn!("No zone to select for this pickup point.");
    }

    if let Some((_, record)) = state.selected_record() {
        let level = DemandLevel::classify(record.demand);
        println!(
            "{} ({}) at {}: {} demand, {:.0} pickups expected",
            record.zone_name,
            record.borough.as_deref().unwrap_or("Unknown"),
            time,
            level.label(),
            record.demand
        );
        let chart = ChartLayout::bind(&record.series, CHART_WIDTH, CHART_HEIGHT);
        for bar in &chart.bars {
            println!(
                "  {} {:>4}{}",
                bar.label,
                bar.value,
                if bar.is_peak { "  <- peak" } else { "" }
            );
        }
        println!("{}", serde_json::to_string_pretty(record)?);
    }

    Ok(())
}

fn nearest_zone(
    zones: &[model::WithId<Zone>],
    latitude: f64,
    longitude: f64,
) -> Option<(Id<Zone>, WithDistance<Zone>)> {
    zones
        .iter()
        .filter_map(|zone| {
            zone.content
                .clone()
                .with_distance_to(latitude, longitude)
                .map(|nearest| (zone.id, nearest))
        })
        .min_by(|a, b| a.1.distance_km.total_cmp(&b.1.distance_km))
}
