use std::error;
use std::fmt;
use std::sync::Arc;

use geojson::GeoJson;
use model::{zone::Zone, WithId};
use utility::id::Id;

/// Feature property carrying the integer zone identifier. The source schema
/// is fixed; there is no negotiation.
pub const ZONE_ID_PROPERTY: &str = "location_id";

const ZONE_NAME_PROPERTY: &str = "zone";
const BOROUGH_PROPERTY: &str = "borough";

#[derive(Debug, Clone)]
pub enum ZoneSourceError {
    Io(Arc<std::io::Error>),
    Request(Arc<reqwest::Error>),
    Parse(Arc<geojson::Error>),
    NotAFeatureCollection,
    MissingZoneId { feature_index: usize },
}

impl error::Error for ZoneSourceError {}

impl fmt::Display for ZoneSourceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ZoneSourceError::Io(e) => write!(f, "could not read zone file: {}", e),
            ZoneSourceError::Request(e) => {
                write!(f, "could not fetch zone file: {}", e)
            }
            ZoneSourceError::Parse(e) => write!(f, "invalid GeoJSON: {}", e),
            ZoneSourceError::NotAFeatureCollection => {
                write!(f, "zone file is not a GeoJSON feature collection")
            }
            ZoneSourceError::MissingZoneId { feature_index } => {
                write!(
                    f,
                    "feature {} has no usable '{}' property",
                    feature_index, ZONE_ID_PROPERTY
                )
            }
        }
    }
}

impl From<std::io::Error> for ZoneSourceError {
    fn from(e: std::io::Error) -> Self {
        ZoneSourceError::Io(Arc::new(e))
    }
}

impl From<reqwest::Error> for ZoneSourceError {
    fn from(e: reqwest::Error) -> Self {
        ZoneSourceError::Request(Arc::new(e))
    }
}

impl From<geojson::Error> for ZoneSourceError {
    fn from(e: geojson::Error) -> Self {
        ZoneSourceError::Parse(Arc::new(e))
    }
}

/// Loads the static zone collection from a local path or an http(s) URL.
/// This happens exactly once at startup; zones are immutable afterwards.
pub async fn load(source: &str) -> Result<Vec<WithId<Zone>>, ZoneSourceError> {
    let text = if source.starts_with("http://") || source.starts_with("https://") {
        log::info!("Fetching zone geometry from '{source}'.");
        reqwest::get(source).await?.text().await?
    } else {
        log::info!("Reading zone geometry from '{source}'.");
        tokio::fs::read_to_string(source).await?
    };
    let zones = from_geojson(text.parse::<GeoJson>()?)?;
    log::info!("Loaded {} zones.", zones.len());
    Ok(zones)
}

/// Decodes a feature collection into zones. Features without polygonal
/// geometry are skipped; features without a readable zone id are an error,
/// since every zone must be addressable by the prediction payload.
pub fn from_geojson(
    geojson: GeoJson,
) -> Result<Vec<WithId<Zone>>, ZoneSourceError> {
    let collection = match geojson {
        GeoJson::FeatureCollection(collection) => collection,
        _ => return Err(ZoneSourceError::NotAFeatureCollection),
    };

    let mut zones = Vec::with_capacity(collection.features.len());
    for (feature_index, feature) in collection.features.into_iter().enumerate() {
        let id = feature
            .properties
            .as_ref()
            .and_then(|properties| properties.get(ZONE_ID_PROPERTY))
            .and_then(zone_id_value)
            .ok_or(ZoneSourceError::MissingZoneId { feature_index })?;

        let geometry = match feature.geometry {
            Some(geometry) => geometry,
            None => {
                log::warn!("Zone {id} has no geometry, skipping.");
                continue;
            }
        };
        let geometry: geo_types::Geometry<f64> = match geometry.value.try_into() {
            Ok(geometry) => geometry,
            Err(why) => {
                log::warn!("Zone {id} has unusable geometry ({why}), skipping.");
                continue;
            }
        };
        let multi_polygon = match geometry {
            geo_types::Geometry::Polygon(polygon) => polygon.into(),
            geo_types::Geometry::MultiPolygon(multi_polygon) => multi_polygon,
            _ => {
                log::warn!("Zone {id} is not polygonal, skipping.");
                continue;
            }
        };

        let property = |key: &str| {
            feature
                .properties
                .as_ref()
                .and_then(|properties| properties.get(key))
                .and_then(|value| value.as_str())
                .map(|value| value.to_owned())
        };

        zones.push(WithId::new(
            Id::new(id),
            Zone {
                name: property(ZONE_NAME_PROPERTY).unwrap_or_default(),
                borough: property(BOROUGH_PROPERTY),
                geometry: multi_polygon,
            },
        ));
    }
    Ok(zones)
}

/// The source sometimes stores the id as a number and sometimes as a
/// numeric string.
fn zone_id_value(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(number) => number.as_i64(),
        serde_json::Value::String(string) => string.parse().ok(),
        _ => None,
    }
}
