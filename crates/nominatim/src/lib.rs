use std::error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use model::zone::Location;
use serde::Deserialize;

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Nominatim rejects requests without an identifying user agent.
pub const USER_AGENT: &str = "taximap-client";

#[derive(Debug, Clone)]
pub enum GeocodeError {
    Request(Arc<reqwest::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
    },
    /// The query produced zero candidates.
    NoMatch(String),
    /// A candidate was returned but its coordinates were not numeric.
    InvalidCoordinates(String),
}

impl error::Error for GeocodeError {}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GeocodeError::Request(e) => write!(f, "geocoding request failed: {}", e),
            GeocodeError::InvalidResponse { status_code, url } => {
                write!(f, "geocoding service answered {} for {}", status_code, url)
            }
            GeocodeError::NoMatch(query) => {
                write!(f, "no location found for '{}'", query)
            }
            GeocodeError::InvalidCoordinates(query) => {
                write!(f, "unusable coordinates in geocoding result for '{}'", query)
            }
        }
    }
}

impl From<reqwest::Error> for GeocodeError {
    fn from(e: reqwest::Error) -> Self {
        GeocodeError::Request(Arc::new(e))
    }
}

/// One geocoding candidate. Nominatim reports coordinates as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Seam for the address lookup collaborator; the application never talks to
/// the HTTP client directly, so tests can substitute a fixed resolver.
#[async_trait]
pub trait Geocoder {
    async fn lookup(&self, query: &str) -> Result<Location, GeocodeError>;
}

pub struct NominatimClient {
    base_url: String,
    client: reqwest::Client,
}

impl NominatimClient {
    pub fn new() -> Self {
        Self::with_base_url(NOMINATIM_URL)
    }

    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl Default for NominatimClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn lookup(&self, query: &str) -> Result<Location, GeocodeError> {
        log::info!("Geocoding '{query}'.");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(GeocodeError::InvalidResponse {
                status_code: response.status(),
                url: self.base_url.clone(),
            });
        }

        let candidates: Vec<Candidate> = response.json().await?;
        first_location(candidates, query)
    }
}

/// Only the first candidate is used; everything else is discarded.
pub fn first_location(
    candidates: Vec<Candidate>,
    query: &str,
) -> Result<Location, GeocodeError> {
    let candidate = candidates
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NoMatch(query.to_owned()))?;
    let latitude = candidate.lat.parse::<f64>();
    let longitude = candidate.lon.parse::<f64>();
    match (latitude, longitude) {
        (Ok(latitude), Ok(longitude)) => Ok(Location {
            latitude,
            longitude,
        }),
        _ => Err(GeocodeError::InvalidCoordinates(query.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_candidate_wins() {
        let candidates: Vec<Candidate> = serde_json::from_str(
            r#"[{"lat":"40.7589","lon":"-73.9851","display_name":"Times Square"},
                {"lat":"0.0","lon":"0.0"}]"#,
        )
        .unwrap();
        let location = first_location(candidates, "times square").unwrap();
        assert_eq!(location.latitude, 40.7589);
        assert_eq!(location.longitude, -73.9851);
    }

    #[test]
    fn empty_candidate_list_is_no_match() {
        let result = first_location(vec![], "nowhere at all");
        assert!(matches!(result, Err(GeocodeError::NoMatch(query)) if query == "nowhere at all"));
    }

    #[test]
    fn garbled_coordinates_are_rejected() {
        let candidates = vec![Candidate {
            lat: "forty".to_owned(),
            lon: "-73.9".to_owned(),
            display_name: None,
        }];
        assert!(matches!(
            first_location(candidates, "x"),
            Err(GeocodeError::InvalidCoordinates(_))
        ));
    }
}
