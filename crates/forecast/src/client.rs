use std::env;

use async_trait::async_trait;

use crate::{
    wire::{PredictionRequest, PredictionResponse},
    ForecastError,
};

pub const PREDICT_ENDPOINT: &str = "predict_by_coordinates";

pub const BASE_URL_ENV: &str = "TAXIMAP_PREDICTOR_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct PredictorConfig {
    pub base_url: String,
}

impl PredictorConfig {
    pub fn env() -> Self {
        Self {
            base_url: env::var(BASE_URL_ENV)
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned()),
        }
    }

    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            PREDICT_ENDPOINT
        )
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

/// Seam for the prediction collaborator, so the application state can be
/// driven by a canned predictor in tests.
#[async_trait]
pub trait DemandPredictor {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, ForecastError>;
}

pub struct PredictionClient {
    config: PredictorConfig,
    client: reqwest::Client,
}

impl PredictionClient {
    pub fn new(config: PredictorConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl DemandPredictor for PredictionClient {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, ForecastError> {
        let url = self.config.endpoint_url();
        log::info!(
            "Requesting prediction for ({}, {}) at '{}'.",
            request.latitude,
            request.longitude,
            request.datetime_str
        );
        let response = self.client.post(&url).json(request).send().await?;

        match response.status() {
            reqwest::StatusCode::OK => {
                Ok(serde_json::from_str(&response.text().await?)?)
            }
            other => match response.text().await {
                Ok(val) => Err(ForecastError::InvalidResponse {
                    status_code: other,
                    url,
                    response: Some(val),
                }),
                Err(_) => Err(ForecastError::InvalidResponse {
                    status_code: other,
                    url,
                    response: None,
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_handles_trailing_slashes() {
        let config = PredictorConfig {
            base_url: "http://localhost:8000/".to_owned(),
        };
        assert_eq!(
            config.endpoint_url(),
            "http://localhost:8000/predict_by_coordinates"
        );
        assert_eq!(
            PredictorConfig::default().endpoint_url(),
            "http://localhost:8000/predict_by_coordinates"
        );
    }
}
