use std::error;
use std::fmt;
use std::sync::Arc;

pub mod client;
pub mod series;
pub mod time;
pub mod wire;

#[derive(Debug, Clone)]
pub enum ForecastError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
}

impl error::Error for ForecastError {}

impl fmt::Display for ForecastError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ForecastError::RequestError(e) => {
                write!(f, "HTTP request error: {}", e)
            }
            ForecastError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ForecastError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, url, text)
                }
                None => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
        }
    }
}

impl From<reqwest::Error> for ForecastError {
    fn from(e: reqwest::Error) -> Self {
        ForecastError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(e: serde_json::Error) -> Self {
        ForecastError::JsonError(Arc::new(e))
    }
}
