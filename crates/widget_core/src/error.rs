use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("forecast request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("forecast endpoint returned {status}")]
    Status { status: StatusCode },
    #[error("forecast body could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("tracking request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("tracking endpoint returned {status}")]
    Status { status: StatusCode },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("anchor selector is empty")]
    Empty,
    #[error("anchor selector {selector:?} must be a chain of `.class` parts")]
    Unsupported { selector: String },
}
