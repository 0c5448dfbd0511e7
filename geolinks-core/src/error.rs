use geolinks_fetch::FetchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Map bounds are null or undefined")]
    MissingBounds,

    #[error("Fetch error: {0}")]
    FetchError(#[from] FetchError),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GeoError>;
