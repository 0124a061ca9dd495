mod app_config;
mod config;
pub mod lenient;
pub mod locations;
pub mod reviews;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, LOCAL_API_BASE, PRODUCTION_API_BASE};
pub use config::{load_app_config, load_app_config_from_env};
pub use lenient::{lenient, lenient_list};
pub use locations::{
    format_distance, normalize_coords, Coords, Distance, LocationDetail, LocationSummary, Review,
};
pub use reviews::{ReviewForm, ReviewSubmission, ValidationError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
