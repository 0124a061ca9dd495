pub mod client;
pub mod error;
pub mod types;

pub use client::LocationsClient;
pub use error::ApiError;
pub use types::{NearbyLocation, NearbyQuery};
