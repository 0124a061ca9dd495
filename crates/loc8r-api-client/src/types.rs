use loc8r_core::{lenient, lenient_list, Distance};
use serde::Deserialize;

/// Query for `GET /api/locations`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    pub lng: f64,
    pub lat: f64,
    /// Search radius in meters.
    pub max_distance: u32,
}

/// One element of the `GET /api/locations` array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NearbyLocation {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "lenient")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient")]
    pub rating: f64,
    #[serde(default, deserialize_with = "lenient_list")]
    pub facilities: Vec<String>,
    /// Meters from the query point; a number or a numeric string.
    #[serde(default, deserialize_with = "lenient")]
    pub distance: Option<Distance>,
}
