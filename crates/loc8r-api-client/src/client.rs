//! HTTP client for the Loc8r locations REST API.
//!
//! Each method issues exactly one request and maps the outcome into a typed
//! result. Non-success statuses are returned as [`ApiError::UpstreamStatus`]
//! with the parsed body attached so callers can decide how to present them.

use std::time::Duration;

use loc8r_core::{LocationDetail, ReviewSubmission};
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;

use crate::error::ApiError;
use crate::types::{NearbyLocation, NearbyQuery};

/// Client for the upstream locations API.
///
/// Cloning is cheap; the underlying `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct LocationsClient {
    client: Client,
    base_url: Url,
}

impl LocationsClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ApiError::InvalidBaseUrl`] if `base_url`
    /// is not an absolute http(s) URL.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("loc8r/0.1 (web front end)")
            .build()?;

        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            ApiError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            }
        })?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "expected an absolute http(s) URL".to_string(),
            });
        }

        Ok(Self { client, base_url })
    }

    /// Lists locations near a point.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] on network failure.
    /// - [`ApiError::UpstreamStatus`] for any status other than 200.
    /// - [`ApiError::UnexpectedBody`] when a 200 body is not an array. Elements
    ///   that are not location objects are skipped.
    pub async fn list_nearby(&self, query: &NearbyQuery) -> Result<Vec<NearbyLocation>, ApiError> {
        let mut url = self.endpoint(&["api", "locations"]);
        url.query_pairs_mut()
            .append_pair("lng", &query.lng.to_string())
            .append_pair("lat", &query.lat.to_string())
            .append_pair("maxDistance", &query.max_distance.to_string());

        tracing::debug!(url = %url, "listing nearby locations");
        let response = self.client.get(url).send().await?;
        let (status, body) = read_json(response).await?;
        if status != StatusCode::OK {
            return Err(upstream_status(status, body, "GET /api/locations"));
        }

        let Some(Value::Array(items)) = body else {
            return Err(ApiError::UnexpectedBody {
                status: status.as_u16(),
                context: "GET /api/locations".to_string(),
            });
        };

        // Each element maps on its own so one malformed entry cannot empty the list.
        Ok(items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<NearbyLocation>(item) {
                Ok(location) => Some(location),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping location list item with unexpected shape");
                    None
                }
            })
            .collect())
    }

    /// Reads one location. Its `coords` come back normalized to `{lng, lat}`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] on network failure.
    /// - [`ApiError::UpstreamStatus`] for any status other than 200.
    /// - [`ApiError::UnexpectedBody`] when a 200 carries no location object.
    pub async fn location_detail(&self, location_id: &str) -> Result<LocationDetail, ApiError> {
        let url = self.endpoint(&["api", "locations", location_id]);
        let context = format!("GET /api/locations/{location_id}");

        tracing::debug!(url = %url, "reading location detail");
        let response = self.client.get(url).send().await?;
        let (status, body) = read_json(response).await?;
        if status != StatusCode::OK {
            return Err(upstream_status(status, body, &context));
        }

        match body {
            Some(detail @ Value::Object(_)) => serde_json::from_value(detail).map_err(|e| {
                tracing::warn!(error = %e, location_id, "location detail did not match the expected shape");
                ApiError::UnexpectedBody {
                    status: status.as_u16(),
                    context,
                }
            }),
            _ => Err(ApiError::UnexpectedBody {
                status: status.as_u16(),
                context,
            }),
        }
    }

    /// Posts a review for a location. Only `201 Created` counts as success.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] on network failure.
    /// - [`ApiError::UpstreamStatus`] for any status other than 201; see
    ///   [`ApiError::is_validation_error`] for the API's own validation failures.
    pub async fn add_review(
        &self,
        location_id: &str,
        review: &ReviewSubmission,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "locations", location_id, "reviews"]);

        tracing::debug!(url = %url, "posting review");
        let response = self.client.post(url).json(review).send().await?;
        let (status, body) = read_json(response).await?;
        if status == StatusCode::CREATED {
            return Ok(());
        }

        Err(upstream_status(
            status,
            body,
            &format!("POST /api/locations/{location_id}/reviews"),
        ))
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Reads the status and, when present and valid, the JSON body.
///
/// An empty or non-JSON body is `None` rather than an error: the status alone
/// decides what the caller does with it.
async fn read_json(response: Response) -> Result<(StatusCode, Option<Value>), ApiError> {
    let status = response.status();
    let text = response.text().await?;
    let body = if text.trim().is_empty() {
        None
    } else {
        serde_json::from_str::<Value>(&text)
            .ok()
            .filter(|v| !v.is_null())
    };
    Ok((status, body))
}

fn upstream_status(status: StatusCode, body: Option<Value>, context: &str) -> ApiError {
    tracing::warn!(status = status.as_u16(), context, "upstream API returned unexpected status");
    ApiError::UpstreamStatus {
        status: status.as_u16(),
        body,
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
