use axum::{
    extract::{rejection::FormRejection, rejection::QueryRejection, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use loc8r_api_client::{ApiError, LocationsClient, NearbyLocation, NearbyQuery};
use loc8r_core::{
    format_distance, Distance, LocationDetail, LocationSummary, ReviewForm, ReviewSubmission,
};
use serde::Deserialize;

use crate::views::{
    location_path, review_form_path, LocationInfoView, LocationsListView, PageHeader,
    ReviewFormView,
};

use super::{render_error_page, AppState};

/// Point the home list searches around.
const HOME_LNG: f64 = 127.2656;
const HOME_LAT: f64 = 37.0087;
const MAX_DISTANCE_METERS: u32 = 20_000;

const NO_PLACES_MESSAGE: &str = "No places found nearby";
const LOOKUP_ERROR_MESSAGE: &str = "API lookup error";

const HOME_SIDEBAR: &str = "Looking for wifi and a seat? Loc8r helps you find places to work when out and about. \
Perhaps with coffee, cake or a pint? Let Loc8r help you find the place you're looking for.";
const DETAIL_SIDEBAR_CONTEXT: &str = "is on Loc8r because it has accessible wifi and space to sit down with your laptop and get some work done.";
const DETAIL_SIDEBAR_CALL_TO_ACTION: &str = "If you've been and you like it - or if you don't - please leave a review to help other people just like you.";

#[derive(Debug, Default, Deserialize)]
pub(super) struct ReviewFormQuery {
    err: Option<String>,
}

pub(super) async fn home_list(State(state): State<AppState>) -> Html<String> {
    Html(list_nearby(&state.api).await.render())
}

/// Builds the home list. Upstream failures never escape: they become the
/// page's inline message and the list is left empty.
pub(super) async fn list_nearby(api: &LocationsClient) -> LocationsListView {
    let query = NearbyQuery {
        lng: HOME_LNG,
        lat: HOME_LAT,
        max_distance: MAX_DISTANCE_METERS,
    };

    let (locations, message) = match api.list_nearby(&query).await {
        Ok(items) if items.is_empty() => (Vec::new(), Some(NO_PLACES_MESSAGE.to_string())),
        Ok(items) => (items.into_iter().map(summarize).collect(), None),
        Err(ApiError::Transport(e)) => {
            tracing::error!(error = %e, "location list lookup failed");
            (Vec::new(), Some(LOOKUP_ERROR_MESSAGE.to_string()))
        }
        Err(ApiError::UpstreamStatus { status: 404, .. }) => {
            (Vec::new(), Some(NO_PLACES_MESSAGE.to_string()))
        }
        Err(e) => {
            let status = e.status().unwrap_or(0);
            (
                Vec::new(),
                Some(format!("Unexpected API response: {status}")),
            )
        }
    };

    LocationsListView {
        title: "Loc8r - find a place to work with wifi".to_string(),
        page_header: PageHeader {
            title: "Loc8r".to_string(),
            strapline: Some("Find places to work with wifi near you!".to_string()),
        },
        sidebar: HOME_SIDEBAR.to_string(),
        locations,
        message,
    }
}

fn summarize(item: NearbyLocation) -> LocationSummary {
    LocationSummary {
        id: item.id,
        name: item.name,
        address: item.address,
        rating: item.rating,
        facilities: item.facilities,
        distance: format_distance(item.distance.unwrap_or(Distance::Meters(f64::NAN))),
    }
}

/// Fetches one location, or the error page to answer with instead.
///
/// A transport failure is a 500; any other upstream failure keeps the
/// upstream status.
async fn fetch_location(
    api: &LocationsClient,
    location_id: &str,
) -> Result<LocationDetail, Response> {
    match api.location_detail(location_id).await {
        Ok(location) => Ok(location),
        Err(ApiError::Transport(e)) => {
            tracing::error!(error = %e, location_id, "location detail lookup failed");
            Err(render_error_page(500))
        }
        Err(e) => Err(render_error_page(e.status().unwrap_or(500))),
    }
}

pub(super) async fn location_info(
    State(state): State<AppState>,
    Path(location_id): Path<String>,
) -> Response {
    match fetch_location(&state.api, &location_id).await {
        Ok(location) => Html(detail_view(location, state.google_api_key.clone()).render())
            .into_response(),
        Err(page) => page,
    }
}

fn detail_view(location: LocationDetail, api_key: Option<String>) -> LocationInfoView {
    LocationInfoView {
        title: location.name.clone(),
        page_header: PageHeader {
            title: location.name.clone(),
            strapline: None,
        },
        sidebar_context: DETAIL_SIDEBAR_CONTEXT.to_string(),
        sidebar_call_to_action: DETAIL_SIDEBAR_CALL_TO_ACTION.to_string(),
        location,
        api_key,
    }
}

pub(super) async fn add_review(
    State(state): State<AppState>,
    Path(location_id): Path<String>,
    query: Result<Query<ReviewFormQuery>, QueryRejection>,
) -> Response {
    let query = query.map(|Query(query)| query).unwrap_or_default();
    match fetch_location(&state.api, &location_id).await {
        Ok(location) => Html(review_form_view(location, query.err).render()).into_response(),
        Err(page) => page,
    }
}

fn review_form_view(location: LocationDetail, error: Option<String>) -> ReviewFormView {
    ReviewFormView {
        title: format!("Review {} on Loc8r", location.name),
        page_header: PageHeader {
            title: format!("Review {}", location.name),
            strapline: None,
        },
        location,
        error,
    }
}

/// Validates the posted form locally, then forwards it to the API.
///
/// An unreadable form body counts as an empty form, so it takes the same
/// validation redirect as a form with missing fields.
pub(super) async fn submit_review(
    State(state): State<AppState>,
    Path(location_id): Path<String>,
    form: Result<Form<ReviewForm>, FormRejection>,
) -> Response {
    let form = form.map(|Form(form)| form).unwrap_or_default();

    let review = match ReviewSubmission::from_form(&form) {
        Ok(review) => review,
        Err(e) => {
            tracing::info!(error = %e, location_id, "review rejected before submission");
            return Redirect::to(&review_form_path(&location_id, true)).into_response();
        }
    };

    match state.api.add_review(&location_id, &review).await {
        Ok(()) => Redirect::to(&location_path(&location_id)).into_response(),
        Err(e) if e.is_validation_error() => {
            tracing::info!(location_id, "review rejected by API validation");
            Redirect::to(&review_form_path(&location_id, true)).into_response()
        }
        Err(ApiError::Transport(e)) => {
            tracing::error!(error = %e, location_id, "review submission failed");
            render_error_page(500)
        }
        Err(e) => render_error_page(e.status().unwrap_or(500)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(base_url: &str) -> LocationsClient {
        LocationsClient::new(base_url, 5).expect("client")
    }

    #[tokio::test]
    async fn list_nearby_404_renders_empty_list_with_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/locations"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let view = list_nearby(&client(&server.uri())).await;
        assert!(view.locations.is_empty());
        assert_eq!(view.message.as_deref(), Some("No places found nearby"));
    }

    #[tokio::test]
    async fn list_nearby_empty_array_matches_404_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/locations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let view = list_nearby(&client(&server.uri())).await;
        assert!(view.locations.is_empty());
        assert_eq!(view.message.as_deref(), Some("No places found nearby"));
    }

    #[tokio::test]
    async fn list_nearby_maps_items_and_formats_distance() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/locations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "_id": "a", "name": "Starcups", "address": "High St", "rating": 3,
                  "facilities": ["Wifi"], "distance": 1500 },
                { "_id": "b", "name": "Cafe Hero", "address": "Low St", "rating": 4,
                  "facilities": [], "distance": "999.9" }
            ])))
            .mount(&server)
            .await;

        let view = list_nearby(&client(&server.uri())).await;
        assert!(view.message.is_none());
        assert_eq!(view.locations.len(), 2);
        assert_eq!(view.locations[0].id, "a");
        assert_eq!(view.locations[0].distance, "1.5km");
        assert_eq!(view.locations[1].distance, "999m");
    }

    #[tokio::test]
    async fn list_nearby_keeps_items_with_null_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/locations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "_id": "a", "name": "Starcups", "rating": 3, "distance": 2250 },
                { "_id": "b", "name": "Cafe Hero", "rating": null, "distance": 80 }
            ])))
            .mount(&server)
            .await;

        let view = list_nearby(&client(&server.uri())).await;
        assert!(view.message.is_none());
        assert_eq!(view.locations.len(), 2);
        assert_eq!(view.locations[0].distance, "2.3km");
        assert_eq!(view.locations[1].name, "Cafe Hero");
        assert_eq!(view.locations[1].distance, "80m");
    }

    #[tokio::test]
    async fn list_nearby_other_status_reports_it() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/locations"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let view = list_nearby(&client(&server.uri())).await;
        assert!(view.locations.is_empty());
        assert_eq!(
            view.message.as_deref(),
            Some("Unexpected API response: 503")
        );
    }

    #[tokio::test]
    async fn list_nearby_non_array_200_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/locations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "oops": true })))
            .mount(&server)
            .await;

        let view = list_nearby(&client(&server.uri())).await;
        assert_eq!(
            view.message.as_deref(),
            Some("Unexpected API response: 200")
        );
    }

    #[tokio::test]
    async fn list_nearby_transport_error_reports_lookup_error() {
        let view = list_nearby(&client("http://127.0.0.1:1")).await;
        assert!(view.locations.is_empty());
        assert_eq!(view.message.as_deref(), Some("API lookup error"));
    }

    #[test]
    fn summarize_without_distance_is_nan_meters() {
        let item = NearbyLocation {
            id: "a".to_string(),
            name: "Starcups".to_string(),
            address: String::new(),
            rating: 0.0,
            facilities: Vec::new(),
            distance: None,
        };
        assert_eq!(summarize(item).distance, "NaNm");
    }

    #[test]
    fn review_form_view_titles_use_location_name() {
        let location: LocationDetail =
            serde_json::from_value(json!({ "_id": "a", "name": "Starcups" })).unwrap();
        let view = review_form_view(location, Some("val".to_string()));
        assert_eq!(view.title, "Review Starcups on Loc8r");
        assert_eq!(view.page_header.title, "Review Starcups");
        assert_eq!(view.error.as_deref(), Some("val"));
    }

    #[test]
    fn detail_view_carries_api_key() {
        let location: LocationDetail =
            serde_json::from_value(json!({ "_id": "a", "name": "Starcups" })).unwrap();
        let view = detail_view(location, Some("maps-key".to_string()));
        assert_eq!(view.title, "Starcups");
        assert_eq!(view.api_key.as_deref(), Some("maps-key"));
    }
}
