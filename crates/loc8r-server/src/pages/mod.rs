mod locations;
mod others;

use axum::{
    extract::Request,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use loc8r_api_client::LocationsClient;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::{request_id, RequestId};
use crate::views::GenericTextView;

#[derive(Clone)]
pub struct AppState {
    pub api: LocationsClient,
    /// Key for the static map on the location page; no map when unset.
    pub google_api_key: Option<String>,
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(locations::home_list))
        .route("/location/{locationid}", get(locations::location_info))
        .route(
            "/location/{locationid}/review/new",
            get(locations::add_review).post(locations::submit_review),
        )
        .route("/about", get(others::about))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
                    let id = req
                        .extensions()
                        .get::<RequestId>()
                        .map_or("-", |id| id.0.as_str());
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = id,
                    )
                })),
        )
        .with_state(state)
}

async fn not_found() -> Response {
    render_error_page(404)
}

pub(crate) fn error_view(status: u16) -> GenericTextView {
    if status == 404 {
        GenericTextView {
            title: "404, page not found".to_string(),
            content: "Oh dear. Looks like you can't find this page. Sorry.".to_string(),
        }
    } else {
        GenericTextView {
            title: format!("{status}, something's gone wrong"),
            content: "Something went wrong while processing your request.".to_string(),
        }
    }
}

/// Error page with the response status set to `status`.
///
/// Codes outside the valid HTTP range are sent as 500; the title still
/// shows the code that was asked for.
pub(crate) fn render_error_page(status: u16) -> Response {
    let code = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if code.is_server_error() {
        tracing::warn!(status, "rendering error page");
    }
    (code, Html(error_view(status).render())).into_response()
}

#[cfg(test)]
#[path = "../pages_test.rs"]
mod tests;
