//! HTML views.
//!
//! Each view struct is the data a page template receives; `render` turns it
//! into a complete HTML document. Text is escaped at the point of insertion.

use std::fmt::Write as _;

use loc8r_core::{LocationDetail, LocationSummary, Review};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

/// Characters left as-is in a path segment: RFC 3986 unreserved.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// `/location/{id}`
pub(crate) fn location_path(location_id: &str) -> String {
    format!(
        "/location/{}",
        utf8_percent_encode(location_id, PATH_SEGMENT)
    )
}

/// `/location/{id}/review/new`, optionally flagged with `?err=val`.
pub(crate) fn review_form_path(location_id: &str, validation_failed: bool) -> String {
    let mut path = format!("{}/review/new", location_path(location_id));
    if validation_failed {
        path.push_str("?err=val");
    }
    path
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageHeader {
    pub title: String,
    pub strapline: Option<String>,
}

/// `locations-list`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LocationsListView {
    pub title: String,
    pub page_header: PageHeader,
    pub sidebar: String,
    pub locations: Vec<LocationSummary>,
    pub message: Option<String>,
}

/// `location-info`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LocationInfoView {
    pub title: String,
    pub page_header: PageHeader,
    pub sidebar_context: String,
    pub sidebar_call_to_action: String,
    pub location: LocationDetail,
    pub api_key: Option<String>,
}

/// `location-review-form`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReviewFormView {
    pub title: String,
    pub page_header: PageHeader,
    pub location: LocationDetail,
    pub error: Option<String>,
}

/// `generic-text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GenericTextView {
    pub title: String,
    pub content: String,
}

impl LocationsListView {
    pub(crate) fn render(&self) -> String {
        let mut body = header_html(&self.page_header);
        body.push_str("<div class=\"row\"><div class=\"col-md-8\">");
        if let Some(message) = &self.message {
            let _ = write!(body, "<p class=\"error\">{}</p>", escape(message));
        }
        for location in &self.locations {
            let _ = write!(
                body,
                "<div class=\"card location\">\
                 <h4><a href=\"{href}\">{name}</a>\
                 <small class=\"rating\">{stars}</small>\
                 <span class=\"badge distance\">{distance}</span></h4>\
                 <p class=\"address\">{address}</p>\
                 <p class=\"facilities\">{facilities}</p></div>",
                href = escape(&location_path(&location.id)),
                name = escape(&location.name),
                stars = stars(location.rating),
                distance = escape(&location.distance),
                address = escape(&location.address),
                facilities = facilities_html(&location.facilities),
            );
        }
        let _ = write!(
            body,
            "</div><div class=\"col-md-4\"><p class=\"lead\">{}</p></div></div>",
            escape(&self.sidebar)
        );
        layout(&self.title, &body)
    }
}

impl LocationInfoView {
    pub(crate) fn render(&self) -> String {
        let location = &self.location;
        let mut body = header_html(&self.page_header);
        let _ = write!(
            body,
            "<div class=\"row\"><div class=\"col-md-8\">\
             <p class=\"rating\">{stars}</p>\
             <p class=\"address\">{address}</p>",
            stars = stars(location.rating),
            address = escape(&location.address),
        );

        if let Some(times) = location.extra.get("openingTimes").and_then(Value::as_array) {
            body.push_str("<div class=\"card opening-times\"><h2>Opening hours</h2>");
            for time in times {
                body.push_str(&opening_time_html(time));
            }
            body.push_str("</div>");
        }

        let _ = write!(
            body,
            "<div class=\"card facilities\"><h2>Facilities</h2>{}</div>",
            facilities_html(&location.facilities)
        );

        if let (Some(coords), Some(key)) = (location.coords, self.api_key.as_deref()) {
            let src = format!(
                "https://maps.googleapis.com/maps/api/staticmap?center={lat},{lng}&zoom=17&size=400x350&markers={lat},{lng}&scale=2&key={key}",
                lat = coords.lat,
                lng = coords.lng,
            );
            let _ = write!(
                body,
                "<div class=\"card map\"><h2>Location map</h2>\
                 <img class=\"img-fluid rounded\" src=\"{}\" alt=\"Map of {}\"></div>",
                escape(&src),
                escape(&location.name),
            );
        }

        let _ = write!(
            body,
            "<div class=\"card reviews\"><h2>Customer reviews</h2>\
             <a class=\"btn btn-primary\" href=\"{}\">Add review</a>",
            escape(&review_form_path(&location.id, false))
        );
        for review in &location.reviews {
            body.push_str(&review_html(review));
        }
        let _ = write!(
            body,
            "</div></div><div class=\"col-md-4\"><p class=\"lead\">{name} {context}</p><p>{cta}</p></div></div>",
            name = escape(&location.name),
            context = escape(&self.sidebar_context),
            cta = escape(&self.sidebar_call_to_action),
        );
        layout(&self.title, &body)
    }
}

impl ReviewFormView {
    pub(crate) fn render(&self) -> String {
        let mut body = header_html(&self.page_header);
        let _ = write!(
            body,
            "<form action=\"{}\" method=\"post\" role=\"form\">",
            escape(&review_form_path(&self.location.id, false))
        );
        if self.error.as_deref() == Some("val") {
            body.push_str(
                "<div class=\"alert alert-danger\" role=\"alert\">All fields required, please try again</div>",
            );
        }
        body.push_str(
            "<div class=\"form-group\"><label for=\"name\">Name</label>\
             <input class=\"form-control\" id=\"name\" name=\"name\" placeholder=\"Enter Name\" required></div>\
             <div class=\"form-group\"><label for=\"rating\">Rating</label>\
             <select class=\"form-control\" id=\"rating\" name=\"rating\">",
        );
        for value in (1..=5).rev() {
            let _ = write!(body, "<option>{value}</option>");
        }
        body.push_str(
            "</select></div>\
             <div class=\"form-group\"><label for=\"review\">Review</label>\
             <textarea class=\"form-control\" id=\"review\" name=\"reviewText\" rows=\"5\"></textarea></div>\
             <button class=\"btn btn-primary\">Add my review</button></form>",
        );
        layout(&self.title, &body)
    }
}

impl GenericTextView {
    pub(crate) fn render(&self) -> String {
        let body = format!(
            "<div class=\"row\"><div class=\"col-12\"><h1>{}</h1><p>{}</p></div></div>",
            escape(&self.title),
            escape(&self.content)
        );
        layout(&self.title, &body)
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{title}</title></head><body>\
         <nav class=\"navbar\"><a class=\"navbar-brand\" href=\"/\">Loc8r</a>\
         <a class=\"nav-link\" href=\"/about\">About</a></nav>\
         <main class=\"container\">{body}</main></body></html>",
        title = escape(title),
    )
}

fn header_html(header: &PageHeader) -> String {
    match &header.strapline {
        Some(strapline) => format!(
            "<div class=\"page-header\"><h1>{} <small>{}</small></h1></div>",
            escape(&header.title),
            escape(strapline)
        ),
        None => format!(
            "<div class=\"page-header\"><h1>{}</h1></div>",
            escape(&header.title)
        ),
    }
}

fn facilities_html(facilities: &[String]) -> String {
    facilities
        .iter()
        .map(|f| format!("<span class=\"badge badge-warning\">{}</span>", escape(f)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn opening_time_html(time: &Value) -> String {
    let field = |name: &str| time.get(name).and_then(Value::as_str).unwrap_or_default();
    let hours = if time.get("closed").and_then(Value::as_bool) == Some(true) {
        "closed".to_string()
    } else {
        format!("{} - {}", field("opening"), field("closing"))
    };
    format!(
        "<p>{} : {}</p>",
        escape(field("days")),
        escape(&hours)
    )
}

fn review_html(review: &Review) -> String {
    format!(
        "<div class=\"review\"><div class=\"review-header\">\
         <span class=\"rating\">{stars}</span> <span class=\"reviewAuthor\">{author}</span> \
         <small class=\"reviewTimestamp\">{date}</small></div>\
         <p>{text}</p></div>",
        stars = stars(review.rating),
        author = escape(&review.author),
        date = escape(&review.created_on_display().unwrap_or_default()),
        text = escape(&review.review_text).replace('\n', "<br>"),
    )
}

/// Five-star rating strip, e.g. `★★★☆☆` for 3.
fn stars(rating: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = rating.round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Escapes text for element content and double-quoted attributes.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
