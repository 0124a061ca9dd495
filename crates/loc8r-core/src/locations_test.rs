use serde_json::json;

use super::*;

#[test]
fn format_distance_keeps_meters_up_to_one_kilometre() {
    assert_eq!(format_distance(500.0), "500m");
    assert_eq!(format_distance(1000.0), "1000m");
    assert_eq!(format_distance(0.0), "0m");
}

#[test]
fn format_distance_floors_meters() {
    assert_eq!(format_distance(999.9), "999m");
    assert_eq!(format_distance(12.01), "12m");
}

#[test]
fn format_distance_switches_to_kilometres_above_1000() {
    assert_eq!(format_distance(1500.0), "1.5km");
    assert_eq!(format_distance(1000.4), "1.0km");
    assert_eq!(format_distance(1_000_000.0), "1000.0km");
}

#[test]
fn format_distance_rounds_kilometre_halves_up() {
    assert_eq!(format_distance(1250.0), "1.3km");
    assert_eq!(format_distance(1750.0), "1.8km");
    assert_eq!(format_distance(2250.0), "2.3km");
    assert_eq!(format_distance(1049.999), "1.0km");
}

#[test]
fn format_distance_reads_strings_like_parse_float() {
    assert_eq!(format_distance("1.5e3"), "1.5km");
    assert_eq!(format_distance("2e3m"), "2.0km");
    assert_eq!(format_distance("12e"), "12m");
    assert_eq!(format_distance(".5"), "0m");
    assert_eq!(format_distance("-"), "NaNm");
    assert_eq!(format_distance("."), "NaNm");
    assert_eq!(format_distance("inf"), "NaNm");
    assert_eq!(format_distance("nan"), "NaNm");
    assert_eq!(format_distance("Infinity"), "Infinitykm");
    assert_eq!(format_distance("-Infinity"), "-Infinitym");
}

#[test]
fn format_distance_long_garbage_string_is_nan() {
    let garbage = "x".repeat(100_000);
    assert_eq!(format_distance(garbage.as_str()), "NaNm");
    let long_number = format!("7{}", "0".repeat(2)) + &"z".repeat(100_000);
    assert_eq!(format_distance(long_number), "700m");
}

#[test]
fn format_distance_accepts_numeric_strings() {
    assert_eq!(format_distance("2500"), "2.5km");
    assert_eq!(format_distance(" 730.6"), "730m");
    assert_eq!(format_distance("1200m"), "1.2km");
}

#[test]
fn format_distance_non_numeric_string_is_nan() {
    assert_eq!(format_distance("far away"), "NaNm");
}

#[test]
fn format_distance_small_negative_fraction_is_not_negative_zero() {
    assert_eq!(format_distance(-0.0), "0m");
}

#[test]
fn distance_deserializes_from_number_or_string() {
    let n: Distance = serde_json::from_value(json!(1234.5)).unwrap();
    let s: Distance = serde_json::from_value(json!("1234.5")).unwrap();
    assert_eq!(n.meters(), 1234.5);
    assert_eq!(s.meters(), 1234.5);
}

#[test]
fn normalize_coords_from_geojson_point() {
    let raw = json!({ "type": "Point", "coordinates": [10, 20] });
    assert_eq!(
        normalize_coords(&raw),
        Some(Coords {
            lng: 10.0,
            lat: 20.0
        })
    );
}

#[test]
fn normalize_coords_from_pair() {
    assert_eq!(
        normalize_coords(&json!([10, 20])),
        Some(Coords {
            lng: 10.0,
            lat: 20.0
        })
    );
}

#[test]
fn normalize_coords_keeps_normalized_shape() {
    assert_eq!(
        normalize_coords(&json!({ "lng": -0.12, "lat": 51.5 })),
        Some(Coords {
            lng: -0.12,
            lat: 51.5
        })
    );
}

#[test]
fn normalize_coords_rejects_other_shapes() {
    assert_eq!(normalize_coords(&json!({ "type": "LineString" })), None);
    assert_eq!(normalize_coords(&json!([10])), None);
    assert_eq!(normalize_coords(&json!(["a", "b"])), None);
    assert_eq!(normalize_coords(&json!("10,20")), None);
}

#[test]
fn location_detail_normalizes_point_coords() {
    let detail: LocationDetail = serde_json::from_value(json!({
        "_id": "abc123",
        "name": "Starcups",
        "coords": { "type": "Point", "coordinates": [10, 20] }
    }))
    .expect("detail should deserialize");
    assert_eq!(
        detail.coords,
        Some(Coords {
            lng: 10.0,
            lat: 20.0
        })
    );
    assert_eq!(detail.id, "abc123");
}

#[test]
fn location_detail_normalizes_pair_coords() {
    let detail: LocationDetail =
        serde_json::from_value(json!({ "_id": "abc123", "coords": [10, 20] })).unwrap();
    assert_eq!(
        detail.coords,
        Some(Coords {
            lng: 10.0,
            lat: 20.0
        })
    );
}

#[test]
fn location_detail_without_coords_is_untouched() {
    let detail: LocationDetail = serde_json::from_value(json!({
        "_id": "abc123",
        "name": "Cafe Hero",
        "address": "125 High Street",
        "rating": 4,
        "facilities": ["Hot drinks", "Wifi"]
    }))
    .unwrap();
    assert!(detail.coords.is_none());
    assert_eq!(detail.name, "Cafe Hero");
    assert_eq!(detail.facilities, vec!["Hot drinks", "Wifi"]);
}

#[test]
fn location_detail_keeps_unknown_fields() {
    let detail: LocationDetail = serde_json::from_value(json!({
        "_id": "abc123",
        "openingTimes": [{ "days": "Monday - Friday", "opening": "7:00am", "closing": "7:00pm", "closed": false }]
    }))
    .unwrap();
    assert!(detail.extra.contains_key("openingTimes"));
}

#[test]
fn review_dates_parse_and_format() {
    let review: Review = serde_json::from_value(json!({
        "author": "Simon Holmes",
        "rating": 5,
        "reviewText": "What a great place.",
        "createdOn": "2017-02-16T00:00:00.000Z"
    }))
    .unwrap();
    assert_eq!(review.created_on_display().as_deref(), Some("16 February 2017"));
}

#[test]
fn review_with_unparseable_date_still_deserializes() {
    let review: Review = serde_json::from_value(json!({
        "author": "Charlie",
        "rating": 3,
        "reviewText": "Fine.",
        "createdOn": "last tuesday"
    }))
    .unwrap();
    assert!(review.created_on.is_none());
}

#[test]
fn location_detail_null_fields_fall_back_to_defaults() {
    let detail: LocationDetail = serde_json::from_value(json!({
        "_id": "abc123",
        "name": null,
        "rating": null,
        "facilities": ["Wifi", null],
        "reviews": null
    }))
    .expect("null fields should not fail the detail");
    assert_eq!(detail.name, "");
    assert!(detail.rating.abs() < f64::EPSILON);
    assert_eq!(detail.facilities, vec!["Wifi"]);
    assert!(detail.reviews.is_empty());
}

#[test]
fn review_with_null_fields_still_parses() {
    let review: Review = serde_json::from_value(json!({
        "_id": null,
        "author": "Simon",
        "rating": null,
        "reviewText": null,
        "createdOn": null
    }))
    .expect("review should parse");
    assert_eq!(review.id, None);
    assert_eq!(review.author, "Simon");
    assert_eq!(review.review_text, "");
    assert_eq!(review.created_on, None);
}
