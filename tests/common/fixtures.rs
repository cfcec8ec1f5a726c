//! Row fixtures and mock endpoint builders

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// JSON array of `count` ridership rows, numbered from `start`
///
/// Column shape mirrors the MTA hourly ridership dataset: a timestamp, a
/// station name and a ridership count, all rendered as strings the way
/// Socrata serves them.
pub fn ridership_rows(start: usize, count: usize) -> Value {
    let rows: Vec<Value> = (start..start + count)
        .map(|i| {
            json!({
                "transit_timestamp": format!("2024-01-01T{:02}:00:00", i % 24),
                "station_complex": format!("Station {i}"),
                "ridership": i.to_string(),
            })
        })
        .collect();
    Value::Array(rows)
}

/// Mount a 200 response with `count` rows for the page at `offset`
pub async fn mount_page(server: &MockServer, offset: u64, start: usize, count: usize) {
    Mock::given(method("GET"))
        .and(path("/resource/test.json"))
        .and(query_param("$offset", offset.to_string()))
        .and(query_param("$order", ":id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ridership_rows(start, count)))
        .mount(server)
        .await;
}

/// Mount a non-200 status for the page at `offset`
pub async fn mount_error(server: &MockServer, offset: u64, status: u16) {
    Mock::given(method("GET"))
        .and(path("/resource/test.json"))
        .and(query_param("$offset", offset.to_string()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
