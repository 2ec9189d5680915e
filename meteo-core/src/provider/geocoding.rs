use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::MeteoError,
    model::GeoResult,
    provider::{lenient, truncate_body},
};

use super::Geocoder;

/// Upper bound on candidates returned per search.
pub const RESULT_COUNT: usize = 5;

/// Client for the Open-Meteo geocoding search endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    base_url: String,
    http: Client,
}

impl OpenMeteoGeocoder {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self { base_url: base_url.into(), http }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeocodingResponse {
    #[serde(deserialize_with = "lenient::records")]
    results: Option<Vec<RawPlace>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPlace {
    #[serde(deserialize_with = "lenient::opt_i64")]
    id: Option<i64>,
    #[serde(deserialize_with = "lenient::opt_string")]
    name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    country: Option<String>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    latitude: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    longitude: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_string")]
    admin1: Option<String>,
}

impl From<RawPlace> for GeoResult {
    fn from(raw: RawPlace) -> Self {
        Self {
            id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            country: raw.country.unwrap_or_default(),
            latitude: raw.latitude.unwrap_or_default(),
            longitude: raw.longitude.unwrap_or_default(),
            admin1: raw.admin1.filter(|a| !a.is_empty()),
        }
    }
}

fn parse_results(body: &str) -> Result<Vec<GeoResult>, MeteoError> {
    let parsed: GeocodingResponse = serde_json::from_str(body)?;

    Ok(parsed
        .results
        .unwrap_or_default()
        .into_iter()
        .take(RESULT_COUNT)
        .map(GeoResult::from)
        .collect())
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<GeoResult>, MeteoError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let count = RESULT_COUNT.to_string();
        tracing::debug!(query, "searching places");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("name", query),
                ("count", count.as_str()),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, body = %truncate_body(&body), "geocoding request failed");
            return Err(MeteoError::SearchFailed { status: status.as_u16() });
        }

        let results = parse_results(&body)?;
        tracing::debug!(query, count = results.len(), "geocoding returned candidates");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_results_key_is_empty() {
        assert!(parse_results(r#"{"generationtime_ms": 0.5}"#).unwrap().is_empty());
        assert!(parse_results(r#"{"results": null}"#).unwrap().is_empty());
    }

    #[test]
    fn absent_fields_default_safely() {
        let results = parse_results(
            r#"{"results": [{"id": 7, "name": "Nowhere", "latitude": 1.5, "longitude": null}]}"#,
        )
        .unwrap();

        assert_eq!(
            results,
            vec![GeoResult {
                id: 7,
                name: "Nowhere".into(),
                country: String::new(),
                latitude: 1.5,
                longitude: 0.0,
                admin1: None,
            }]
        );
    }

    #[test]
    fn results_are_capped() {
        let places: Vec<_> = (0..8)
            .map(|i| serde_json::json!({"id": i, "name": format!("P{i}"), "country": "X"}))
            .collect();
        let body = serde_json::json!({ "results": places }).to_string();

        let results = parse_results(&body).unwrap();
        assert_eq!(results.len(), RESULT_COUNT);
        assert_eq!(results[0].name, "P0");
    }

    #[test]
    fn wrongly_typed_place_fields_degrade() {
        let body = serde_json::json!({
            "results": [
                {"id": 2988507.0, "name": "Paris", "country": 33, "latitude": "48.85",
                 "longitude": 2.35, "admin1": ["Île-de-France"]},
                "not a place",
                {"id": "x", "name": "Lyon", "country": "France"}
            ]
        })
        .to_string();

        let results = parse_results(&body).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 2988507);
        assert_eq!(results[0].country, "");
        assert_eq!(results[0].latitude, 0.0);
        assert_eq!(results[0].longitude, 2.35);
        assert_eq!(results[0].admin1, None);
        assert_eq!(results[1].id, 0);
        assert_eq!(results[1].name, "Lyon");

        assert!(parse_results(r#"{"results": "none"}"#).unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_query_short_circuits() {
        // An unroutable base URL proves no request is attempted.
        let geocoder = OpenMeteoGeocoder::new("http://127.0.0.1:9/never", Client::new());
        assert!(geocoder.search("   ").await.unwrap().is_empty());
        assert!(geocoder.search("").await.unwrap().is_empty());
    }
}
