//! Wire types for the flight analytics API.
//!
//! Every field is optional on the wire. The server builds these payloads from
//! whatever the last scrape produced, so a missing or `null` field degrades to
//! its default instead of failing the whole decode.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One flight row as emitted by the server.
///
/// Rows are heterogeneous column maps. Key order is preserved exactly as
/// received, which matters for table headers and for exact row matching.
pub type Row = Map<String, Value>;

/// Aggregated analytics returned by `GET /api/analyze`.
///
/// Fields the dashboard never displays (duration histogram, per-airline
/// counts, earliest and latest flight) are skipped on decode.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsPayload {
    pub total_flights: Option<u64>,
    pub busiest_day: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub top_airlines: Vec<AirlinePrice>,
    #[serde(deserialize_with = "finite_numbers")]
    pub price_hist: Vec<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub co2_by_airline: Vec<AirlineCo2>,
    #[serde(deserialize_with = "null_as_default")]
    pub stops_count: BTreeMap<String, u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub top_cheapest: Vec<Row>,
    #[serde(deserialize_with = "null_as_default")]
    pub sample_data: Vec<Row>,
    #[serde(deserialize_with = "null_as_default")]
    pub all_flights: Vec<Row>,
    /// Set by the server instead of the analytics when no scrape data exists.
    pub error: Option<String>,
}

/// Average ticket price for one airline.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AirlinePrice {
    #[serde(rename = "Airline Company")]
    pub airline: String,
    #[serde(rename = "Price")]
    pub price: Option<f64>,
}

/// Average CO2 emission for one airline, in kilograms.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AirlineCo2 {
    #[serde(rename = "Airline Company")]
    pub airline: String,
    #[serde(rename = "CO2")]
    pub co2: Option<f64>,
}

/// Response of `GET /api/ai-insight`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AiInsightPayload {
    pub ai_insights: Option<String>,
    pub error: Option<String>,
}

impl AiInsightPayload {
    /// Markdown text, if the server produced any.
    pub fn text(&self) -> Option<&str> {
        self.ai_insights.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Body of `POST /api/scrape`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub origin: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub filename: String,
}

/// Response of `POST /api/scrape`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrapeResponse {
    pub status: Option<String>,
    pub details: Option<String>,
}

/// Response of `GET /api/dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerStatus {
    pub status: String,
    pub data_available: bool,
    pub csv_path: Option<String>,
    pub endpoints: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keeps only finite numbers. The server serializes NaN and infinity as null.
fn finite_numbers<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .filter_map(Value::as_f64)
        .filter(|v| v.is_finite())
        .collect())
}
