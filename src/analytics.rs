//! Pure transforms from the analytics payload to renderable view models.
//!
//! Nothing here touches the network or the terminal. The dashboard controller
//! calls these functions and hands the results to a [`crate::traits::View`].

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use serde_json::Value;

use crate::payload::{AirlineCo2, AirlinePrice, AnalyticsPayload, Row};

/// Number of bins in the price distribution chart.
pub const HISTOGRAM_BINS: usize = 10;

/// Shown wherever a card has no value to display.
pub const PLACEHOLDER: &str = "N/A";

/// Round half up, so `4999.5` becomes `5000` and `-2.5` becomes `-2`.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Format a rounded amount as a whole number, never printing `-0`.
fn whole(value: f64) -> String {
    let rounded = round_half_up(value);
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded:.0}")
    }
}

/// Format an amount with the currency symbol, rounded to a whole unit.
pub fn format_currency(value: f64, currency: &str) -> String {
    format!("{currency}{}", whole(value))
}

// ==================== Summary Cards ====================

/// Which summary card a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    TotalFlights,
    CheapestPrice,
    BusiestDay,
    MostStops,
}

impl CardKind {
    pub fn label(self) -> &'static str {
        match self {
            CardKind::TotalFlights => "Total Flights",
            CardKind::CheapestPrice => "Cheapest Price",
            CardKind::BusiestDay => "Busiest Day",
            CardKind::MostStops => "Most Stops",
        }
    }
}

/// One headline figure of the summary region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCard {
    pub kind: CardKind,
    pub value: String,
}

impl SummaryCard {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn is_placeholder(&self) -> bool {
        self.value == PLACEHOLDER
    }
}

/// Derive the four summary cards, in display order.
pub fn summary_cards(payload: &AnalyticsPayload, currency: &str) -> [SummaryCard; 4] {
    let total = payload.total_flights.unwrap_or(0).to_string();

    let cheapest = cheapest_price(&payload.top_cheapest)
        .map(|price| format_currency(price, currency))
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let busiest = payload
        .busiest_day
        .as_deref()
        .filter(|day| !day.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string();

    let stops = most_stops(&payload.stops_count)
        .unwrap_or(PLACEHOLDER)
        .to_string();

    [
        SummaryCard {
            kind: CardKind::TotalFlights,
            value: total,
        },
        SummaryCard {
            kind: CardKind::CheapestPrice,
            value: cheapest,
        },
        SummaryCard {
            kind: CardKind::BusiestDay,
            value: busiest,
        },
        SummaryCard {
            kind: CardKind::MostStops,
            value: stops,
        },
    ]
}

/// Price of the first cheapest-flight row.
///
/// Zero, non-numeric and non-finite prices count as absent.
pub fn cheapest_price(top_cheapest: &[Row]) -> Option<f64> {
    top_cheapest
        .first()?
        .get("Price")?
        .as_f64()
        .filter(|price| price.is_finite() && *price != 0.0)
}

/// Stop label with the most flights.
///
/// Ties go to the lexicographically smallest label. Returns `None` for an
/// empty mapping.
pub fn most_stops(stops_count: &BTreeMap<String, u64>) -> Option<&str> {
    let mut best: Option<(&str, u64)> = None;
    // BTreeMap iterates in ascending label order, so a strict comparison
    // keeps the smallest label among equal counts.
    for (label, &count) in stops_count {
        match best {
            Some((_, top)) if count <= top => {}
            _ => best = Some((label.as_str(), count)),
        }
    }
    best.map(|(label, _)| label)
}

// ==================== Price Histogram ====================

/// Ten-bin distribution of ticket prices.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistogram {
    min: f64,
    max: f64,
    bin_size: f64,
    counts: [u64; HISTOGRAM_BINS],
}

impl PriceHistogram {
    /// Bin the given prices. Non-finite samples are ignored.
    ///
    /// Returns `None` when no finite price remains. When every price is
    /// identical the bin width is zero and all samples land in bin 0.
    pub fn from_prices(prices: &[f64]) -> Option<Self> {
        let finite: Vec<f64> = prices.iter().copied().filter(|p| p.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut histogram = Self {
            min,
            max,
            bin_size: (max - min) / HISTOGRAM_BINS as f64,
            counts: [0; HISTOGRAM_BINS],
        };

        for price in finite {
            let idx = histogram.bin_index(price);
            histogram.counts[idx] += 1;
        }

        Some(histogram)
    }

    /// Bin index for a price, clamped to `0..HISTOGRAM_BINS`.
    ///
    /// The maximum always lands in the last bin. Spans too small or too
    /// large for a finite, non-zero bin width are binned by their fraction
    /// of the full range instead.
    pub fn bin_index(&self, price: f64) -> usize {
        if self.is_degenerate() {
            return 0;
        }
        if price >= self.max {
            return HISTOGRAM_BINS - 1;
        }

        let idx = if self.bin_size > 0.0 && self.bin_size.is_finite() {
            ((price - self.min) / self.bin_size).floor()
        } else {
            (self.fraction(price) * HISTOGRAM_BINS as f64).floor()
        };

        if idx.is_nan() || idx < 0.0 {
            0
        } else {
            (idx as usize).min(HISTOGRAM_BINS - 1)
        }
    }

    /// Position of `price` within `min..=max` as a value in `0..=1`.
    fn fraction(&self, price: f64) -> f64 {
        let span = self.max - self.min;
        if span.is_finite() {
            (price - self.min) / span
        } else {
            // Halving keeps both operands finite when the span overflows
            (price / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0)
        }
    }

    pub fn counts(&self) -> &[u64; HISTOGRAM_BINS] {
        &self.counts
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn bin_size(&self) -> f64 {
        self.bin_size
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Whether every binned price was identical.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Range labels such as `₹4500-₹4820`, one per bin.
    pub fn labels(&self, currency: &str) -> Vec<String> {
        (0..HISTOGRAM_BINS)
            .map(|i| {
                let low = self.min + i as f64 * self.bin_size;
                let high = self.min + (i + 1) as f64 * self.bin_size;
                format!(
                    "{}-{}",
                    format_currency(low, currency),
                    format_currency(high, currency)
                )
            })
            .collect()
    }
}

// ==================== Top-Flight Highlighting ====================

/// How a displayed row is matched against the cheapest-flight subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchRule {
    /// Serialized rows must be byte-identical, key order included.
    #[default]
    Exact,
    /// Serialized rows must match once keys are sorted.
    Unordered,
}

impl MatchRule {
    fn key(self, row: &Row) -> String {
        match self {
            MatchRule::Exact => Value::Object(row.clone()).to_string(),
            MatchRule::Unordered => {
                let sorted: BTreeMap<&String, &Value> = row.iter().collect();
                serde_json::to_string(&sorted).unwrap_or_default()
            }
        }
    }
}

/// Flag every row of `all` that also appears in `top`.
pub fn highlight_top_rows(all: &[Row], top: &[Row], rule: MatchRule) -> Vec<bool> {
    let top_keys: HashSet<String> = top.iter().map(|row| rule.key(row)).collect();
    all.iter()
        .map(|row| top_keys.contains(&rule.key(row)))
        .collect()
}

// ==================== Chart and Table Models ====================

/// Categorical bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub series_label: String,
    pub labels: Vec<String>,
    /// `None` marks a category the server had no value for.
    pub values: Vec<Option<f64>>,
}

impl BarChart {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Line chart over an ordered series.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub series_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Share-of-total chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    pub series_label: String,
    pub slices: Vec<(String, u64)>,
}

impl PieChart {
    pub fn total(&self) -> u64 {
        self.slices.iter().map(|(_, count)| count).sum()
    }
}

/// Table of flight rows with formatted cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableModel {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Parallel to `rows`; true for rows that are also in the cheapest set.
    pub highlighted: Vec<bool>,
}

impl TableModel {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn airline_price_chart(airlines: &[AirlinePrice], currency: &str) -> BarChart {
    BarChart {
        title: "Top Airlines by Average Price".to_string(),
        series_label: format!("Avg Price ({currency})"),
        labels: airlines.iter().map(|a| a.airline.clone()).collect(),
        values: airlines.iter().map(|a| a.price).collect(),
    }
}

pub fn co2_chart(airlines: &[AirlineCo2]) -> BarChart {
    BarChart {
        title: "CO₂ Emissions by Airline".to_string(),
        series_label: "Avg CO₂ (kg)".to_string(),
        labels: airlines.iter().map(|a| a.airline.clone()).collect(),
        values: airlines.iter().map(|a| a.co2).collect(),
    }
}

/// Histogram bar chart; empty when there are no prices to bin.
pub fn price_distribution_chart(prices: &[f64], currency: &str) -> BarChart {
    let (labels, values) = match PriceHistogram::from_prices(prices) {
        Some(histogram) => (
            histogram.labels(currency),
            histogram.counts().iter().map(|&c| Some(c as f64)).collect(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    BarChart {
        title: "Price Distribution".to_string(),
        series_label: "Flights".to_string(),
        labels,
        values,
    }
}

/// Raw price series in server order, used as a demand proxy.
pub fn demand_trend_chart(prices: &[f64], currency: &str) -> LineChart {
    LineChart {
        title: "Price Trend".to_string(),
        series_label: format!("Price Trend ({currency})"),
        labels: (1..=prices.len()).map(|i| format!("Flight {i}")).collect(),
        values: prices.to_vec(),
    }
}

pub fn stops_chart(stops_count: &BTreeMap<String, u64>) -> PieChart {
    PieChart {
        title: "Flights by Stops".to_string(),
        series_label: "Flights by Stops".to_string(),
        slices: stops_count
            .iter()
            .map(|(label, &count)| (label.clone(), count))
            .collect(),
    }
}

/// Build a table whose columns are the keys of the first row.
///
/// Later rows are read by column name; a missing column renders empty.
pub fn rows_table(rows: &[Row]) -> TableModel {
    let Some(first) = rows.first() else {
        return TableModel::default();
    };

    let columns: Vec<&String> = first.keys().collect();
    TableModel {
        headers: columns.iter().map(|k| header_label(k)).collect(),
        rows: rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|k| row.get(k.as_str()).map(format_cell).unwrap_or_default())
                    .collect()
            })
            .collect(),
        highlighted: vec![false; rows.len()],
    }
}

/// All-flights table with the cheapest rows flagged.
pub fn flights_table(all: &[Row], top: &[Row], rule: MatchRule) -> TableModel {
    let mut table = rows_table(all);
    if !table.is_empty() {
        table.highlighted = highlight_top_rows(all, top, rule);
    }
    table
}

fn header_label(key: &str) -> String {
    key.replace('_', " ").to_uppercase()
}

/// Render a JSON scalar for a table cell.
///
/// Integral floats print without a fractional part (`5000.0` as `5000`).
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => PLACEHOLDER.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if n.is_f64() {
                n.as_f64().map(format_number).unwrap_or_else(|| n.to_string())
            } else {
                n.to_string()
            }
        }
        other => other.to_string(),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
