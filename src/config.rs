use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::{analytics::MatchRule, style::PresentationStyle};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub network: NetworkConfig,
    pub scrape: ScrapeConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// The server runs the scraper synchronously, so this one is long.
    pub scrape_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
            connect_timeout_secs: 10,
            scrape_timeout_secs: 660,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScrapeConfig {
    pub filename: String,
    pub default_range_days: u32,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            filename: "flight_data.csv".to_string(),
            default_range_days: 7,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    pub style: PresentationStyle,
    pub currency_symbol: String,
    pub highlight_rule: MatchRule,
    /// Width in columns of the longest chart bar.
    pub chart_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            style: PresentationStyle::Rich,
            currency_symbol: "₹".to_string(),
            highlight_rule: MatchRule::Exact,
            chart_width: 40,
        }
    }
}

impl AppConfig {
    /// Load configuration, optionally layering an explicit file on top of the
    /// default locations. An explicit file must exist.
    pub fn load_with(explicit: Option<&Path>) -> Result<Self> {
        // Load .env file (silently ignore if not present)
        let _ = dotenvy::dotenv();

        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("flight-dashboard");

        let mut builder = Config::builder()
            // 1. Load default values
            // API
            .set_default("api.base_url", "http://127.0.0.1:8000")?
            // Network
            .set_default("network.request_timeout_secs", 60)?
            .set_default("network.connect_timeout_secs", 10)?
            .set_default("network.scrape_timeout_secs", 660)?
            // Scrape
            .set_default("scrape.filename", "flight_data.csv")?
            .set_default("scrape.default_range_days", 7)?
            // Display
            .set_default("display.style", "rich")?
            .set_default("display.currency_symbol", "₹")?
            .set_default("display.highlight_rule", "exact")?
            .set_default("display.chart_width", 40)?

            // 2. Load from local config file (optional, lowest priority)
            .add_source(File::from(PathBuf::from("config.toml")).required(false))

            // 3. Load from user config directory (optional, overrides local)
            .add_source(File::from(config_dir.join("config.toml")).required(false));

        // 4. Explicit --config file
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        // 5. Load from Environment variables (FLIGHTDASH__API__BASE_URL=...)
        builder = builder.add_source(Environment::with_prefix("FLIGHTDASH").separator("__"));

        let s = builder.build().context("Failed to read configuration sources")?;
        s.try_deserialize().context("Invalid configuration")
    }
}
