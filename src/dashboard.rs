//! Dashboard controller: fetches payloads, derives view models and drives a
//! [`View`].

use anyhow::Result;

use crate::{
    analytics::{self, MatchRule},
    api::FlightApiClient,
    config::AppConfig,
    payload::AnalyticsPayload,
    scrape::ScrapeForm,
    traits::{ControlState, ScrapeStatus, View},
};

pub const ANALYTICS_FAILED: &str = "Failed to load analytics";
pub const INSIGHT_FAILED: &str = "Failed to load AI insights";
pub const NO_INSIGHT: &str = "No AI insights available.";
pub const SCRAPE_COMPLETE: &str = "Analysis complete!";

/// Rendering and scrape settings taken from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardOptions {
    pub currency_symbol: String,
    pub highlight_rule: MatchRule,
    pub scrape_filename: String,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            highlight_rule: MatchRule::Exact,
            scrape_filename: "flight_data.csv".to_string(),
        }
    }
}

impl DashboardOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            currency_symbol: config.display.currency_symbol.clone(),
            highlight_rule: config.display.highlight_rule,
            scrape_filename: config.scrape.filename.clone(),
        }
    }
}

/// Result of one analytics or insight load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Rendered,
    /// The region shows a failure indicator; carries the underlying cause.
    Failed(String),
}

impl PipelineOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, PipelineOutcome::Rendered)
    }
}

/// Result of one scrape run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    /// The server accepted the scrape; the dashboard was reloaded.
    Completed {
        status: String,
        analytics: PipelineOutcome,
    },
    /// Nothing was reloaded; carries the message shown to the user.
    Failed(String),
}

pub struct Dashboard<V: View> {
    client: FlightApiClient,
    view: V,
    options: DashboardOptions,
}

impl<V: View> Dashboard<V> {
    pub fn new(client: FlightApiClient, view: V, options: DashboardOptions) -> Self {
        Self {
            client,
            view,
            options,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    pub fn client(&self) -> &FlightApiClient {
        &self.client
    }

    /// Fetch the analytics payload and render every region from it.
    ///
    /// The fetch and all render steps form one unit: the first failure
    /// replaces the summary and insight regions with failure indicators.
    pub async fn load_analytics(&mut self) -> PipelineOutcome {
        self.view.summary_loading();

        let result = match self.client.fetch_analytics().await {
            Ok(payload) => self.render(&payload),
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(()) => {
                tracing::info!("Analytics rendered");
                PipelineOutcome::Rendered
            }
            Err(e) => {
                let cause = format!("{e:#}");
                tracing::warn!(error = %cause, "Analytics load failed");
                self.view.summary_failed(ANALYTICS_FAILED);
                self.view.insight_failed(INSIGHT_FAILED);
                PipelineOutcome::Failed(cause)
            }
        }
    }

    /// Render an already-fetched payload, stopping at the first failing region.
    pub fn render(&mut self, payload: &AnalyticsPayload) -> Result<()> {
        let currency = self.options.currency_symbol.as_str();

        self.view
            .summary_cards(&analytics::summary_cards(payload, currency))?;
        self.view.airline_chart(&analytics::airline_price_chart(
            &payload.top_airlines,
            currency,
        ))?;
        self.view.price_histogram(&analytics::price_distribution_chart(
            &payload.price_hist,
            currency,
        ))?;
        self.view
            .co2_chart(&analytics::co2_chart(&payload.co2_by_airline))?;
        self.view
            .cheapest_table(&analytics::rows_table(&payload.top_cheapest))?;
        self.view
            .sample_table(&analytics::rows_table(&payload.sample_data))?;
        self.view
            .demand_trend(&analytics::demand_trend_chart(&payload.price_hist, currency))?;
        self.view
            .stops_chart(&analytics::stops_chart(&payload.stops_count))?;
        self.view.all_flights_table(&analytics::flights_table(
            &payload.all_flights,
            &payload.top_cheapest,
            self.options.highlight_rule,
        ))?;

        Ok(())
    }

    /// Fetch the AI insight text into the insight region.
    pub async fn load_ai_insight(&mut self) -> PipelineOutcome {
        self.view.insight_loading();

        match self.client.fetch_ai_insight().await {
            Ok(payload) => {
                self.view.insight(payload.text().unwrap_or(NO_INSIGHT));
                PipelineOutcome::Rendered
            }
            Err(e) => {
                tracing::warn!(error = %e, "AI insight load failed");
                self.view.insight_failed(INSIGHT_FAILED);
                PipelineOutcome::Failed(e.to_string())
            }
        }
    }

    /// Run a scrape and reload the analytics when it succeeds.
    ///
    /// The scrape control is marked busy while the request is pending and is
    /// restored on every path before the reload starts.
    pub async fn scrape(&mut self, form: &ScrapeForm) -> ScrapeOutcome {
        let request = match form.to_request(&self.options.scrape_filename) {
            Ok(request) => request,
            Err(e) => {
                let message = format!("Analysis failed: {e}");
                self.view.scrape_status(&ScrapeStatus::Failed(message.clone()));
                return ScrapeOutcome::Failed(message);
            }
        };

        self.view.scrape_control(ControlState::Busy);
        self.view
            .scrape_status(&ScrapeStatus::InProgress(form.progress_message()));

        let submitted = self.client.submit_scrape(&request).await;

        let status = match submitted {
            Ok(response) => {
                let status = response
                    .status
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| SCRAPE_COMPLETE.to_string());
                tracing::info!(
                    origin = %request.origin,
                    destination = %request.destination,
                    %status,
                    "Scrape finished"
                );
                self.view
                    .scrape_status(&ScrapeStatus::Succeeded(status.clone()));
                Ok(status)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Scrape failed");
                let message = format!("Analysis failed: {e}");
                self.view.scrape_status(&ScrapeStatus::Failed(message.clone()));
                Err(message)
            }
        };

        self.view.scrape_control(ControlState::Idle);

        match status {
            Ok(status) => {
                let analytics = self.load_analytics().await;
                ScrapeOutcome::Completed { status, analytics }
            }
            Err(message) => ScrapeOutcome::Failed(message),
        }
    }
}
