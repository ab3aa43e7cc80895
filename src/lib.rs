//! Flight Dashboard Library
//!
//! This module exposes the core components of the flight analytics dashboard:
//! the API client, the pure analytics transforms, the dashboard controller and
//! the terminal front end.

pub mod analytics;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod payload;
pub mod scrape;
pub mod style;
pub mod terminal;
pub mod traits;
pub mod widgets;

// Re-export commonly used types
pub use analytics::{
    BarChart,
    CardKind,
    HISTOGRAM_BINS,
    LineChart,
    MatchRule,
    PLACEHOLDER,
    PieChart,
    PriceHistogram,
    SummaryCard,
    TableModel,
    // Transforms
    cheapest_price,
    flights_table,
    highlight_top_rows,
    most_stops,
    round_half_up,
    rows_table,
    summary_cards,
};
pub use api::{ApiError, FlightApiClient};
pub use config::AppConfig;
pub use dashboard::{Dashboard, DashboardOptions, PipelineOutcome, ScrapeOutcome};
pub use payload::{AiInsightPayload, AnalyticsPayload, Row, ScrapeRequest, ScrapeResponse, ServerStatus};
pub use scrape::{ScrapeError, ScrapeForm, end_date};
pub use style::PresentationStyle;
pub use terminal::TerminalView;
pub use traits::{ControlState, RecordingView, Region, ScrapeStatus, View, ViewEvent};
pub use widgets::{ChartHandle, ChartSlot, Panel};
