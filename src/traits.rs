//! The display seam between the dashboard controller and a front end.
//!
//! This module provides:
//! - `View`: one method per visual region of the dashboard
//! - `RecordingView`: a test double that records every region update

use anyhow::{Result, bail};

use crate::analytics::{BarChart, LineChart, PieChart, SummaryCard, TableModel};

/// Named display regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Summary,
    AirlineChart,
    PriceHistogram,
    Co2Chart,
    DemandTrend,
    StopsChart,
    CheapestTable,
    SampleTable,
    AllFlightsTable,
    Insight,
    ScrapeStatus,
    ScrapeControl,
}

/// State of the control that starts a scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    Idle,
    Busy,
}

/// Content of the scrape status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeStatus {
    InProgress(String),
    Succeeded(String),
    Failed(String),
}

impl ScrapeStatus {
    pub fn message(&self) -> &str {
        match self {
            ScrapeStatus::InProgress(m) | ScrapeStatus::Succeeded(m) | ScrapeStatus::Failed(m) => m,
        }
    }
}

/// Display capability for the dashboard.
///
/// Render methods return an error when the region could not be drawn; the
/// controller then treats the whole analytics render as failed. Loading and
/// failure indicators cannot fail.
pub trait View {
    fn summary_loading(&mut self);
    fn summary_cards(&mut self, cards: &[SummaryCard]) -> Result<()>;
    fn summary_failed(&mut self, message: &str);

    fn airline_chart(&mut self, chart: &BarChart) -> Result<()>;
    fn price_histogram(&mut self, chart: &BarChart) -> Result<()>;
    fn co2_chart(&mut self, chart: &BarChart) -> Result<()>;
    fn demand_trend(&mut self, chart: &LineChart) -> Result<()>;
    fn stops_chart(&mut self, chart: &PieChart) -> Result<()>;

    fn cheapest_table(&mut self, table: &TableModel) -> Result<()>;
    fn sample_table(&mut self, table: &TableModel) -> Result<()>;
    fn all_flights_table(&mut self, table: &TableModel) -> Result<()>;

    fn insight_loading(&mut self);
    /// Markdown source of the generated insight.
    fn insight(&mut self, markdown: &str);
    fn insight_failed(&mut self, message: &str);

    fn scrape_control(&mut self, state: ControlState);
    fn scrape_status(&mut self, status: &ScrapeStatus);
}

/// One recorded region update.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Loading(Region),
    Failed(Region, String),
    Cards(Vec<SummaryCard>),
    Bar(Region, BarChart),
    Line(Region, LineChart),
    Pie(Region, PieChart),
    Table(Region, TableModel),
    Insight(String),
    Control(ControlState),
    Status(ScrapeStatus),
}

impl ViewEvent {
    pub fn region(&self) -> Region {
        match self {
            ViewEvent::Loading(r)
            | ViewEvent::Failed(r, _)
            | ViewEvent::Bar(r, _)
            | ViewEvent::Line(r, _)
            | ViewEvent::Pie(r, _)
            | ViewEvent::Table(r, _) => *r,
            ViewEvent::Cards(_) => Region::Summary,
            ViewEvent::Insight(_) => Region::Insight,
            ViewEvent::Control(_) => Region::ScrapeControl,
            ViewEvent::Status(_) => Region::ScrapeStatus,
        }
    }
}

/// View for testing that records every update and can fail on demand.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    events: Vec<ViewEvent>,
    fail_on: Option<Region>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// A view whose render call for `region` returns an error.
    pub fn failing_on(region: Region) -> Self {
        Self {
            events: Vec::new(),
            fail_on: Some(region),
        }
    }

    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    /// Regions in the order they were updated.
    pub fn regions(&self) -> Vec<Region> {
        self.events.iter().map(ViewEvent::region).collect()
    }

    /// Most recent update of a region.
    pub fn last(&self, region: Region) -> Option<&ViewEvent> {
        self.events.iter().rev().find(|e| e.region() == region)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    fn record(&mut self, region: Region, event: ViewEvent) -> Result<()> {
        if self.fail_on == Some(region) {
            bail!("injected render failure in {region:?}");
        }
        self.events.push(event);
        Ok(())
    }
}

impl View for RecordingView {
    fn summary_loading(&mut self) {
        self.events.push(ViewEvent::Loading(Region::Summary));
    }

    fn summary_cards(&mut self, cards: &[SummaryCard]) -> Result<()> {
        self.record(Region::Summary, ViewEvent::Cards(cards.to_vec()))
    }

    fn summary_failed(&mut self, message: &str) {
        self.events
            .push(ViewEvent::Failed(Region::Summary, message.to_string()));
    }

    fn airline_chart(&mut self, chart: &BarChart) -> Result<()> {
        self.record(
            Region::AirlineChart,
            ViewEvent::Bar(Region::AirlineChart, chart.clone()),
        )
    }

    fn price_histogram(&mut self, chart: &BarChart) -> Result<()> {
        self.record(
            Region::PriceHistogram,
            ViewEvent::Bar(Region::PriceHistogram, chart.clone()),
        )
    }

    fn co2_chart(&mut self, chart: &BarChart) -> Result<()> {
        self.record(
            Region::Co2Chart,
            ViewEvent::Bar(Region::Co2Chart, chart.clone()),
        )
    }

    fn demand_trend(&mut self, chart: &LineChart) -> Result<()> {
        self.record(
            Region::DemandTrend,
            ViewEvent::Line(Region::DemandTrend, chart.clone()),
        )
    }

    fn stops_chart(&mut self, chart: &PieChart) -> Result<()> {
        self.record(
            Region::StopsChart,
            ViewEvent::Pie(Region::StopsChart, chart.clone()),
        )
    }

    fn cheapest_table(&mut self, table: &TableModel) -> Result<()> {
        self.record(
            Region::CheapestTable,
            ViewEvent::Table(Region::CheapestTable, table.clone()),
        )
    }

    fn sample_table(&mut self, table: &TableModel) -> Result<()> {
        self.record(
            Region::SampleTable,
            ViewEvent::Table(Region::SampleTable, table.clone()),
        )
    }

    fn all_flights_table(&mut self, table: &TableModel) -> Result<()> {
        self.record(
            Region::AllFlightsTable,
            ViewEvent::Table(Region::AllFlightsTable, table.clone()),
        )
    }

    fn insight_loading(&mut self) {
        self.events.push(ViewEvent::Loading(Region::Insight));
    }

    fn insight(&mut self, markdown: &str) {
        self.events.push(ViewEvent::Insight(markdown.to_string()));
    }

    fn insight_failed(&mut self, message: &str) {
        self.events
            .push(ViewEvent::Failed(Region::Insight, message.to_string()));
    }

    fn scrape_control(&mut self, state: ControlState) {
        self.events.push(ViewEvent::Control(state));
    }

    fn scrape_status(&mut self, status: &ScrapeStatus) {
        self.events.push(ViewEvent::Status(status.clone()));
    }
}
