//! Terminal front end: keeps one ratatui panel per region and stacks them
//! into a dashboard frame.

use anyhow::{Result, bail};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::{
    analytics::{BarChart, CardKind, LineChart, PieChart, SummaryCard, TableModel},
    style::{self, IconSet, PresentationStyle},
    traits::{ControlState, Region, ScrapeStatus, View},
    widgets::{ChartSlot, Panel, bar_chart, buffer_lines, line_chart, pie_chart, table, to_u16},
};

/// Chart regions in display order.
const CHART_REGIONS: [Region; 5] = [
    Region::AirlineChart,
    Region::PriceHistogram,
    Region::Co2Chart,
    Region::DemandTrend,
    Region::StopsChart,
];

const SUMMARY_TITLE: &str = "Flight Analytics";
const INSIGHT_TITLE: &str = "AI Insights";
const SCRAPE_TITLE: &str = "Scrape";

pub struct TerminalView {
    style: PresentationStyle,
    chart_width: u16,
    summary: Option<Panel>,
    airline_chart: ChartSlot<Panel>,
    price_histogram: ChartSlot<Panel>,
    co2_chart: ChartSlot<Panel>,
    demand_trend: ChartSlot<Panel>,
    stops_chart: ChartSlot<Panel>,
    cheapest: Option<Panel>,
    sample: Option<Panel>,
    all_flights: Option<Panel>,
    insight: Option<Panel>,
    scrape: Option<Panel>,
    scrape_status: Option<ScrapeStatus>,
    control: Option<ControlState>,
}

impl TerminalView {
    pub fn new(style: PresentationStyle, chart_width: usize) -> Self {
        Self {
            style,
            chart_width: to_u16(chart_width.max(1)),
            summary: None,
            airline_chart: ChartSlot::new(),
            price_histogram: ChartSlot::new(),
            co2_chart: ChartSlot::new(),
            demand_trend: ChartSlot::new(),
            stops_chart: ChartSlot::new(),
            cheapest: None,
            sample: None,
            all_flights: None,
            insight: None,
            scrape: None,
            scrape_status: None,
            control: None,
        }
    }

    fn icons(&self) -> &'static IconSet {
        self.style.icons()
    }

    fn chart_slot(&self, region: Region) -> Option<&ChartSlot<Panel>> {
        match region {
            Region::AirlineChart => Some(&self.airline_chart),
            Region::PriceHistogram => Some(&self.price_histogram),
            Region::Co2Chart => Some(&self.co2_chart),
            Region::DemandTrend => Some(&self.demand_trend),
            Region::StopsChart => Some(&self.stops_chart),
            _ => None,
        }
    }

    fn panel(&self, region: Region) -> Option<&Panel> {
        match region {
            Region::Summary => self.summary.as_ref(),
            Region::CheapestTable => self.cheapest.as_ref(),
            Region::SampleTable => self.sample.as_ref(),
            Region::AllFlightsTable => self.all_flights.as_ref(),
            Region::Insight => self.insight.as_ref(),
            Region::ScrapeStatus | Region::ScrapeControl => self.scrape.as_ref(),
            chart => self.chart_slot(chart).and_then(ChartSlot::get),
        }
    }

    /// Drawn panels in display order.
    fn panels(&self) -> Vec<&Panel> {
        let charts = CHART_REGIONS
            .iter()
            .filter_map(|region| self.chart_slot(*region).and_then(ChartSlot::get));
        self.summary
            .iter()
            .chain(charts)
            .chain(&self.cheapest)
            .chain(&self.sample)
            .chain(&self.all_flights)
            .chain(&self.insight)
            .chain(&self.scrape)
            .collect()
    }

    /// Rows of one region's panel, border included; empty when it was
    /// never drawn.
    pub fn region_lines(&self, region: Region) -> Vec<String> {
        self.panel(region).map(Panel::lines).unwrap_or_default()
    }

    pub fn width(&self) -> u16 {
        self.panels().iter().map(|p| p.width()).max().unwrap_or(0)
    }

    pub fn height(&self) -> u16 {
        self.panels()
            .iter()
            .fold(0u16, |h, p| h.saturating_add(p.height()))
    }

    /// Every drawn panel stacked top to bottom.
    pub fn frame(&self) -> Buffer {
        let mut buf = Buffer::empty(Rect::new(0, 0, self.width(), self.height()));
        self.render(buf.area, &mut buf);
        buf
    }

    /// Plain text of the frame, for output that is not a terminal.
    pub fn to_text(&self) -> String {
        buffer_lines(&self.frame()).join("\n")
    }

    fn text_line(icon: &str, message: &str, text_style: Style) -> Line<'static> {
        Line::styled(format!("{icon} {message}"), text_style)
    }

    fn status_line(&self, status: &ScrapeStatus) -> Line<'static> {
        let icons = self.icons();
        match status {
            ScrapeStatus::InProgress(m) => Self::text_line(icons.loading, m, style::LABEL),
            ScrapeStatus::Succeeded(m) => Self::text_line(icons.success, m, style::SUCCESS),
            ScrapeStatus::Failed(m) => Self::text_line(icons.error, m, style::ERROR),
        }
    }

    fn control_line(state: ControlState) -> Line<'static> {
        match state {
            ControlState::Idle => Line::styled("[ Start Analysis ]", style::HIGHLIGHT),
            ControlState::Busy => Line::styled("[ Analyzing... ] (disabled)", style::MUTED),
        }
    }

    fn redraw_scrape(&mut self) {
        let mut lines: Vec<Line<'static>> = Vec::new();
        if let Some(status) = &self.scrape_status {
            lines.push(self.status_line(status));
        }
        if let Some(control) = self.control {
            lines.push(Self::control_line(control));
        }
        self.scrape = Some(Panel::text(SCRAPE_TITLE, lines, self.icons()));
    }

    fn card_icon(&self, kind: CardKind) -> &'static str {
        let icons = self.icons();
        match kind {
            CardKind::TotalFlights => icons.flights,
            CardKind::CheapestPrice => icons.price,
            CardKind::BusiestDay => icons.calendar,
            CardKind::MostStops => icons.route,
        }
    }

    fn draw_bar(&mut self, region: Region, chart: &BarChart) -> Result<()> {
        let width = self.chart_width;
        let icons = self.icons();
        let slot = match region {
            Region::AirlineChart => &mut self.airline_chart,
            Region::PriceHistogram => &mut self.price_histogram,
            Region::Co2Chart => &mut self.co2_chart,
            other => bail!("{other:?} does not hold a bar chart"),
        };
        slot.replace_with(|| bar_chart::render(chart, width, icons))?;
        Ok(())
    }
}

impl Widget for &TerminalView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut y = area.y;
        for panel in self.panels() {
            if y >= area.bottom() {
                break;
            }
            panel.blit(buf, area.x, y, area);
            y = y.saturating_add(panel.height());
        }
    }
}

impl View for TerminalView {
    fn summary_loading(&mut self) {
        let line = Self::text_line(self.icons().loading, "Loading analytics...", style::LABEL);
        self.summary = Some(Panel::text(SUMMARY_TITLE, vec![line], self.icons()));
    }

    fn summary_cards(&mut self, cards: &[SummaryCard]) -> Result<()> {
        let lines = if self.style.is_verbose() {
            cards
                .iter()
                .map(|card| {
                    Line::from(vec![
                        Span::raw(format!("{} ", self.card_icon(card.kind))),
                        Span::styled(format!("{:<15} ", card.label()), style::LABEL),
                        Span::styled(card.value.clone(), style::HIGHLIGHT),
                    ])
                })
                .collect()
        } else {
            vec![Line::from(
                cards
                    .iter()
                    .map(|card| format!("{}: {}", card.label(), card.value))
                    .collect::<Vec<_>>()
                    .join(" | "),
            )]
        };
        self.summary = Some(Panel::text(SUMMARY_TITLE, lines, self.icons()));
        Ok(())
    }

    fn summary_failed(&mut self, message: &str) {
        let line = Self::text_line(self.icons().error, message, style::ERROR);
        self.summary = Some(Panel::text(SUMMARY_TITLE, vec![line], self.icons()));
    }

    fn airline_chart(&mut self, chart: &BarChart) -> Result<()> {
        self.draw_bar(Region::AirlineChart, chart)
    }

    fn price_histogram(&mut self, chart: &BarChart) -> Result<()> {
        self.draw_bar(Region::PriceHistogram, chart)
    }

    fn co2_chart(&mut self, chart: &BarChart) -> Result<()> {
        self.draw_bar(Region::Co2Chart, chart)
    }

    fn demand_trend(&mut self, chart: &LineChart) -> Result<()> {
        let width = self.chart_width;
        let icons = self.icons();
        self.demand_trend
            .replace_with(|| line_chart::render(chart, width, icons))?;
        Ok(())
    }

    fn stops_chart(&mut self, chart: &PieChart) -> Result<()> {
        let width = self.chart_width;
        let icons = self.icons();
        self.stops_chart
            .replace_with(|| Ok::<_, anyhow::Error>(pie_chart::render(chart, width, icons)))?;
        Ok(())
    }

    fn cheapest_table(&mut self, table_model: &TableModel) -> Result<()> {
        self.cheapest = None;
        self.cheapest = Some(table::render("Cheapest Flights", table_model, self.icons())?);
        Ok(())
    }

    fn sample_table(&mut self, table_model: &TableModel) -> Result<()> {
        self.sample = None;
        self.sample = Some(table::render("Sample Data", table_model, self.icons())?);
        Ok(())
    }

    fn all_flights_table(&mut self, table_model: &TableModel) -> Result<()> {
        self.all_flights = None;
        self.all_flights = Some(table::render("All Flights", table_model, self.icons())?);
        Ok(())
    }

    fn insight_loading(&mut self) {
        let line = Self::text_line(self.icons().loading, "Generating AI insights...", style::LABEL);
        self.insight = Some(Panel::text(INSIGHT_TITLE, vec![line], self.icons()));
    }

    fn insight(&mut self, markdown: &str) {
        let lines = markdown
            .lines()
            .map(|l| Line::from(l.to_string()))
            .collect();
        self.insight = Some(Panel::text(INSIGHT_TITLE, lines, self.icons()));
    }

    fn insight_failed(&mut self, message: &str) {
        let line = Self::text_line(self.icons().error, message, style::ERROR);
        self.insight = Some(Panel::text(INSIGHT_TITLE, vec![line], self.icons()));
    }

    fn scrape_control(&mut self, state: ControlState) {
        self.control = Some(state);
        self.redraw_scrape();
    }

    fn scrape_status(&mut self, status: &ScrapeStatus) {
        self.scrape_status = Some(status.clone());
        self.redraw_scrape();
    }
}
