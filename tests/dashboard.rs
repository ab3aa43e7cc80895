//! Integration tests for the dashboard controller.
//!
//! These tests drive the controller against a wiremock server and record
//! every region update with RecordingView, so ordering and failure handling
//! can be checked without a terminal.

use chrono::NaiveDate;
use flight_dashboard::{
    ControlState, Dashboard, DashboardOptions, FlightApiClient, PipelineOutcome,
    PresentationStyle, RecordingView, Region, ScrapeForm, ScrapeOutcome, ScrapeStatus,
    TerminalView, View, ViewEvent,
    config::NetworkConfig,
    dashboard::{ANALYTICS_FAILED, INSIGHT_FAILED, NO_INSIGHT},
};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn network() -> NetworkConfig {
    NetworkConfig {
        request_timeout_secs: 10,
        connect_timeout_secs: 5,
        scrape_timeout_secs: 10,
    }
}

fn dashboard<V: View>(server: &MockServer, view: V) -> Dashboard<V> {
    let client = FlightApiClient::new(server.uri(), &network()).unwrap();
    Dashboard::new(client, view, DashboardOptions::default())
}

fn full_payload() -> Value {
    json!({
        "total_flights": 2,
        "busiest_day": "2024-01-03",
        "top_airlines": [
            {"Airline Company": "IndiGo", "Price": 4500.0},
            {"Airline Company": "Vistara", "Price": 6100.0}
        ],
        "price_hist": [4500, 6100],
        "co2_by_airline": [
            {"Airline Company": "IndiGo", "CO2": 110.0},
            {"Airline Company": "Vistara", "CO2": 125.5}
        ],
        "stops_count": {"0": 1, "1": 1},
        "top_cheapest": [{"Airline Company": "IndiGo", "Price": 4500}],
        "sample_data": [
            {"Airline Company": "IndiGo", "Price": 4500},
            {"Airline Company": "Vistara", "Price": 6100}
        ],
        "all_flights": [
            {"Airline Company": "IndiGo", "Price": 4500},
            {"Airline Company": "Vistara", "Price": 6100}
        ]
    })
}

async fn mount_analytics(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn scrape_form(range_days: u32) -> ScrapeForm {
    ScrapeForm {
        origin: "DEL".to_string(),
        destination: "BOM".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        range_days,
    }
}

fn position(view: &RecordingView, event: &ViewEvent) -> usize {
    view.events()
        .iter()
        .position(|e| e == event)
        .unwrap_or_else(|| panic!("missing event {event:?}"))
}

// ==================== Analytics Pipeline ====================

/// Test that a successful load draws every region in order.
#[tokio::test]
async fn test_load_analytics_renders_regions_in_order() {
    let server = MockServer::start().await;
    mount_analytics(&server, full_payload()).await;

    let mut dash = dashboard(&server, RecordingView::new());
    let outcome = dash.load_analytics().await;

    assert_eq!(outcome, PipelineOutcome::Rendered);
    assert_eq!(
        dash.view().regions(),
        vec![
            Region::Summary,
            Region::Summary,
            Region::AirlineChart,
            Region::PriceHistogram,
            Region::Co2Chart,
            Region::CheapestTable,
            Region::SampleTable,
            Region::DemandTrend,
            Region::StopsChart,
            Region::AllFlightsTable,
        ]
    );
    assert_eq!(dash.view().events()[0], ViewEvent::Loading(Region::Summary));
}

/// Test summary values and the highlight of the cheapest row.
#[tokio::test]
async fn test_load_analytics_summary_and_highlight() {
    let server = MockServer::start().await;
    mount_analytics(&server, full_payload()).await;

    let mut dash = dashboard(&server, RecordingView::new());
    dash.load_analytics().await;

    let Some(ViewEvent::Cards(cards)) = dash.view().last(Region::Summary) else {
        panic!("summary cards not rendered");
    };
    let values: Vec<&str> = cards.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(values, vec!["2", "₹4500", "2024-01-03", "0"]);

    let Some(ViewEvent::Table(_, table)) = dash.view().last(Region::AllFlightsTable) else {
        panic!("all flights table not rendered");
    };
    assert_eq!(table.headers, vec!["AIRLINE COMPANY", "PRICE"]);
    assert_eq!(table.highlighted, vec![true, false]);
}

/// Test that a payload without cheapest rows shows the placeholder price.
#[tokio::test]
async fn test_load_analytics_placeholder_price() {
    let server = MockServer::start().await;
    mount_analytics(&server, json!({"total_flights": 42, "top_cheapest": []})).await;

    let mut dash = dashboard(&server, RecordingView::new());
    let outcome = dash.load_analytics().await;

    assert!(outcome.is_rendered());
    let Some(ViewEvent::Cards(cards)) = dash.view().last(Region::Summary) else {
        panic!("summary cards not rendered");
    };
    assert_eq!(cards[0].value, "42");
    assert_eq!(cards[1].value, "N/A");
    assert!(cards[1].is_placeholder());
}

/// Test that an HTTP failure replaces summary and insight with failure text.
#[tokio::test]
async fn test_load_analytics_server_error_shows_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut dash = dashboard(&server, RecordingView::new());
    let outcome = dash.load_analytics().await;

    match outcome {
        PipelineOutcome::Failed(cause) => assert!(cause.contains("500")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(
        dash.view().last(Region::Summary),
        Some(&ViewEvent::Failed(
            Region::Summary,
            ANALYTICS_FAILED.to_string()
        ))
    );
    assert_eq!(
        dash.view().last(Region::Insight),
        Some(&ViewEvent::Failed(
            Region::Insight,
            INSIGHT_FAILED.to_string()
        ))
    );
    assert!(dash.view().last(Region::AirlineChart).is_none());
}

/// Test that a failing region aborts the rest of the render.
#[tokio::test]
async fn test_render_failure_stops_pipeline() {
    let server = MockServer::start().await;
    mount_analytics(&server, full_payload()).await;

    let mut dash = dashboard(&server, RecordingView::failing_on(Region::Co2Chart));
    let outcome = dash.load_analytics().await;

    assert!(!outcome.is_rendered());
    let view = dash.view();
    assert!(view.last(Region::PriceHistogram).is_some());
    assert!(view.last(Region::CheapestTable).is_none());
    assert!(view.last(Region::AllFlightsTable).is_none());
    assert!(matches!(
        view.last(Region::Summary),
        Some(ViewEvent::Failed(Region::Summary, _))
    ));
}

// ==================== AI Insight ====================

#[tokio::test]
async fn test_load_ai_insight_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/ai-insight"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ai_insights": "**Tuesday** departures are cheapest"
        })))
        .mount(&server)
        .await;

    let mut dash = dashboard(&server, RecordingView::new());
    assert!(dash.load_ai_insight().await.is_rendered());

    assert_eq!(
        dash.view().events(),
        &[
            ViewEvent::Loading(Region::Insight),
            ViewEvent::Insight("**Tuesday** departures are cheapest".to_string()),
        ]
    );
}

/// Test that an empty insight falls back to the fixed message.
#[tokio::test]
async fn test_load_ai_insight_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/ai-insight"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ai_insights": ""})))
        .mount(&server)
        .await;

    let mut dash = dashboard(&server, RecordingView::new());
    dash.load_ai_insight().await;

    assert_eq!(
        dash.view().last(Region::Insight),
        Some(&ViewEvent::Insight(NO_INSIGHT.to_string()))
    );
}

#[tokio::test]
async fn test_load_ai_insight_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/ai-insight"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut dash = dashboard(&server, RecordingView::new());
    assert!(!dash.load_ai_insight().await.is_rendered());
    assert_eq!(
        dash.view().last(Region::Insight),
        Some(&ViewEvent::Failed(
            Region::Insight,
            INSIGHT_FAILED.to_string()
        ))
    );
}

// ==================== Scrape Workflow ====================

/// Test the busy/status sequence of a successful scrape and the reload.
#[tokio::test]
async fn test_scrape_success_sequence() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Scraping complete!",
            "details": "wrote 120 rows"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_analytics(&server, full_payload()).await;

    let mut dash = dashboard(&server, RecordingView::new());
    let outcome = dash.scrape(&scrape_form(5)).await;

    assert_eq!(
        outcome,
        ScrapeOutcome::Completed {
            status: "Scraping complete!".to_string(),
            analytics: PipelineOutcome::Rendered,
        }
    );

    let view = dash.view();
    let busy = position(view, &ViewEvent::Control(ControlState::Busy));
    let progress = position(
        view,
        &ViewEvent::Status(ScrapeStatus::InProgress(
            "Scraping flight data from DEL to BOM...".to_string(),
        )),
    );
    let done = position(
        view,
        &ViewEvent::Status(ScrapeStatus::Succeeded("Scraping complete!".to_string())),
    );
    let idle = position(view, &ViewEvent::Control(ControlState::Idle));
    let reload = position(view, &ViewEvent::Loading(Region::Summary));

    assert!(busy < progress && progress < done && done < idle && idle < reload);
    assert!(matches!(
        view.last(Region::AllFlightsTable),
        Some(ViewEvent::Table(..))
    ));
}

/// Test that a missing status string falls back to the completion message.
#[tokio::test]
async fn test_scrape_success_without_status_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;
    mount_analytics(&server, full_payload()).await;

    let mut dash = dashboard(&server, RecordingView::new());
    let outcome = dash.scrape(&scrape_form(1)).await;

    assert!(matches!(
        outcome,
        ScrapeOutcome::Completed { ref status, .. } if status == "Analysis complete!"
    ));
}

/// Test that a rejected scrape restores the control and skips the reload.
#[tokio::test]
async fn test_scrape_failure_restores_control() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/scrape"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": "Scraping failed",
            "details": "driver crashed"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(full_payload()))
        .expect(0)
        .mount(&server)
        .await;

    let mut dash = dashboard(&server, RecordingView::new());
    let outcome = dash.scrape(&scrape_form(3)).await;

    let ScrapeOutcome::Failed(message) = outcome else {
        panic!("scrape should fail");
    };
    assert!(message.starts_with("Analysis failed: "));
    assert!(message.contains("500"));

    let view = dash.view();
    assert_eq!(
        view.last(Region::ScrapeStatus),
        Some(&ViewEvent::Status(ScrapeStatus::Failed(message.clone())))
    );
    assert_eq!(
        view.events().last(),
        Some(&ViewEvent::Control(ControlState::Idle))
    );
    assert!(view.last(Region::Summary).is_none());
}

/// Test that an empty range is rejected before any request is made.
#[tokio::test]
async fn test_scrape_empty_range_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/scrape"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut dash = dashboard(&server, RecordingView::new());
    let outcome = dash.scrape(&scrape_form(0)).await;

    assert!(matches!(outcome, ScrapeOutcome::Failed(_)));
    assert!(dash.view().last(Region::ScrapeControl).is_none());
    assert!(matches!(
        dash.view().last(Region::ScrapeStatus),
        Some(ViewEvent::Status(ScrapeStatus::Failed(_)))
    ));
}

// ==================== Terminal Front End ====================

/// Test a full load through the terminal view.
#[tokio::test]
async fn test_terminal_frame_after_load() {
    let server = MockServer::start().await;
    mount_analytics(&server, full_payload()).await;

    let view = TerminalView::new(PresentationStyle::Compact, 20);
    let mut dash = dashboard(&server, view);
    assert!(dash.load_analytics().await.is_rendered());

    let view = dash.into_view();
    let frame = view.to_text();
    assert!(frame.contains("Total Flights: 2 | Cheapest Price: ₹4500"));
    assert!(frame.contains("+ Top Airlines by Average Price "));
    assert!(frame.contains("+ Price Distribution "));
    assert!(frame.contains("+ All Flights "));
    assert!(frame.contains("IndiGo"));
    assert_eq!(usize::from(view.height()), frame.lines().count());
}
