use std::{io::IsTerminal, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use flight_dashboard::{
    Dashboard, DashboardOptions, FlightApiClient, PresentationStyle, ScrapeForm, ScrapeOutcome,
    TerminalView, config::AppConfig,
};
use ratatui::{Terminal, TerminalOptions, Viewport, backend::CrosstermBackend};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "flight-dashboard")]
#[command(about = "Airline flight-price analytics dashboard")]
struct Args {
    /// Extra configuration file layered over the defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Analytics API base URL (overrides configuration)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Presentation style (overrides configuration)
    #[arg(long, global = true, value_enum)]
    style: Option<PresentationStyle>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the analytics and print the dashboard
    Show {
        /// Also fetch the AI insight
        #[arg(long)]
        insight: bool,
    },
    /// Fetch and print the AI insight
    Insight,
    /// Run a scrape on the server, then print the refreshed dashboard
    Scrape {
        #[arg(long)]
        origin: String,
        #[arg(long)]
        destination: String,
        /// First travel day (YYYY-MM-DD); defaults to today
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Number of days to cover, start day included
        #[arg(long)]
        days: Option<u32>,
    },
    /// Print server status and data availability
    Status,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the dashboard
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
        .parse_lossy(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "flight_dashboard=info".to_string()),
        );

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config =
        AppConfig::load_with(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(url) = args.api_url {
        config.api.base_url = url;
    }
    if let Some(style) = args.style {
        config.display.style = style;
    }

    let client = FlightApiClient::new(config.api.base_url.clone(), &config.network)
        .context("Failed to create API client")?;
    tracing::debug!(base_url = %client.base_url(), "API client initialized");

    let view = TerminalView::new(config.display.style, config.display.chart_width);
    let mut dashboard = Dashboard::new(client, view, DashboardOptions::from_config(&config));

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let command = args.command.unwrap_or(Command::Show { insight: false });
    let ok = rt.block_on(run(&mut dashboard, &config, command))?;

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Execute one command and print the resulting frame. Returns whether every
/// step succeeded.
async fn run(
    dashboard: &mut Dashboard<TerminalView>,
    config: &AppConfig,
    command: Command,
) -> Result<bool> {
    let ok = match command {
        Command::Show { insight } => {
            let mut ok = dashboard.load_analytics().await.is_rendered();
            if insight && ok {
                ok = dashboard.load_ai_insight().await.is_rendered();
            }
            ok
        }
        Command::Insight => dashboard.load_ai_insight().await.is_rendered(),
        Command::Scrape {
            origin,
            destination,
            start,
            days,
        } => {
            let form = ScrapeForm {
                origin,
                destination,
                start_date: start.unwrap_or_else(|| chrono::Local::now().date_naive()),
                range_days: days.unwrap_or(config.scrape.default_range_days),
            };
            match dashboard.scrape(&form).await {
                ScrapeOutcome::Completed { analytics, .. } => analytics.is_rendered(),
                ScrapeOutcome::Failed(_) => false,
            }
        }
        Command::Status => {
            let status = dashboard
                .client()
                .fetch_status()
                .await
                .context("Failed to fetch server status")?;
            println!("Server:         {}", status.status);
            println!("Data available: {}", status.data_available);
            if let Some(path) = status.csv_path {
                println!("Data file:      {path}");
            }
            if !status.endpoints.is_empty() {
                println!("Endpoints:      {}", status.endpoints.join(", "));
            }
            return Ok(status.data_available);
        }
    };

    print_frame(dashboard.view())?;
    Ok(ok)
}

/// Draw the frame inline on a terminal, or as plain text when piped.
fn print_frame(view: &TerminalView) -> Result<()> {
    if !std::io::stdout().is_terminal() {
        println!("{}", view.to_text());
        return Ok(());
    }

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(view.height()),
        },
    )
    .context("Failed to initialize terminal")?;
    terminal
        .draw(|frame| frame.render_widget(view, frame.area()))
        .context("Failed to draw dashboard")?;
    println!();
    Ok(())
}
