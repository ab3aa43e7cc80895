//! Scrape form handling: date range arithmetic and request construction.

use chrono::{Days, NaiveDate};
use thiserror::Error;

use crate::payload::ScrapeRequest;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrapeError {
    #[error("date range must cover at least one day")]
    EmptyRange,
    #[error("a {range_days}-day range starting {start} runs past the supported calendar")]
    DateOverflow { start: NaiveDate, range_days: u32 },
}

/// User input for one scrape run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeForm {
    pub origin: String,
    pub destination: String,
    pub start_date: NaiveDate,
    /// Number of days to cover, start day included.
    pub range_days: u32,
}

impl ScrapeForm {
    pub fn end_date(&self) -> Result<NaiveDate, ScrapeError> {
        end_date(self.start_date, self.range_days)
    }

    pub fn to_request(&self, filename: &str) -> Result<ScrapeRequest, ScrapeError> {
        Ok(ScrapeRequest {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            start_date: self.start_date,
            end_date: self.end_date()?,
            filename: filename.to_string(),
        })
    }

    /// Status line shown while the request is pending.
    pub fn progress_message(&self) -> String {
        format!(
            "Scraping flight data from {} to {}...",
            self.origin, self.destination
        )
    }
}

/// Last day of a range of `range_days` days starting at `start`.
pub fn end_date(start: NaiveDate, range_days: u32) -> Result<NaiveDate, ScrapeError> {
    let extra = range_days.checked_sub(1).ok_or(ScrapeError::EmptyRange)?;
    start
        .checked_add_days(Days::new(u64::from(extra)))
        .ok_or(ScrapeError::DateOverflow { start, range_days })
}
