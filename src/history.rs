//! Historical-Range Fetcher: trailing window of hourly observations, exported to a file.

use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use tracing::{debug, warn};

use crate::error::{Result, WxError};
use crate::export::{self, ExportFormat};
use crate::fetch::Transport;
use crate::openmeteo::OpenMeteo;
use crate::pipeline::Status;
use crate::weather::HistoricalSeries;

/// Inclusive calendar range `[today - days, today]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        Self {
            start: today - Days::new(days.into()),
            end: today,
        }
    }
}

pub struct HistoryRequest<'a> {
    pub place_label: &'a str,
    pub days: u32,
    pub out_dir: &'a Path,
    pub format: ExportFormat,
    pub today: NaiveDate,
}

pub fn fetch_series<T: Transport>(
    api: &OpenMeteo<T>,
    lat: f64,
    lon: f64,
    range: DateRange,
) -> Result<HistoricalSeries> {
    let hourly = api
        .archive(lat, lon, range.start, range.end)?
        .hourly
        .ok_or(WxError::NoData {
            what: "hourly history",
        })?;
    let series = HistoricalSeries::from_hourly(hourly);
    if series.is_empty() {
        warn!(start = %range.start, end = %range.end, "archive returned no hourly rows");
    }
    debug!(rows = series.len(), start = %range.start, end = %range.end, "archive series");
    Ok(series)
}

pub fn fetch_history<T: Transport>(
    api: &OpenMeteo<T>,
    lat: f64,
    lon: f64,
    request: &HistoryRequest<'_>,
    notify: &mut dyn FnMut(Status),
) -> Result<PathBuf> {
    let range = DateRange::trailing(request.today, request.days);

    notify(Status::FetchingHistory);
    let series = fetch_series(api, lat, lon, range)?;

    notify(Status::Writing);
    let name = export::file_name(request.place_label, request.days, request.today, request.format);
    let path = export::export(&series, request.out_dir, &name, request.format)?;

    notify(Status::Saved);
    Ok(path)
}
