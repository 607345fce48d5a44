//! Top-level invocation: resolve, then either report current conditions or export history.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use tracing::{error, info};

use crate::current::fetch_current;
use crate::error::{Result, WxError};
use crate::export::ExportFormat;
use crate::fetch::Transport;
use crate::history::{fetch_history, HistoryRequest};
use crate::openmeteo::OpenMeteo;
use crate::resolve::resolve;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    #[value(name = "current")]
    Current,
    #[value(name = "last-7-days")]
    Last7Days,
    #[value(name = "last-30-days")]
    Last30Days,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Current, Mode::Last7Days, Mode::Last30Days];

    /// Length of the trailing window, `None` for the live observation.
    pub fn days(self) -> Option<u32> {
        match self {
            Mode::Current => None,
            Mode::Last7Days => Some(7),
            Mode::Last30Days => Some(30),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Current => "Current Weather (show in console)",
            Mode::Last7Days => "Last 7 Days (download file)",
            Mode::Last30Days => "Last 30 Days (download file)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Progress,
    Success,
    Failure,
}

/// Progress transitions reported to the caller, in the order they occur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    FetchingCoordinates,
    FetchingCurrent,
    Fetched,
    FetchingHistory,
    Writing,
    Saved,
    Cancelled,
    Failed(String),
}

impl Status {
    pub fn message(&self) -> String {
        match self {
            Status::FetchingCoordinates => "Fetching coordinates…".to_string(),
            Status::FetchingCurrent => "Fetching current weather…".to_string(),
            Status::Fetched => "Data fetched successfully!".to_string(),
            Status::FetchingHistory => "Fetching historical data… Please wait…".to_string(),
            Status::Writing => "Writing file…".to_string(),
            Status::Saved => "File saved successfully!".to_string(),
            Status::Cancelled => WxError::Cancelled.user_message(),
            Status::Failed(message) => message.clone(),
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Status::Fetched | Status::Saved => Tone::Success,
            Status::Cancelled | Status::Failed(_) => Tone::Failure,
            _ => Tone::Progress,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub place: String,
    pub mode: Mode,
    pub out_dir: Option<PathBuf>,
    pub format: ExportFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Text appended to the console; empty when the user cancelled.
    pub console: String,
    pub succeeded: bool,
}

pub fn run<T: Transport>(
    api: &OpenMeteo<T>,
    request: &Request,
    today: NaiveDate,
    notify: &mut dyn FnMut(Status),
) -> Result<String> {
    let label = request.place.trim();
    if label.is_empty() {
        return Err(WxError::EmptyPlace);
    }

    notify(Status::FetchingCoordinates);
    let place = resolve(api, label)?;

    let Some(days) = request.mode.days() else {
        notify(Status::FetchingCurrent);
        let report = fetch_current(api, place.latitude, place.longitude, label)?;
        notify(Status::Fetched);
        return Ok(report);
    };

    let out_dir = request
        .out_dir
        .as_deref()
        .filter(|dir| !dir.as_os_str().is_empty())
        .ok_or(WxError::Cancelled)?;
    let history = HistoryRequest {
        place_label: label,
        days,
        out_dir,
        format: request.format,
        today,
    };
    let path = fetch_history(api, place.latitude, place.longitude, &history, notify)?;
    Ok(format!(
        "{days}-Day data saved to {}:\n{}",
        request.format,
        path.display()
    ))
}

/// Runs one request and turns any error into a final status and console line.
pub fn invoke<T: Transport>(
    api: &OpenMeteo<T>,
    request: &Request,
    today: NaiveDate,
    notify: &mut dyn FnMut(Status),
) -> Outcome {
    info!(place = %request.place, mode = ?request.mode, "fetch requested");
    match run(api, request, today, notify) {
        Ok(console) => Outcome {
            console,
            succeeded: true,
        },
        Err(err) if err.is_cancelled() => {
            notify(Status::Cancelled);
            Outcome {
                console: String::new(),
                succeeded: false,
            }
        }
        Err(err) => {
            error!(%err, "fetch failed");
            let message = err.user_message();
            notify(Status::Failed(message.clone()));
            Outcome {
                console: message,
                succeeded: false,
            }
        }
    }
}
