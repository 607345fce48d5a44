use std::path::PathBuf;

use clap::builder::{styling::AnsiColor, Styles};
use clap::{ArgAction, Parser};

use crate::export::ExportFormat;
use crate::pipeline::Mode;

const ABOUT: &str = "Open-Meteo weather report and history export";

const LONG_ABOUT: &str = "
Look up a place by name and show its current weather, or export the last 7 or 30 days of
hourly observations to a spreadsheet. Weather data is sourced from https://open-meteo.com.

The place is given as \"City\" or \"City, Country\" (e.g. \"Delhi, India\"). The country part
is matched case-insensitively against the start of each candidate's country; when nothing
matches, the best-ranked candidate is used.

Without a place argument an interactive console is started.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(help = "Place to look up (e.g. \"Delhi, India\"); omit to start the console")]
    pub place: Option<String>,

    #[arg(short, long, value_enum, default_value_t = Mode::Current, help = "What to fetch")]
    pub mode: Mode,

    #[arg(short, long, value_name = "DIR", help = "Directory for history exports")]
    pub out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ExportFormat::Xlsx, help = "History export format")]
    pub format: ExportFormat,

    #[arg(long, help = "Warn when falling back to an unverified TLS connection")]
    pub warn_insecure: bool,

    #[arg(short, long, action = ArgAction::Count, help = "More logging (-v debug, -vv trace)")]
    pub verbose: u8,

    #[arg(long, value_name = "FILE", help = "Write logs to a file")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["wxreport"]);
        assert!(args.place.is_none());
        assert_eq!(args.mode, Mode::Current);
        assert_eq!(args.format, ExportFormat::Xlsx);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_history_mode() {
        let args = Args::parse_from([
            "wxreport",
            "Delhi, India",
            "--mode",
            "last-30-days",
            "--out",
            "/tmp/wx",
            "-vv",
        ]);
        assert_eq!(args.place.as_deref(), Some("Delhi, India"));
        assert_eq!(args.mode, Mode::Last30Days);
        assert_eq!(args.out, Some(PathBuf::from("/tmp/wx")));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Args::try_parse_from(["wxreport", "Oslo", "--mode", "month"]).is_err());
    }
}
