//! Spreadsheet export of an hourly series.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::ValueEnum;
use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::error::{Result, WxError};
use crate::weather::HistoricalSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Xlsx => "Excel",
            ExportFormat::Csv => "CSV",
        })
    }
}

/// `{label}_last{days}days_{YYYY-MM-DD}.{ext}`, with spaces turned into `_` and commas dropped.
pub fn file_name(place_label: &str, days: u32, today: NaiveDate, format: ExportFormat) -> String {
    let sanitized = place_label.replace(' ', "_").replace(',', "");
    format!(
        "{sanitized}_last{days}days_{}.{}",
        today.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Creates `dir` if needed and writes the series into it.
pub fn export(
    series: &HistoricalSeries,
    dir: &Path,
    file_name: &str,
    format: ExportFormat,
) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| WxError::filesystem(dir, e))?;
    let path = dir.join(file_name);
    match format {
        ExportFormat::Xlsx => write_xlsx(series, &path)?,
        ExportFormat::Csv => write_csv(series, &path)?,
    }
    info!(path = %path.display(), rows = series.len(), "export written");
    Ok(path)
}

fn write_xlsx(series: &HistoricalSeries, path: &Path) -> Result<()> {
    let fail = |e: rust_xlsxwriter::XlsxError| WxError::filesystem(path, e);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sheet1").map_err(fail)?;

    for (col, header) in HistoricalSeries::COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).map_err(fail)?;
    }
    for (i, row) in series.rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, &row.time).map_err(fail)?;
        for (offset, value) in row.values().into_iter().enumerate() {
            if let Some(value) = value {
                sheet.write_number(r, offset as u16 + 1, value).map_err(fail)?;
            }
        }
    }
    workbook.save(path).map_err(fail)
}

fn write_csv(series: &HistoricalSeries, path: &Path) -> Result<()> {
    let fail = |e: csv::Error| WxError::filesystem(path, e);

    let mut writer = csv::Writer::from_path(path).map_err(fail)?;
    writer.write_record(HistoricalSeries::COLUMNS).map_err(fail)?;
    for row in &series.rows {
        let mut record = vec![row.time.clone()];
        record.extend(
            row.values()
                .iter()
                .map(|v| v.map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record).map_err(fail)?;
    }
    writer.flush().map_err(|e| WxError::filesystem(path, e))
}
