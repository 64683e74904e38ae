//! Spreadsheet export

use adreport_core::PerformanceRecord;
use chrono::Local;
use rust_xlsxwriter::Workbook;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SHEET_NAME: &str = "Report";
pub const COLUMNS: [&str; 5] = ["date", "campaign_name", "clicks", "conversions", "anomaly"];

/// Write the annotated batch to a single-sheet xlsx named with the current
/// date, so daily runs do not overwrite each other. Returns the file path.
pub fn export(records: &[PerformanceRecord], out_dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let today = Local::now().format("%Y-%m-%d");
    let path = out_dir.join(format!("marketing_report_{today}.xlsx"));

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, record.date.to_string())?;
        sheet.write_string(row, 1, record.campaign_name.as_str())?;
        sheet.write_number(row, 2, f64::from(record.clicks))?;
        sheet.write_number(row, 3, f64::from(record.conversions))?;
        sheet.write_boolean(row, 4, record.anomaly)?;
    }

    workbook.save(&path)?;
    info!(path = %path.display(), rows = records.len(), "spreadsheet saved");
    Ok(path)
}
