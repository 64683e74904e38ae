//! Single-run job orchestration

use crate::chart;
use crate::config::AppConfig;
use crate::detection;
use crate::excel;
use crate::slack::{NotifyOutcome, SlackClient};
use crate::source::DataSource;
use adreport_core::RecordOrigin;
use std::error::Error;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

pub const DEFAULT_RANGE_DAYS: u32 = 7;

// what one run produced, consumed by the CLI summary table
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub origin: RecordOrigin,
    pub record_count: usize,
    pub anomaly_count: usize,
    pub threshold: f64,
    pub chart_png: PathBuf,
    pub chart_pdf: PathBuf,
    pub spreadsheet: PathBuf,
    pub notification: NotifyOutcome,
}

// runs the job pipeline: fetch -> detect -> render -> export -> notify
pub struct ReportRunner {
    config: AppConfig,
    range_days: u32,
    out_dir: PathBuf,
}

impl ReportRunner {
    pub fn new(config: AppConfig, range_days: u32) -> Self {
        Self {
            config,
            range_days,
            out_dir: PathBuf::from("."),
        }
    }

    /// Redirect artifacts away from the working directory.
    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    /// Execute the pipeline once.
    ///
    /// Fetch never fails (it falls back to synthetic data) and notification
    /// is best-effort, so the only fatal stages are render and export;
    /// their errors abort the run and leave earlier artifacts on disk.
    pub async fn run_once(&self) -> Result<RunSummary, Box<dyn Error>> {
        let run_id = Uuid::new_v4();
        info!(%run_id, range_days = self.range_days, "starting report job");

        let source = DataSource::new(&self.config);
        let (mut records, origin) = source.fetch(self.range_days).await;

        let threshold = detection::flag_anomalies(&mut records);
        let anomaly_count = records.iter().filter(|r| r.anomaly).count();

        let (chart_png, chart_pdf) = chart::render(&records, threshold, &self.out_dir)?;
        let spreadsheet = excel::export(&records, &self.out_dir)?;

        let notification = SlackClient::new(&self.config.slack)
            .send_report(&spreadsheet, &chart_pdf)
            .await;

        info!(%run_id, "report job complete");
        Ok(RunSummary {
            run_id,
            origin,
            record_count: records.len(),
            anomaly_count,
            threshold,
            chart_png,
            chart_pdf,
            spreadsheet,
            notification,
        })
    }
}
