//! Optional daily schedule around the single-run orchestrator

use crate::runner::ReportRunner;
use chrono::{Duration, Local, NaiveTime};
use tracing::{error, info};

/// Run the job every day at `at` (local time), forever.
///
/// Each run is awaited to completion before the next sleep starts, so runs
/// are serialized and never overlap. A failed run is logged and the
/// schedule continues with the next day.
pub async fn run_daily(runner: &ReportRunner, at: NaiveTime) {
    loop {
        let wait = until_next(at);
        info!(run_at = %at, sleep_secs = wait.as_secs(), "scheduler waiting for next run");
        tokio::time::sleep(wait).await;

        match runner.run_once().await {
            Ok(summary) => info!(run_id = %summary.run_id, "scheduled run complete"),
            Err(e) => error!(error = %e, "scheduled run failed"),
        }
    }
}

// duration until the next local occurrence of `at`
fn until_next(at: NaiveTime) -> std::time::Duration {
    let now = Local::now().naive_local();
    let mut next = now.date().and_time(at);
    if next <= now {
        next += Duration::days(1);
    }
    (next - now).to_std().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_run_is_within_a_day() {
        let at = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let wait = until_next(at);
        assert!(wait <= std::time::Duration::from_secs(24 * 60 * 60));
    }
}
