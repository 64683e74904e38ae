// AdReport CLI - runs the ad-performance report job

use adreport_job::runner::RunSummary;
use adreport_job::slack::NotifyOutcome;
use adreport_job::{AppConfig, ReportRunner, scheduler};
use chrono::NaiveTime;
use clap::Parser;
use colored::Colorize;
use comfy_table::{Table, presets::UTF8_FULL};

#[derive(Parser)]
#[command(name = "adreport")]
#[command(version = "0.1.0")]
#[command(about = "Ad-performance report generator", long_about = None)]
struct Cli {
    /// Force synthetic data instead of querying Postgres
    #[arg(long)]
    mock: bool,

    /// Trailing window of days to report on
    #[arg(long, default_value = "7")]
    days: u32,

    /// Run every day at --at instead of once
    #[arg(long)]
    schedule: bool,

    /// Daily run time for --schedule (HH:MM, local time)
    #[arg(long, default_value = "08:00")]
    at: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if cli.mock {
        config.use_mock_data = true;
    }

    let runner = ReportRunner::new(config, cli.days);

    if cli.schedule {
        let at = NaiveTime::parse_from_str(&cli.at, "%H:%M")?;
        println!("{}", format!("Scheduling daily report at {at}").cyan());
        scheduler::run_daily(&runner, at).await;
    } else {
        match runner.run_once().await {
            Ok(summary) => print_summary(&summary),
            Err(e) => {
                eprintln!("{} {}", "Report job failed:".red().bold(), e);
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Run", "Value"]);
    table.add_row(vec!["Run id".to_string(), summary.run_id.to_string()]);
    table.add_row(vec!["Data source".to_string(), summary.origin.as_str().to_string()]);
    table.add_row(vec!["Records".to_string(), summary.record_count.to_string()]);
    table.add_row(vec!["Anomalies".to_string(), summary.anomaly_count.to_string()]);
    table.add_row(vec!["Threshold".to_string(), format!("{:.1}", summary.threshold)]);
    table.add_row(vec!["Chart (PNG)".to_string(), summary.chart_png.display().to_string()]);
    table.add_row(vec!["Chart (PDF)".to_string(), summary.chart_pdf.display().to_string()]);
    table.add_row(vec!["Spreadsheet".to_string(), summary.spreadsheet.display().to_string()]);
    table.add_row(vec!["Slack".to_string(), slack_status(summary.notification)]);
    println!("{table}");

    if summary.anomaly_count > 0 {
        println!(
            "{}",
            format!("⚠ {} record(s) above the anomaly threshold", summary.anomaly_count)
                .yellow()
                .bold()
        );
    }
}

fn slack_status(outcome: NotifyOutcome) -> String {
    match outcome {
        NotifyOutcome::Sent => "sent".green().to_string(),
        NotifyOutcome::Skipped => "skipped".yellow().to_string(),
        NotifyOutcome::Failed => "failed".red().to_string(),
    }
}
