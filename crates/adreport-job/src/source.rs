//! Performance data source: Postgres with a synthetic fallback

use crate::config::AppConfig;
use adreport_core::{PerformanceRecord, RecordOrigin};
use chrono::{Local, NaiveDate};
use rand::prelude::*;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use tracing::{info, warn};

// campaigns used by the synthetic generator
const MOCK_CAMPAIGNS: [&str; 3] = ["Spring Sale", "Summer Launch", "Holiday Promo"];

const QUERY: &str = "\
    SELECT date, campaign_name, clicks, conversions \
    FROM ad_performance \
    WHERE date >= CURRENT_DATE - $1";

// row shape returned by the ad_performance query
#[derive(sqlx::FromRow)]
struct AdPerformanceRow {
    date: NaiveDate,
    campaign_name: String,
    clicks: i32,
    conversions: i32,
}

// fetches the working set for one job run
pub struct DataSource<'a> {
    config: &'a AppConfig,
}

impl<'a> DataSource<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    /// Fetch records for the trailing `range_days` window (inclusive of today).
    ///
    /// Never fails: any database error is logged and downgraded to the
    /// synthetic fallback, and the origin marker says which path produced
    /// the batch.
    pub async fn fetch(&self, range_days: u32) -> (Vec<PerformanceRecord>, RecordOrigin) {
        if self.config.use_mock_data {
            info!("mock data forced by configuration");
            return (synthetic_records(range_days), RecordOrigin::Synthetic);
        }

        match self.fetch_from_db(range_days).await {
            Ok(records) => {
                info!(count = records.len(), "loaded records from database");
                (records, RecordOrigin::Database)
            }
            Err(e) => {
                warn!(error = %e, "database fetch failed, falling back to synthetic data");
                (synthetic_records(range_days), RecordOrigin::Synthetic)
            }
        }
    }

    // single query over a single connection, closed on both paths
    async fn fetch_from_db(&self, range_days: u32) -> Result<Vec<PerformanceRecord>, sqlx::Error> {
        let db = &self.config.database;
        let options = PgConnectOptions::new()
            .host(&db.host)
            .port(db.port)
            .database(&db.dbname)
            .username(&db.user)
            .password(&db.password)
            .ssl_mode(db.ssl_mode());

        let mut conn = PgConnection::connect_with(&options).await?;

        let result = sqlx::query_as::<_, AdPerformanceRow>(QUERY)
            .bind(range_days as i32)
            .fetch_all(&mut conn)
            .await;

        // close before inspecting the query result
        if let Err(e) = conn.close().await {
            warn!(error = %e, "failed to close database connection");
        }

        let rows = result?;
        Ok(rows
            .into_iter()
            .map(|r| {
                PerformanceRecord::new(
                    r.date,
                    r.campaign_name,
                    r.clicks.max(0) as u32,
                    r.conversions.max(0) as u32,
                )
            })
            .collect())
    }
}

/// Generate the fallback batch: one record per campaign per day over the
/// trailing window, clicks in [100, 1000] and conversions in [10, 100].
pub fn synthetic_records(range_days: u32) -> Vec<PerformanceRecord> {
    let mut rng = rand::rng();
    let today = Local::now().date_naive();
    let mut records = Vec::with_capacity(range_days as usize * MOCK_CAMPAIGNS.len());

    for day_offset in 0..range_days {
        let date = today - chrono::Duration::days(day_offset as i64);
        for campaign in MOCK_CAMPAIGNS {
            records.push(PerformanceRecord::new(
                date,
                campaign,
                rng.random_range(100..=1000),
                rng.random_range(10..=100),
            ));
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_synthetic_shape() {
        let records = synthetic_records(7);
        assert_eq!(records.len(), 7 * MOCK_CAMPAIGNS.len());

        for record in &records {
            assert!((100..=1000).contains(&record.clicks));
            assert!((10..=100).contains(&record.conversions));
            assert!(!record.anomaly);
            assert!(MOCK_CAMPAIGNS.contains(&record.campaign_name.as_str()));
        }

        // every one of the last 7 days is present, for every campaign
        let days: HashSet<NaiveDate> = records.iter().map(|r| r.date).collect();
        assert_eq!(days.len(), 7);
        let newest = *days.iter().max().unwrap();
        assert!(days.contains(&(newest - chrono::Duration::days(6))));
    }

    #[test]
    fn test_synthetic_window_scales() {
        assert_eq!(synthetic_records(1).len(), MOCK_CAMPAIGNS.len());
        assert!(synthetic_records(0).is_empty());
    }
}
