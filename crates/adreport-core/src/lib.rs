//! Core types for the ad-performance report job
//! this crate contains the shared data structures used across all components.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// PERFORMANCE RECORD //

/// One campaign-day observation of clicks and conversions.
/// Identity is the (date, campaign_name) pair; there is no surrogate id.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub date: NaiveDate, // calendar day of the observation

    pub campaign_name: String, // campaign identifier, repeats across dates

    pub clicks: u32, // total clicks that day

    pub conversions: u32, // total conversions that day

    #[serde(default)]
    pub anomaly: bool, // set by the detector, false until it runs
}

impl PerformanceRecord {
    /// Build a fresh record with the anomaly flag cleared.
    pub fn new(date: NaiveDate, campaign_name: impl Into<String>, clicks: u32, conversions: u32) -> Self {
        Self {
            date,
            campaign_name: campaign_name.into(),
            clicks,
            conversions,
            anomaly: false,
        }
    }
}

// RECORD ORIGIN //

// where a fetched batch of records came from
// the fallback substitution is visible here instead of being swallowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordOrigin {
    Database,  // rows read from the ad_performance table
    Synthetic, // generated fallback data
}

impl RecordOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Synthetic => "synthetic",
        }
    }
}
