use serde::{Deserialize, Serialize};

use crate::error::{InsightsError, Result};

/// Tunables for report assembly. Constructor-injected so the aggregation
/// passes stay pure and testable with varying targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Monthly revenue target per provider, used for the performance ratio.
    pub monthly_quota: f64,
    /// Maximum number of procedure-ranking entries.
    pub ranking_size: usize,
    /// Trailing window, in months, when a financial report is requested
    /// without an explicit range.
    pub trailing_months: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            monthly_quota: 10_000.0,
            ranking_size: 10,
            trailing_months: 6,
        }
    }
}

impl ReportConfig {
    pub fn new(monthly_quota: f64, ranking_size: usize, trailing_months: u32) -> Result<Self> {
        if !monthly_quota.is_finite() || monthly_quota <= 0.0 {
            return Err(InsightsError::InvalidConfig(format!(
                "monthly_quota must be positive, got {monthly_quota}"
            )));
        }
        if ranking_size == 0 {
            return Err(InsightsError::InvalidConfig(
                "ranking_size must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            monthly_quota,
            ranking_size,
            trailing_months,
        })
    }
}
