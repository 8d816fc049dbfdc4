//! # Clinic Insights
//!
//! A read-only aggregation engine for clinic management backends: it pulls
//! raw transactional records (receivables, payables, scheduled procedures,
//! provider commissions, post-dated checks) through a [`RecordGateway`]
//! and derives the summarized views the presentation layer renders —
//! period totals, category breakdowns, month-by-month cash-flow series and
//! per-provider performance metrics.
//!
//! ## Core Concepts
//!
//! - **Realized**: a record whose status marks the economic event as
//!   settled (received / paid / completed); only these count toward
//!   revenue and expense totals.
//! - **Pending**: not yet settled but not cancelled; tracked separately.
//! - **Month bucket**: one calendar month's realized revenue and expense
//!   totals inside the requested range.
//! - **Quota**: a fixed monthly revenue target a provider's realized
//!   revenue is measured against.
//!
//! The engine never writes, holds no state between calls and owns no
//! caching; reports are assembled fresh per request, with the independent
//! gateway fetches issued concurrently and joined.
//!
//! ## Example
//!
//! ```rust,ignore
//! use clinic_insights::{ReportConfig, ReportEngine};
//!
//! let engine = ReportEngine::with_config(gateway, ReportConfig::default());
//! let report = engine.financial_report("tenant-1", None, None).await?;
//! println!("revenue {:.2}", report.revenue_total);
//! ```

pub mod categories;
pub mod config;
pub mod error;
pub mod gateway;
pub mod months;
pub mod performance;
pub mod ranking;
pub mod records;
pub mod reports;
pub mod session;
pub mod status;
pub mod utils;

pub use categories::{totals_by_category, CategoryTotal};
pub use config::ReportConfig;
pub use error::{InsightsError, Result};
pub use gateway::{RecordFilter, RecordGateway};
pub use months::{
    build_month_series, default_range, MeasureKind, MonthBucket, MonthSeries, MonthlyPoint,
    YearMonth,
};
pub use performance::{provider_performance, ProviderPerformance};
pub use ranking::{top_procedures, RankingEntry};
pub use records::*;
pub use reports::{
    AppointmentStatusCount, CommissionEntry, CommissionReport, CommissionSummary, DashboardReport,
    DateRange, FinancialReport, LowStockItem, ProviderPerformanceReport, ReportEngine,
    COMMISSION_CATEGORY,
};
pub use session::LatestOnly;
pub use status::{split_by_status, Split, StatusClass, StatusPolicy};
