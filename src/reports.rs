//! Report assembly.
//!
//! Each report is one logical aggregation pass: the gateway fetches it
//! needs are issued concurrently and joined, then the pure passes from
//! [`crate::status`], [`crate::categories`], [`crate::months`],
//! [`crate::performance`] and [`crate::ranking`] run over the in-memory
//! lists. A failed required fetch aborts the whole report; no partial
//! report is ever returned and nothing is retried here.

use chrono::{Datelike, Local, NaiveDate};
use futures::try_join;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::categories::{totals_by_category, CategoryTotal};
use crate::config::ReportConfig;
use crate::error::{InsightsError, Result};
use crate::gateway::{RecordFilter, RecordGateway};
use crate::months::{build_month_series, MonthBucket, MonthlyPoint};
use crate::performance::{provider_performance, ProviderPerformance};
use crate::ranking::{top_procedures, RankingEntry};
use crate::records::{Commission, CommissionStatus, ProcedureStatus};
use crate::status::{split_by_status, StatusClass, StatusPolicy};
use crate::utils::{first_day_of_month, index_by, months_back};

/// Synthetic expense category for paid commissions in the financial
/// breakdown. The underlying payable categories are free-form pt-BR
/// strings, so this one follows suit.
pub const COMMISSION_CATEGORY: &str = "Comissões";

const APPOINTMENT_STATUSES: [ProcedureStatus; 6] = [
    ProcedureStatus::Scheduled,
    ProcedureStatus::Confirmed,
    ProcedureStatus::InProgress,
    ProcedureStatus::Completed,
    ProcedureStatus::Missed,
    ProcedureStatus::Cancelled,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentStatusCount {
    pub status: ProcedureStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockItem {
    pub id: String,
    pub name: String,
    pub current_stock: u32,
    pub minimum_stock: u32,
}

/// Snapshot for the landing screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub active_patients: usize,
    /// Today's appointments, one entry per status (zero counts included
    /// so the shape is stable).
    pub appointments_today: Vec<AppointmentStatusCount>,
    /// Receivables settled in the current calendar month.
    pub month_revenue: f64,
    pub low_stock: Vec<LowStockItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialReport {
    pub range: DateRange,
    pub revenue_total: f64,
    pub expense_total: f64,
    pub pending_receivable_total: f64,
    pub pending_payable_total: f64,
    pub checks_to_clear_total: f64,
    pub revenue_by_category: Vec<CategoryTotal>,
    pub expense_by_category: Vec<CategoryTotal>,
    pub monthly: Vec<MonthBucket>,
}

/// One commission enriched with the provider's name. Cancelled
/// commissions never appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionEntry {
    pub id: String,
    pub provider_id: String,
    pub provider_name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub base_amount: f64,
    pub percentage: f64,
    pub commission_amount: f64,
    pub status: CommissionStatus,
    pub paid_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionSummary {
    pub total_paid: f64,
    pub total_pending: f64,
    pub total_overall: f64,
    pub count_paid: usize,
    pub count_pending: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionReport {
    pub range: DateRange,
    pub entries: Vec<CommissionEntry>,
    pub summary: CommissionSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPerformanceReport {
    pub range: DateRange,
    pub providers: Vec<ProviderPerformance>,
    pub top_procedures: Vec<RankingEntry>,
}

/// Read-only report assembler over a [`RecordGateway`].
///
/// Holds no mutable state between calls; identical inputs over unchanged
/// records yield structurally equal reports.
pub struct ReportEngine<G> {
    gateway: G,
    config: ReportConfig,
}

impl<G: RecordGateway> ReportEngine<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_config(gateway, ReportConfig::default())
    }

    pub fn with_config(gateway: G, config: ReportConfig) -> Self {
        Self { gateway, config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub async fn dashboard_report(&self, tenant_id: &str) -> Result<DashboardReport> {
        self.dashboard_report_on(tenant_id, Local::now().date_naive())
            .await
    }

    /// Dashboard snapshot with an explicit reference day (exposed so tests
    /// and replays are not tied to the wall clock).
    pub async fn dashboard_report_on(
        &self,
        tenant_id: &str,
        today: NaiveDate,
    ) -> Result<DashboardReport> {
        info!("assembling dashboard report for tenant {tenant_id}");
        let month_start = first_day_of_month(today.year(), today.month());

        let (patients, appointments, receivables, inventory) = try_join!(
            self.gateway.patients(tenant_id),
            self.gateway.procedures(tenant_id, RecordFilter::on(today)),
            self.gateway
                .receivables(tenant_id, RecordFilter::between(month_start, today)),
            self.gateway.inventory(tenant_id),
        )
        .map_err(InsightsError::abort)?;
        debug!(
            "dashboard fetches joined: {} patients, {} appointments, {} receivables, {} items",
            patients.len(),
            appointments.len(),
            receivables.len(),
            inventory.len()
        );

        let receivables = keep_valid(receivables, |r| r.validate());

        let active_patients = patients.iter().filter(|p| p.active).count();

        let appointments_today = APPOINTMENT_STATUSES
            .iter()
            .map(|&status| AppointmentStatusCount {
                status,
                count: appointments
                    .iter()
                    .filter(|a| a.status == status && a.scheduled_date == today)
                    .count(),
            })
            .collect();

        let receivable_split =
            split_by_status(receivables, &StatusPolicy::receivables(), |r| r.status);
        let month_revenue = receivable_split
            .realized
            .iter()
            .filter(|r| {
                r.settled_date
                    .map(|d| d >= month_start && d <= today)
                    .unwrap_or(false)
            })
            .map(|r| r.amount)
            .sum();

        let low_stock = inventory
            .iter()
            .filter(|item| item.is_low_stock())
            .map(|item| LowStockItem {
                id: item.id.clone(),
                name: item.name.clone(),
                current_stock: item.current_stock,
                minimum_stock: item.minimum_stock,
            })
            .collect();

        Ok(DashboardReport {
            active_patients,
            appointments_today,
            month_revenue,
            low_stock,
        })
    }

    pub async fn financial_report(
        &self,
        tenant_id: &str,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<FinancialReport> {
        self.financial_report_on(tenant_id, date_from, date_to, Local::now().date_naive())
            .await
    }

    pub async fn financial_report_on(
        &self,
        tenant_id: &str,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<FinancialReport> {
        let range = self.resolve_range(date_from, date_to, today)?;
        info!(
            "assembling financial report for tenant {tenant_id}, {} to {}",
            range.from, range.to
        );
        let filter = RecordFilter::between(range.from, range.to);

        let (receivables, payables, procedures, commissions, checks) = try_join!(
            self.gateway.receivables(tenant_id, filter),
            self.gateway.payables(tenant_id, filter),
            self.gateway.procedures(tenant_id, filter),
            self.gateway.commissions(tenant_id, filter),
            self.gateway.checks(tenant_id, filter),
        )
        .map_err(InsightsError::abort)?;

        let receivables = keep_valid(receivables, |r| r.validate());
        let payables = keep_valid(payables, |p| p.validate());
        let procedures = keep_valid(procedures, |p| p.validate());
        let commissions = keep_valid(commissions, |c| c.validate());
        let checks = keep_valid(checks, |c| c.validate());

        let receivable_split =
            split_by_status(receivables, &StatusPolicy::receivables(), |r| r.status);
        let payable_split = split_by_status(payables, &StatusPolicy::payables(), |p| p.status);
        let procedure_split =
            split_by_status(procedures, &StatusPolicy::procedures(), |p| p.status);
        let commission_split =
            split_by_status(commissions, &StatusPolicy::commissions(), |c| c.status);
        let check_split = split_by_status(checks, &StatusPolicy::checks(), |c| c.status);

        // The settlement date decides which period a realized record belongs
        // to, for totals and month buckets alike. Undated realized records
        // stay in the totals but cannot land in a bucket.
        let realized_receivables =
            retain_in_period(receivable_split.realized, range, |r| r.settled_date);
        let realized_procedures =
            retain_in_period(procedure_split.realized, range, |p| Some(p.scheduled_date));
        let realized_payables = retain_in_period(payable_split.realized, range, |p| p.paid_date);
        let realized_commissions =
            retain_in_period(commission_split.realized, range, |c| c.paid_date);

        // Revenue rows: realized receivables by category plus completed
        // procedures by procedure name. Expense rows: realized payables by
        // category plus paid commissions under one synthetic category.
        let mut revenue_rows: Vec<(&str, f64)> = realized_receivables
            .iter()
            .map(|r| (r.category.as_str(), r.amount))
            .collect();
        revenue_rows.extend(
            realized_procedures
                .iter()
                .map(|p| (p.procedure_name.as_str(), p.amount)),
        );

        let mut expense_rows: Vec<(&str, f64)> = realized_payables
            .iter()
            .map(|p| (p.category.as_str(), p.amount))
            .collect();
        expense_rows.extend(
            realized_commissions
                .iter()
                .map(|c| (COMMISSION_CATEGORY, c.commission_amount())),
        );

        let revenue_total: f64 = revenue_rows.iter().map(|(_, amount)| amount).sum();
        let expense_total: f64 = expense_rows.iter().map(|(_, amount)| amount).sum();

        let revenue_by_category =
            totals_by_category(&revenue_rows, |row| row.0, |row| row.1);
        let expense_by_category =
            totals_by_category(&expense_rows, |row| row.0, |row| row.1);

        let pending_receivable_total: f64 =
            receivable_split.pending.iter().map(|r| r.amount).sum();
        let pending_payable_total: f64 = payable_split.pending.iter().map(|p| p.amount).sum();
        let checks_to_clear_total: f64 = check_split.pending.iter().map(|c| c.amount).sum();

        let mut points: Vec<MonthlyPoint> = Vec::new();
        points.extend(
            realized_receivables
                .iter()
                .map(|r| MonthlyPoint::revenue(r.settled_date, r.amount)),
        );
        points.extend(
            realized_procedures
                .iter()
                .map(|p| MonthlyPoint::revenue(Some(p.scheduled_date), p.amount)),
        );
        points.extend(
            realized_payables
                .iter()
                .map(|p| MonthlyPoint::expense(p.paid_date, p.amount)),
        );
        points.extend(
            realized_commissions
                .iter()
                .map(|c| MonthlyPoint::expense(c.paid_date, c.commission_amount())),
        );

        let series = build_month_series(range.from, range.to, &points)?;
        if series.skipped > 0 {
            debug!(
                "financial report: {} realized record(s) missing a settlement date",
                series.skipped
            );
        }

        Ok(FinancialReport {
            range,
            revenue_total,
            expense_total,
            pending_receivable_total,
            pending_payable_total,
            checks_to_clear_total,
            revenue_by_category,
            expense_by_category,
            monthly: series.buckets,
        })
    }

    pub async fn commission_report(
        &self,
        tenant_id: &str,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<CommissionReport> {
        self.commission_report_on(tenant_id, date_from, date_to, Local::now().date_naive())
            .await
    }

    pub async fn commission_report_on(
        &self,
        tenant_id: &str,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<CommissionReport> {
        let range = self.resolve_range(date_from, date_to, today)?;
        info!(
            "assembling commission report for tenant {tenant_id}, {} to {}",
            range.from, range.to
        );

        let (commissions, providers) = try_join!(
            self.gateway
                .commissions(tenant_id, RecordFilter::between(range.from, range.to)),
            self.gateway.providers(tenant_id),
        )
        .map_err(InsightsError::abort)?;

        let commissions = keep_valid(commissions, |c| c.validate());
        let names = index_by(&providers, |p| p.id.as_str());
        let policy = StatusPolicy::commissions();

        let mut entries = Vec::new();
        let mut summary = CommissionSummary {
            total_paid: 0.0,
            total_pending: 0.0,
            total_overall: 0.0,
            count_paid: 0,
            count_pending: 0,
        };

        for commission in &commissions {
            match policy.classify(commission.status) {
                StatusClass::Realized => {
                    summary.total_paid += commission.commission_amount();
                    summary.count_paid += 1;
                }
                StatusClass::Pending => {
                    summary.total_pending += commission.commission_amount();
                    summary.count_pending += 1;
                }
                StatusClass::Excluded => continue,
            }
            entries.push(commission_entry(commission, &names));
        }
        summary.total_overall = summary.total_paid + summary.total_pending;

        Ok(CommissionReport {
            range,
            entries,
            summary,
        })
    }

    pub async fn provider_performance_report(
        &self,
        tenant_id: &str,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<ProviderPerformanceReport> {
        self.provider_performance_report_on(
            tenant_id,
            date_from,
            date_to,
            Local::now().date_naive(),
        )
        .await
    }

    pub async fn provider_performance_report_on(
        &self,
        tenant_id: &str,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<ProviderPerformanceReport> {
        let range = self.resolve_range(date_from, date_to, today)?;
        info!(
            "assembling provider performance report for tenant {tenant_id}, {} to {}",
            range.from, range.to
        );
        let filter = RecordFilter::between(range.from, range.to);

        let (procedures, commissions, providers) = try_join!(
            self.gateway.procedures(tenant_id, filter),
            self.gateway.commissions(tenant_id, filter),
            self.gateway.providers(tenant_id),
        )
        .map_err(InsightsError::abort)?;

        let procedures = keep_valid(procedures, |p| p.validate());
        let commissions = keep_valid(commissions, |c| c.validate());

        let procedure_split =
            split_by_status(procedures, &StatusPolicy::procedures(), |p| p.status);
        let commission_split =
            split_by_status(commissions, &StatusPolicy::commissions(), |c| c.status);

        let performance = provider_performance(
            &providers,
            &procedure_split.realized,
            &commission_split.realized,
            self.config.monthly_quota,
        );
        let ranking = top_procedures(
            &procedure_split.realized,
            &providers,
            self.config.ranking_size,
        );

        Ok(ProviderPerformanceReport {
            range,
            providers: performance,
            top_procedures: ranking,
        })
    }

    fn resolve_range(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<DateRange> {
        let to = date_to.unwrap_or(today);
        let from = date_from.unwrap_or_else(|| months_back(to, self.config.trailing_months));

        if to < from {
            return Err(InsightsError::InvalidRange { from, to });
        }
        Ok(DateRange { from, to })
    }
}

/// Drops records that fail boundary validation, logging each one. A bad
/// row degrades the report instead of failing it.
fn keep_valid<T, F>(records: Vec<T>, validate: F) -> Vec<T>
where
    F: Fn(&T) -> Result<()>,
{
    records
        .into_iter()
        .filter(|record| match validate(record) {
            Ok(()) => true,
            Err(err) => {
                warn!("{err}; record skipped");
                false
            }
        })
        .collect()
}

/// Keeps realized records whose settlement date falls inside the range.
/// Undated records are kept so they still count toward totals.
fn retain_in_period<T, F>(records: Vec<T>, range: DateRange, date_of: F) -> Vec<T>
where
    F: Fn(&T) -> Option<NaiveDate>,
{
    records
        .into_iter()
        .filter(|record| match date_of(record) {
            Some(date) => date >= range.from && date <= range.to,
            None => true,
        })
        .collect()
}

fn commission_entry(
    commission: &Commission,
    names: &std::collections::HashMap<&str, &crate::records::Provider>,
) -> CommissionEntry {
    let provider_name = names
        .get(commission.provider_id.as_str())
        .map(|p| p.name.clone())
        .unwrap_or_else(|| "(sem cadastro)".to_string());

    CommissionEntry {
        id: commission.id.clone(),
        provider_id: commission.provider_id.clone(),
        provider_name,
        period_start: commission.period_start,
        period_end: commission.period_end,
        base_amount: commission.base_amount,
        percentage: commission.percentage,
        commission_amount: commission.commission_amount(),
        status: commission.status,
        paid_date: commission.paid_date,
    }
}
