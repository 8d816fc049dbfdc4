//! Per-provider performance aggregation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::records::{Commission, ProcedureRecord, Provider};

/// Aggregated numbers for one active provider over the report window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPerformance {
    pub provider_id: String,
    pub provider_name: String,
    pub procedure_count: usize,
    pub revenue_total: f64,
    pub commission_total: f64,
    /// Realized revenue against the monthly quota, capped at 100.
    pub performance_ratio: f64,
}

/// Aggregates completed procedures and paid commissions per active
/// provider. Every active provider appears exactly once, fully zeroed when
/// nothing matched; inactive providers are omitted. Output is ordered by
/// provider name.
pub fn provider_performance(
    providers: &[Provider],
    procedures: &[ProcedureRecord],
    commissions: &[Commission],
    monthly_quota: f64,
) -> Vec<ProviderPerformance> {
    let mut revenue: HashMap<&str, (usize, f64)> = HashMap::new();
    for procedure in procedures {
        let entry = revenue.entry(procedure.provider_id.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += procedure.amount;
    }

    let mut commission_totals: HashMap<&str, f64> = HashMap::new();
    for commission in commissions {
        *commission_totals
            .entry(commission.provider_id.as_str())
            .or_insert(0.0) += commission.commission_amount();
    }

    let mut out: Vec<ProviderPerformance> = providers
        .iter()
        .filter(|p| p.active)
        .map(|provider| {
            let (procedure_count, revenue_total) = revenue
                .get(provider.id.as_str())
                .copied()
                .unwrap_or((0, 0.0));
            let commission_total = commission_totals
                .get(provider.id.as_str())
                .copied()
                .unwrap_or(0.0);

            ProviderPerformance {
                provider_id: provider.id.clone(),
                provider_name: provider.name.clone(),
                procedure_count,
                revenue_total,
                commission_total,
                performance_ratio: quota_ratio(revenue_total, monthly_quota),
            }
        })
        .collect();

    out.sort_by(|a, b| a.provider_name.cmp(&b.provider_name));
    out
}

fn quota_ratio(revenue: f64, quota: f64) -> f64 {
    if quota <= 0.0 {
        return 0.0;
    }
    (revenue / quota * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CommissionStatus, ProcedureStatus};
    use chrono::NaiveDate;

    fn provider(id: &str, name: &str, active: bool) -> Provider {
        Provider {
            id: id.to_string(),
            tenant_id: "t1".to_string(),
            name: name.to_string(),
            active,
        }
    }

    fn procedure(provider_id: &str, amount: f64) -> ProcedureRecord {
        ProcedureRecord {
            id: format!("proc-{provider_id}-{amount}"),
            tenant_id: "t1".to_string(),
            provider_id: provider_id.to_string(),
            procedure_name: "Consulta".to_string(),
            amount,
            scheduled_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            status: ProcedureStatus::Completed,
        }
    }

    fn commission(provider_id: &str, base: f64, pct: f64) -> Commission {
        Commission {
            id: format!("com-{provider_id}"),
            tenant_id: "t1".to_string(),
            provider_id: provider_id.to_string(),
            period_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            base_amount: base,
            percentage: pct,
            status: CommissionStatus::Paid,
            paid_date: NaiveDate::from_ymd_opt(2024, 2, 5),
        }
    }

    #[test]
    fn test_every_active_provider_appears_once_even_with_no_procedures() {
        let providers = vec![
            provider("p1", "Dra. Beatriz", true),
            provider("p2", "Dr. Andre", true),
            provider("p3", "Dra. Carla", false),
        ];
        let procedures = vec![procedure("p1", 400.0)];

        let result = provider_performance(&providers, &procedures, &[], 10_000.0);

        assert_eq!(result.len(), 2);
        // Ordered by name, not by input order.
        assert_eq!(result[0].provider_name, "Dr. Andre");
        assert_eq!(result[0].procedure_count, 0);
        assert!(result[0].revenue_total.abs() < 0.01);
        assert!(result[0].commission_total.abs() < 0.01);
        assert!(result[0].performance_ratio.abs() < 0.01);

        assert_eq!(result[1].provider_name, "Dra. Beatriz");
        assert_eq!(result[1].procedure_count, 1);
    }

    #[test]
    fn test_revenue_and_commission_sums() {
        let providers = vec![provider("p1", "Dra. Beatriz", true)];
        let procedures = vec![procedure("p1", 400.0), procedure("p1", 600.0)];
        let commissions = vec![commission("p1", 1000.0, 30.0)];

        let result = provider_performance(&providers, &procedures, &commissions, 10_000.0);

        assert_eq!(result[0].procedure_count, 2);
        assert!((result[0].revenue_total - 1000.0).abs() < 0.01);
        assert!((result[0].commission_total - 300.0).abs() < 0.01);
        assert!((result[0].performance_ratio - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_ratio_is_capped_at_100() {
        let providers = vec![provider("p1", "Dra. Beatriz", true)];
        let procedures = vec![procedure("p1", 25_000.0)];

        let result = provider_performance(&providers, &procedures, &[], 10_000.0);
        assert!((result[0].performance_ratio - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_non_positive_quota_yields_zero_ratio() {
        let providers = vec![provider("p1", "Dra. Beatriz", true)];
        let procedures = vec![procedure("p1", 5000.0)];

        let result = provider_performance(&providers, &procedures, &[], 0.0);
        assert!(result[0].performance_ratio.abs() < 0.01);
    }
}
