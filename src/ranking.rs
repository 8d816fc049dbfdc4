//! Top procedures by realized revenue, per (provider, procedure name).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::records::{ProcedureRecord, Provider};
use crate::utils::index_by;

/// Used when a procedure references a provider id the gateway no longer
/// returns (deactivated or purged registration).
const UNKNOWN_PROVIDER: &str = "(sem cadastro)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub provider_id: String,
    pub provider_name: String,
    pub procedure_name: String,
    pub quantity: usize,
    pub revenue_total: f64,
}

/// Accumulates count and revenue per (provider, procedure name) and
/// returns at most `limit` entries, sorted descending by revenue with a
/// stable first-seen tie-break.
pub fn top_procedures(
    procedures: &[ProcedureRecord],
    providers: &[Provider],
    limit: usize,
) -> Vec<RankingEntry> {
    let names = index_by(providers, |p| p.id.as_str());

    // Composite key -> (first-seen index, quantity, revenue).
    let mut grouped: HashMap<(&str, &str), (usize, usize, f64)> = HashMap::new();
    let mut next_index = 0usize;

    for procedure in procedures {
        let key = (
            procedure.provider_id.as_str(),
            procedure.procedure_name.as_str(),
        );
        let entry = grouped.entry(key).or_insert_with(|| {
            let idx = next_index;
            next_index += 1;
            (idx, 0, 0.0)
        });
        entry.1 += 1;
        entry.2 += procedure.amount;
    }

    let mut entries: Vec<(usize, RankingEntry)> = grouped
        .into_iter()
        .map(|((provider_id, procedure_name), (idx, quantity, revenue_total))| {
            let provider_name = names
                .get(provider_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNKNOWN_PROVIDER.to_string());

            (
                idx,
                RankingEntry {
                    provider_id: provider_id.to_string(),
                    provider_name,
                    procedure_name: procedure_name.to_string(),
                    quantity,
                    revenue_total,
                },
            )
        })
        .collect();

    entries.sort_by(|(a_idx, a), (b_idx, b)| {
        b.revenue_total
            .total_cmp(&a.revenue_total)
            .then(a_idx.cmp(b_idx))
    });

    entries
        .into_iter()
        .take(limit)
        .map(|(_, entry)| entry)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ProcedureStatus;
    use chrono::NaiveDate;

    fn procedure(provider_id: &str, name: &str, amount: f64) -> ProcedureRecord {
        ProcedureRecord {
            id: format!("proc-{provider_id}-{name}-{amount}"),
            tenant_id: "t1".to_string(),
            provider_id: provider_id.to_string(),
            procedure_name: name.to_string(),
            amount,
            scheduled_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            status: ProcedureStatus::Completed,
        }
    }

    fn provider(id: &str, name: &str) -> Provider {
        Provider {
            id: id.to_string(),
            tenant_id: "t1".to_string(),
            name: name.to_string(),
            active: true,
        }
    }

    #[test]
    fn test_same_provider_and_name_merge_into_one_entry() {
        let procedures = vec![
            procedure("p1", "Limpeza", 100.0),
            procedure("p1", "Limpeza", 150.0),
        ];
        let providers = vec![provider("p1", "Dra. Beatriz")];

        let ranking = top_procedures(&procedures, &providers, 10);

        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].quantity, 2);
        assert!((ranking[0].revenue_total - 250.0).abs() < 0.01);
        assert_eq!(ranking[0].provider_name, "Dra. Beatriz");
    }

    #[test]
    fn test_same_name_different_provider_stays_separate() {
        let procedures = vec![
            procedure("p1", "Limpeza", 100.0),
            procedure("p2", "Limpeza", 150.0),
        ];
        let providers = vec![provider("p1", "Dra. Beatriz"), provider("p2", "Dr. Andre")];

        let ranking = top_procedures(&procedures, &providers, 10);
        assert_eq!(ranking.len(), 2);
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        let mut procedures = Vec::new();
        for i in 0..15 {
            procedures.push(procedure("p1", &format!("Proc{i}"), (i as f64 + 1.0) * 10.0));
        }
        let providers = vec![provider("p1", "Dra. Beatriz")];

        let ranking = top_procedures(&procedures, &providers, 10);

        assert_eq!(ranking.len(), 10);
        for pair in ranking.windows(2) {
            assert!(pair[0].revenue_total >= pair[1].revenue_total);
        }
        assert!((ranking[0].revenue_total - 150.0).abs() < 0.01);
    }

    #[test]
    fn test_unknown_provider_gets_placeholder_name() {
        let procedures = vec![procedure("ghost", "Limpeza", 100.0)];
        let ranking = top_procedures(&procedures, &[], 10);
        assert_eq!(ranking[0].provider_name, UNKNOWN_PROVIDER);
    }

    #[test]
    fn test_empty_input_yields_empty_ranking() {
        assert!(top_procedures(&[], &[], 10).is_empty());
    }
}
