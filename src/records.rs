//! Typed, read-only snapshots of the record sets the engine aggregates.
//!
//! Every record carries its `tenant_id`; the engine never queries across
//! tenants. All structs here are plain data validated at the gateway
//! boundary, never mutated by the aggregation passes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{InsightsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ReceivableStatus {
    Pending,
    Received,
    Overdue,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PayableStatus {
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

/// Status of a scheduled procedure. Only [`ProcedureStatus::Completed`]
/// counts as realized revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ProcedureStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Missed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum CommissionStatus {
    Pending,
    Paid,
    Cancelled,
}

/// Status of a post-dated check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum CheckStatus {
    ToClear,
    Cleared,
    Returned,
    Cancelled,
}

/// An accounts-receivable entry (consultation fee, treatment installment).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receivable {
    pub id: String,
    pub tenant_id: String,
    pub amount: f64,
    pub category: String,
    pub due_date: NaiveDate,
    pub settled_date: Option<NaiveDate>,
    pub status: ReceivableStatus,
}

/// An accounts-payable entry (rent, supplies, lab fees).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payable {
    pub id: String,
    pub tenant_id: String,
    pub amount: f64,
    pub category: String,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub status: PayableStatus,
}

/// A scheduled procedure, attributed to a provider. Doubles as the
/// appointment record for the dashboard's today-by-status counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureRecord {
    pub id: String,
    pub tenant_id: String,
    pub provider_id: String,
    pub procedure_name: String,
    pub amount: f64,
    pub scheduled_date: NaiveDate,
    pub status: ProcedureStatus,
}

/// A provider commission accrued over a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commission {
    pub id: String,
    pub tenant_id: String,
    pub provider_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub base_amount: f64,
    /// Percentage of `base_amount` owed, in [0, 100].
    pub percentage: f64,
    pub status: CommissionStatus,
    pub paid_date: Option<NaiveDate>,
}

impl Commission {
    pub fn commission_amount(&self) -> f64 {
        self.base_amount * self.percentage / 100.0
    }

    pub fn validate(&self) -> Result<()> {
        ensure_amount("commission", &self.id, self.base_amount)?;
        if !self.percentage.is_finite() || !(0.0..=100.0).contains(&self.percentage) {
            return Err(InsightsError::MalformedRecord {
                entity: "commission",
                id: self.id.clone(),
                details: format!("percentage {} outside [0, 100]", self.percentage),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Check {
    pub id: String,
    pub tenant_id: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: CheckStatus,
}

/// A clinical staff member (dentist) procedures and commissions are
/// attributed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub current_stock: u32,
    pub minimum_stock: u32,
}

impl InventoryItem {
    /// Below-minimum items surface on the dashboard.
    pub fn is_low_stock(&self) -> bool {
        self.current_stock < self.minimum_stock
    }
}

impl Receivable {
    pub fn validate(&self) -> Result<()> {
        ensure_amount("receivable", &self.id, self.amount)
    }
}

impl Payable {
    pub fn validate(&self) -> Result<()> {
        ensure_amount("payable", &self.id, self.amount)
    }
}

impl ProcedureRecord {
    pub fn validate(&self) -> Result<()> {
        ensure_amount("procedure", &self.id, self.amount)
    }
}

impl Check {
    pub fn validate(&self) -> Result<()> {
        ensure_amount("check", &self.id, self.amount)
    }
}

fn ensure_amount(entity: &'static str, id: &str, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(InsightsError::MalformedRecord {
            entity,
            id: id.to_string(),
            details: format!("amount {amount} is not a non-negative number"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commission_amount() {
        let commission = Commission {
            id: "c1".to_string(),
            tenant_id: "t1".to_string(),
            provider_id: "p1".to_string(),
            period_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            base_amount: 4000.0,
            percentage: 30.0,
            status: CommissionStatus::Paid,
            paid_date: NaiveDate::from_ymd_opt(2024, 2, 5),
        };

        assert!((commission.commission_amount() - 1200.0).abs() < 0.01);
    }

    #[test]
    fn test_low_stock_boundary() {
        let item = InventoryItem {
            id: "i1".to_string(),
            tenant_id: "t1".to_string(),
            name: "Resina".to_string(),
            current_stock: 5,
            minimum_stock: 5,
        };
        // Equal to minimum is not low.
        assert!(!item.is_low_stock());

        let item = InventoryItem {
            current_stock: 4,
            ..item
        };
        assert!(item.is_low_stock());
    }

    #[test]
    fn test_validate_rejects_bad_amounts() {
        let receivable = Receivable {
            id: "r1".to_string(),
            tenant_id: "t1".to_string(),
            amount: -50.0,
            category: "Consulta".to_string(),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            settled_date: None,
            status: ReceivableStatus::Pending,
        };
        assert!(matches!(
            receivable.validate(),
            Err(InsightsError::MalformedRecord { entity: "receivable", .. })
        ));

        let receivable = Receivable {
            amount: 50.0,
            ..receivable
        };
        assert!(receivable.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_percentage() {
        let commission = Commission {
            id: "c1".to_string(),
            tenant_id: "t1".to_string(),
            provider_id: "p1".to_string(),
            period_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            base_amount: 1000.0,
            percentage: 150.0,
            status: CommissionStatus::Pending,
            paid_date: None,
        };
        assert!(matches!(
            commission.validate(),
            Err(InsightsError::MalformedRecord { entity: "commission", .. })
        ));

        let commission = Commission {
            percentage: 30.0,
            ..commission
        };
        assert!(commission.validate().is_ok());
    }

    #[test]
    fn test_status_serialization_is_pascal_case() {
        let json = serde_json::to_string(&ReceivableStatus::Received).unwrap();
        assert_eq!(json, "\"Received\"");

        let parsed: CheckStatus = serde_json::from_str("\"ToClear\"").unwrap();
        assert_eq!(parsed, CheckStatus::ToClear);
    }
}
