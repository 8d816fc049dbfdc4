//! The read-only seam between the engine and whatever stores the records.
//!
//! The engine treats the gateway as an opaque fetch function per entity
//! type, scoped to one tenant, with an optional date window. A fetch that
//! matches nothing returns `Ok(vec![])`, never an error; connectivity and
//! authorization failures surface as [`crate::error::InsightsError::Gateway`].

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::records::{
    Check, Commission, InventoryItem, Patient, Payable, ProcedureRecord, Provider, Receivable,
};

/// Optional date window passed down to the store. Both bounds inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl RecordFilter {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            date_from: Some(from),
            date_to: Some(to),
        }
    }

    /// Window covering a single day, used for the dashboard's today counts.
    pub fn on(day: NaiveDate) -> Self {
        Self::between(day, day)
    }
}

/// Read queries per entity type, scoped to a tenant.
///
/// Implementations own persistence, querying and retry policy; the engine
/// never writes through this trait and never retries a failed fetch.
#[async_trait]
pub trait RecordGateway: Send + Sync {
    async fn receivables(&self, tenant_id: &str, filter: RecordFilter) -> Result<Vec<Receivable>>;

    async fn payables(&self, tenant_id: &str, filter: RecordFilter) -> Result<Vec<Payable>>;

    async fn procedures(
        &self,
        tenant_id: &str,
        filter: RecordFilter,
    ) -> Result<Vec<ProcedureRecord>>;

    async fn commissions(&self, tenant_id: &str, filter: RecordFilter) -> Result<Vec<Commission>>;

    async fn checks(&self, tenant_id: &str, filter: RecordFilter) -> Result<Vec<Check>>;

    async fn providers(&self, tenant_id: &str) -> Result<Vec<Provider>>;

    async fn patients(&self, tenant_id: &str) -> Result<Vec<Patient>>;

    async fn inventory(&self, tenant_id: &str) -> Result<Vec<InventoryItem>>;
}
