//! Status-based inclusion rules.
//!
//! Each record set carries its own notion of "the economic event happened"
//! (received, paid, completed, cleared) versus "still open" (pending,
//! overdue, to clear). Cancelled-class statuses fall in neither set and are
//! dropped from both realized and pending aggregates.

use crate::records::{
    CheckStatus, CommissionStatus, PayableStatus, ProcedureStatus, ReceivableStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Realized,
    Pending,
    Excluded,
}

/// Which statuses of one record type count as realized and which as
/// pending. Anything listed in neither set classifies as
/// [`StatusClass::Excluded`].
#[derive(Debug, Clone)]
pub struct StatusPolicy<S> {
    realized: Vec<S>,
    pending: Vec<S>,
}

impl<S: PartialEq + Copy> StatusPolicy<S> {
    pub fn new(realized: Vec<S>, pending: Vec<S>) -> Self {
        Self { realized, pending }
    }

    pub fn classify(&self, status: S) -> StatusClass {
        if self.realized.contains(&status) {
            StatusClass::Realized
        } else if self.pending.contains(&status) {
            StatusClass::Pending
        } else {
            StatusClass::Excluded
        }
    }
}

impl StatusPolicy<ReceivableStatus> {
    pub fn receivables() -> Self {
        Self::new(
            vec![ReceivableStatus::Received],
            vec![ReceivableStatus::Pending, ReceivableStatus::Overdue],
        )
    }
}

impl StatusPolicy<PayableStatus> {
    pub fn payables() -> Self {
        Self::new(
            vec![PayableStatus::Paid],
            vec![PayableStatus::Pending, PayableStatus::Overdue],
        )
    }
}

impl StatusPolicy<ProcedureStatus> {
    /// Only completed procedures count as realized revenue. Scheduled,
    /// confirmed and in-progress ones are still open; missed and cancelled
    /// are excluded.
    pub fn procedures() -> Self {
        Self::new(
            vec![ProcedureStatus::Completed],
            vec![
                ProcedureStatus::Scheduled,
                ProcedureStatus::Confirmed,
                ProcedureStatus::InProgress,
            ],
        )
    }
}

impl StatusPolicy<CommissionStatus> {
    pub fn commissions() -> Self {
        Self::new(
            vec![CommissionStatus::Paid],
            vec![CommissionStatus::Pending],
        )
    }
}

impl StatusPolicy<CheckStatus> {
    pub fn checks() -> Self {
        Self::new(vec![CheckStatus::Cleared], vec![CheckStatus::ToClear])
    }
}

/// The two disjoint outputs of a status split. Excluded records appear in
/// neither list.
#[derive(Debug, Clone)]
pub struct Split<T> {
    pub realized: Vec<T>,
    pub pending: Vec<T>,
}

/// Partitions `records` by the policy. Every input record lands in exactly
/// one output list or is dropped; no record is duplicated.
pub fn split_by_status<T, S, F>(records: Vec<T>, policy: &StatusPolicy<S>, status_of: F) -> Split<T>
where
    S: PartialEq + Copy,
    F: Fn(&T) -> S,
{
    let mut realized = Vec::new();
    let mut pending = Vec::new();

    for record in records {
        match policy.classify(status_of(&record)) {
            StatusClass::Realized => realized.push(record),
            StatusClass::Pending => pending.push(record),
            StatusClass::Excluded => {}
        }
    }

    Split { realized, pending }
}
