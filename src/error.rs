use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("Gateway fetch failed for {entity}: {message}")]
    Gateway { entity: &'static str, message: String },

    #[error("Malformed {entity} record {id}: {details}")]
    MalformedRecord {
        entity: &'static str,
        id: String,
        details: String,
    },

    #[error("Report aborted: {0}")]
    AggregationAborted(#[source] Box<InsightsError>),

    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange {
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl InsightsError {
    /// Wraps a required-fetch failure so the caller sees one aggregated
    /// failure for the whole report.
    pub fn abort(cause: InsightsError) -> Self {
        InsightsError::AggregationAborted(Box::new(cause))
    }
}

pub type Result<T> = std::result::Result<T, InsightsError>;
