//! Metric sources.
//!
//! A [`MetricsSource`] answers the handful of read-only questions the dashboard
//! asks on every refresh cycle. Grouping and counting of history samples is
//! done by the source; ranking and rate derivation happen downstream.
//!
//! ```text
//!   ┌──────────────────┐      ┌──────────────┐
//!   │ OracleSource     │      │ MockSource   │
//!   │ (v$ views)       │      │ (scripted)   │
//!   └────────┬─────────┘      └──────┬───────┘
//!            └───────────┬───────────┘
//!                 ┌──────▼───────┐
//!                 │ MetricsSource│ (trait)
//!                 └──────┬───────┘
//!                        │
//!                    Dashboard
//! ```

mod descriptor;
pub mod mock;
#[cfg(feature = "oracle")]
pub mod oracle;

use crate::models::{
    ActivitySample, CounterSnapshot, EventKey, SessionCounts, SessionKey, SqlKey, SqlText,
    SysMetrics,
};

pub use descriptor::ConnectDescriptor;
pub use mock::MockSource;
#[cfg(feature = "oracle")]
pub use oracle::OracleSource;

/// Error type for metric collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Connect descriptor could not be parsed.
    InvalidDescriptor(String),
    /// Connection failed or was lost.
    Connection(String),
    /// Query execution or row decoding failed.
    Query(String),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::InvalidDescriptor(msg) => write!(f, "invalid connect descriptor: {}", msg),
            SourceError::Connection(msg) => write!(f, "connection error: {}", msg),
            SourceError::Query(msg) => write!(f, "query error: {}", msg),
        }
    }
}

impl std::error::Error for SourceError {}

/// Read-only view of a running database instance.
pub trait MetricsSource {
    /// Instance name for the header banner.
    fn instance_name(&mut self) -> Result<String, SourceError>;

    /// Cumulative statistics plus the reserved timer counter.
    fn counters(&mut self) -> Result<CounterSnapshot, SourceError>;

    /// Active and blocked session counts.
    fn session_counts(&mut self) -> Result<SessionCounts, SourceError>;

    /// Host CPU, DB CPU ratio and average active sessions over the last minute.
    fn sysmetrics(&mut self) -> Result<SysMetrics, SourceError>;

    /// History ticks grouped by SQL id and child, busiest first.
    fn top_sql(&mut self) -> Result<Vec<ActivitySample<SqlKey>>, SourceError>;

    /// History ticks grouped by session, busiest first.
    fn top_sessions(&mut self) -> Result<Vec<ActivitySample<SessionKey>>, SourceError>;

    /// History ticks grouped by wait event and class, busiest first.
    fn top_events(&mut self) -> Result<Vec<ActivitySample<EventKey>>, SourceError>;

    /// Text and plan of one cursor; `Ok(None)` when it aged out of the
    /// shared pool or its text is null.
    fn sql_text(&mut self, key: &SqlKey) -> Result<Option<SqlText>, SourceError>;
}
