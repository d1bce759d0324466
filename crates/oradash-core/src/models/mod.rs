//! Data models shared between metric sources, the rate engine and the view.

mod activity;
mod counters;
mod sysmetrics;

pub use activity::{ActivitySample, EventKey, SampleKey, SessionCounts, SessionKey, SqlKey, SqlText};
pub use counters::{CounterSnapshot, TIMER_COUNTER};
pub use sysmetrics::{
    AVG_ACTIVE_SESSIONS_METRIC, DB_CPU_RATIO_METRIC, HOST_CPU_METRIC, SysMetrics,
};
