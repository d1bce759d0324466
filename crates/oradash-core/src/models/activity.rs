//! Activity samples from the active session history window.

use std::fmt;

/// Grouping key of an activity sample.
pub trait SampleKey {
    /// True when the key carries no identity and must not be ranked.
    fn is_blank(&self) -> bool;
}

/// SQL statement identity: sql_id plus cursor child number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlKey {
    pub sql_id: String,
    pub child: i64,
}

impl SampleKey for SqlKey {
    fn is_blank(&self) -> bool {
        self.sql_id.trim().is_empty()
    }
}

impl fmt::Display for SqlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.sql_id, self.child)
    }
}

/// Session identity: SID plus serial number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub sid: i64,
    pub serial: i64,
}

impl SampleKey for SessionKey {
    fn is_blank(&self) -> bool {
        false
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.sid, self.serial)
    }
}

/// Wait event with its wait class. Sessions on CPU report `ON CPU`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub event: String,
    pub wait_class: String,
}

impl SampleKey for EventKey {
    fn is_blank(&self) -> bool {
        self.event.trim().is_empty()
    }
}

/// A grouped count of history ticks within the look-back window.
///
/// `key` is `None` when the grouping column was null in the source row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySample<K> {
    pub key: Option<K>,
    pub ticks: u64,
}

impl<K> ActivitySample<K> {
    pub fn new(key: K, ticks: u64) -> Self {
        Self {
            key: Some(key),
            ticks,
        }
    }

    pub fn unkeyed(ticks: u64) -> Self {
        Self { key: None, ticks }
    }
}

/// Text and plan of a cursor looked up by [`SqlKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlText {
    pub sql_id: String,
    pub plan_hash: Option<i64>,
    pub text: String,
}

/// Active (non-idle) and blocked session counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCounts {
    pub active: i64,
    pub blocked: i64,
}
