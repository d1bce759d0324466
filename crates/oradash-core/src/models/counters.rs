//! Absolute counter snapshots.

use std::collections::HashMap;

/// Reserved counter holding elapsed hundredths of a second since an
/// arbitrary epoch (`v$timer.hsecs`).
pub const TIMER_COUNTER: &str = "timer";

/// Point-in-time read of cumulative instance statistics.
///
/// Values are expected to be monotonically non-decreasing between two reads
/// of the same instance; a regression means the instance restarted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    values: HashMap<String, i64>,
}

impl CounterSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: i64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }

    pub fn timer(&self) -> Option<i64> {
        self.get(TIMER_COUNTER)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for CounterSnapshot {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
