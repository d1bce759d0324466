//! Per-second rates from two absolute counter snapshots.
//!
//! Rates are derived from the difference of two reads of `v$sysstat` divided
//! by the time elapsed between them on the instance's own clock (the reserved
//! [`TIMER_COUNTER`], in hundredths of a second). A rate is `None` whenever it
//! cannot be computed honestly: first sample, stalled clock, missing counter,
//! or counter regression after an instance restart.

use std::collections::HashMap;

use crate::models::{CounterSnapshot, TIMER_COUNTER};

// ---------------------------------------------------------------------------
// Delta helpers
// ---------------------------------------------------------------------------

/// Compute i64 delta, returning `None` on counter regression (instance restart).
pub fn di64(curr: i64, prev: i64) -> Option<i64> {
    (curr >= prev).then(|| curr.saturating_sub(prev))
}

/// Seconds elapsed between two snapshots, from the reserved timer counter.
///
/// Returns `None` unless both snapshots carry a timer and it moved forward.
pub fn elapsed_secs(previous: &CounterSnapshot, current: &CounterSnapshot) -> Option<f64> {
    let delta = di64(current.timer()?, previous.timer()?)?;
    (delta > 0).then(|| delta as f64 / 100.0)
}

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

/// Derived per-second rates, keyed by counter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rates {
    elapsed_secs: Option<f64>,
    values: HashMap<String, Option<f64>>,
}

impl Rates {
    /// Rate for `name`, or `None` when unavailable or never requested.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied().flatten()
    }

    pub fn elapsed_secs(&self) -> Option<f64> {
        self.elapsed_secs
    }

    /// True when no requested rate could be computed.
    pub fn is_unavailable(&self) -> bool {
        self.values.values().all(Option::is_none)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Computes `(current[n] - previous[n]) / elapsed_secs` for every name.
///
/// Every requested name is present in the result. When `previous` is empty or
/// the timer did not advance, every rate is unavailable.
pub fn compute_rates(
    previous: &CounterSnapshot,
    current: &CounterSnapshot,
    names: &[&str],
) -> Rates {
    let elapsed = elapsed_secs(previous, current);

    let values = names
        .iter()
        .map(|&name| {
            let rate = elapsed.and_then(|dt| {
                let delta = di64(current.get(name)?, previous.get(name)?)?;
                Some(delta as f64 / dt)
            });
            (name.to_string(), rate)
        })
        .collect();

    Rates {
        elapsed_secs: elapsed,
        values,
    }
}

// ---------------------------------------------------------------------------
// Snapshot state
// ---------------------------------------------------------------------------

/// The two most recent counter snapshots, owned by the refresh scheduler.
#[derive(Debug, Default)]
pub struct SnapshotPair {
    previous: CounterSnapshot,
    current: CounterSnapshot,
}

impl SnapshotPair {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `next` the current snapshot; the old current becomes previous.
    pub fn rotate(&mut self, next: CounterSnapshot) {
        self.previous = std::mem::replace(&mut self.current, next);
    }

    pub fn previous(&self) -> &CounterSnapshot {
        &self.previous
    }

    pub fn current(&self) -> &CounterSnapshot {
        &self.current
    }

    pub fn rates(&self, names: &[&str]) -> Rates {
        compute_rates(&self.previous, &self.current, names)
    }
}
