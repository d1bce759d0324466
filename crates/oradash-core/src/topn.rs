//! Bounded top-N ranking of activity samples.
//!
//! Samples arrive already grouped and counted by the source; this module only
//! drops keyless rows, ranks, truncates and annotates each survivor with its
//! share of the look-back window.

use crate::models::{ActivitySample, SampleKey};

/// History samples in the look-back window: 5 minutes of 1-second ticks.
pub const WINDOW_TICKS: u64 = 300;

/// Rows per top-N panel.
pub const TOP_K: usize = 5;

/// One ranked entry with its truncating integer share of the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopEntry<K> {
    pub key: K,
    pub ticks: u64,
    /// `ticks * 100 / window`, floor-divided and capped at 100.
    pub percent: u64,
    /// Set when the raw share exceeded 100% (or the window was empty), so the
    /// capped `percent` must not be displayed as an exact value.
    pub clamped: bool,
}

/// Ranked list of at most `k` entries, highest tick count first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopNList<K> {
    entries: Vec<TopEntry<K>>,
}

impl<K> TopNList<K> {
    pub fn entries(&self) -> &[TopEntry<K>] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TopEntry<K>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K> Default for TopNList<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<'a, K> IntoIterator for &'a TopNList<K> {
    type Item = &'a TopEntry<K>;
    type IntoIter = std::slice::Iter<'a, TopEntry<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Share of the window as `(percent, clamped)`.
///
/// Over-window counts are detected on raw ticks, before flooring, so 301 of
/// 300 ticks is flagged even though it floors to 100.
pub fn window_share(ticks: u64, window_ticks: u64) -> (u64, bool) {
    if window_ticks == 0 || ticks > window_ticks {
        return (100, true);
    }
    (ticks.saturating_mul(100) / window_ticks, false)
}

/// Ranks `samples` by tick count and keeps the first `k`.
///
/// Keyless or blank-keyed samples are dropped before ranking, so they never
/// take a slot. Ties keep their input order.
pub fn top_n<K: SampleKey>(
    samples: Vec<ActivitySample<K>>,
    k: usize,
    window_ticks: u64,
) -> TopNList<K> {
    let mut ranked: Vec<(K, u64)> = samples
        .into_iter()
        .filter_map(|s| s.key.filter(|key| !key.is_blank()).map(|key| (key, s.ticks)))
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(k);

    let entries = ranked
        .into_iter()
        .map(|(key, ticks)| {
            let (percent, clamped) = window_share(ticks, window_ticks);
            TopEntry {
                key,
                ticks,
                percent,
                clamped,
            }
        })
        .collect();

    TopNList { entries }
}
