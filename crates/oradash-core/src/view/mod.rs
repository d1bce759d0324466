//! View model: one refresh worth of data, formatted for the fixed layout.
//!
//! Every string is built to its field's width here, so the renderer only
//! positions text and never needs to know what a value means.

use std::io;

use chrono::NaiveTime;

use crate::fmt::{
    clip, ellipsize, format_mb_rate, format_percent, format_rate, format_share, pad_right,
};
use crate::layout::{
    AVG_ACTIVE_SESSIONS, BANNER, CALLS, COMMITS, CURSOR_HITS, DB_CPU_RATIO, EXECS, HARD_PARSES,
    HOST_CPU, LOGICAL_READS, PHYSICAL_READS, PHYSICAL_WRITES, PLAN_HASHES, READ_MB, REDO_MB,
    SOFT_PARSES, SQL_IDS, SQL_TEXTS, TOP_EVENTS, TOP_SESSIONS, TOP_SQL_IDS, WAIT_CLASSES, WRITE_MB,
};
use crate::models::{EventKey, SessionCounts, SessionKey, SqlKey, SqlText, SysMetrics};
use crate::rates::Rates;
use crate::render::{Renderer, TITLE_FG};
use crate::text::collapse_whitespace;
use crate::topn::{TopEntry, TopNList};

/// How a counter delta is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    PerSecond,
    /// Byte counter shown as MB/s.
    MegabytesPerSecond,
}

/// Binding of a metrics-block field to the counter it displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDef {
    pub field: &'static str,
    pub counter: &'static str,
    pub unit: Unit,
}

const fn per_sec(field: &'static str, counter: &'static str) -> MetricDef {
    MetricDef {
        field,
        counter,
        unit: Unit::PerSecond,
    }
}

const fn mb_per_sec(field: &'static str, counter: &'static str) -> MetricDef {
    MetricDef {
        field,
        counter,
        unit: Unit::MegabytesPerSecond,
    }
}

/// The 3×4 metrics block, in screen order.
pub const METRICS: [MetricDef; 12] = [
    per_sec(EXECS.name, "execute count"),
    per_sec(CALLS.name, "user calls"),
    per_sec(COMMITS.name, "user commits"),
    per_sec(SOFT_PARSES.name, "parse count (total)"),
    per_sec(HARD_PARSES.name, "parse count (hard)"),
    per_sec(CURSOR_HITS.name, "session cursor cache hits"),
    per_sec(LOGICAL_READS.name, "session logical reads"),
    per_sec(PHYSICAL_READS.name, "physical read total IO requests"),
    per_sec(PHYSICAL_WRITES.name, "physical write total IO requests"),
    mb_per_sec(READ_MB.name, "physical read total bytes"),
    mb_per_sec(WRITE_MB.name, "physical write total bytes"),
    mb_per_sec(REDO_MB.name, "redo size"),
];

/// Width of every metric value.
const METRIC_WIDTH: usize = EXECS.width as usize;

/// Characters in front of a top-N label: `"NNN% | "`.
const SHARE_PREFIX: usize = 7;

/// Names of every counter the metrics block needs.
pub fn counter_names() -> Vec<&'static str> {
    METRICS.iter().map(|m| m.counter).collect()
}

/// Everything fetched in one successful cycle, apart from the counters.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub taken_at: NaiveTime,
    /// `None` when the session count query failed.
    pub sessions: Option<SessionCounts>,
    /// `None` when the sysmetric query failed.
    pub sysmetrics: Option<SysMetrics>,
    pub top_sql: TopNList<SqlKey>,
    pub top_sessions: TopNList<SessionKey>,
    pub top_events: TopNList<EventKey>,
    pub sql_texts: Vec<SqlText>,
}

/// Formatted contents of every dynamic field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub banner: String,
    /// (field, value) per entry of [`METRICS`].
    pub metrics: Vec<(&'static str, String)>,
    /// Host CPU, DB CPU ratio and average active sessions.
    pub sysmetrics: Vec<(&'static str, String)>,
    pub top_sql: Vec<String>,
    pub top_sessions: Vec<String>,
    pub top_events: Vec<String>,
    pub wait_classes: Vec<String>,
    pub sql_ids: Vec<String>,
    pub plan_hashes: Vec<String>,
    pub sql_texts: Vec<String>,
}

impl DashboardView {
    pub fn build(instance: &str, frame: &Frame, rates: &Rates) -> Self {
        let metrics = METRICS
            .iter()
            .map(|m| {
                let rate = rates.get(m.counter);
                let value = match m.unit {
                    Unit::PerSecond => format_rate(rate, METRIC_WIDTH),
                    Unit::MegabytesPerSecond => format_mb_rate(rate, METRIC_WIDTH),
                };
                (m.field, value)
            })
            .collect();

        let sql_label = TOP_SQL_IDS.width as usize - SHARE_PREFIX;
        let session_label = TOP_SESSIONS.width as usize - SHARE_PREFIX;
        let event_label = TOP_EVENTS.width as usize - SHARE_PREFIX;
        let class_width = WAIT_CLASSES.width as usize;

        Self {
            banner: banner(instance, frame.taken_at, frame.sessions),
            metrics,
            sysmetrics: sysmetric_values(frame.sysmetrics.unwrap_or_default()),
            top_sql: share_rows(&frame.top_sql, |key| {
                format!("{:>sql_label$}", clip(&key.to_string(), sql_label))
            }),
            top_sessions: share_rows(&frame.top_sessions, |key| {
                format!("{:>session_label$}", clip(&key.to_string(), session_label))
            }),
            top_events: share_rows(&frame.top_events, |key| {
                format!("{:<event_label$}", clip(&key.event, event_label))
            }),
            wait_classes: frame
                .top_events
                .iter()
                .map(|e| format!("{:<class_width$}", clip(&e.key.wait_class, class_width)))
                .collect(),
            sql_ids: sql_columns(&frame.sql_texts, SQL_IDS.width as usize, |s, w| {
                format!("{:<w$}", clip(&s.sql_id, w))
            }),
            plan_hashes: sql_columns(&frame.sql_texts, PLAN_HASHES.width as usize, |s, w| {
                match s.plan_hash {
                    Some(phv) => format!("{:>w$}", phv),
                    None => " ".repeat(w),
                }
            }),
            sql_texts: sql_columns(&frame.sql_texts, SQL_TEXTS.width as usize, |s, w| {
                format!("{:<w$}", ellipsize(&display_text(&s.text), w))
            }),
        }
    }

    /// Writes every dynamic field and ends the frame.
    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) -> io::Result<()> {
        renderer.draw_field_colored(BANNER.name, &self.banner, TITLE_FG)?;
        for (field, value) in self.metrics.iter().chain(&self.sysmetrics) {
            renderer.draw_field(field, value)?;
        }
        renderer.draw_rows(TOP_SQL_IDS.name, &self.top_sql)?;
        renderer.draw_rows(TOP_SESSIONS.name, &self.top_sessions)?;
        renderer.draw_rows(TOP_EVENTS.name, &self.top_events)?;
        renderer.draw_rows(WAIT_CLASSES.name, &self.wait_classes)?;
        renderer.draw_rows(SQL_IDS.name, &self.sql_ids)?;
        renderer.draw_rows(PLAN_HASHES.name, &self.plan_hashes)?;
        renderer.draw_rows(SQL_TEXTS.name, &self.sql_texts)?;
        renderer.end_frame()
    }
}

/// `[ ORCL 12:00:01 │ act/blk 3/0 ]` padded with border characters.
fn banner(instance: &str, at: NaiveTime, sessions: Option<SessionCounts>) -> String {
    let counts = match sessions {
        Some(s) => format!("{}/{}", s.active, s.blocked),
        None => "?/?".to_string(),
    };
    let text = format!("[ {} {} │ act/blk {} ]", instance, at.format("%H:%M:%S"), counts);
    pad_right(&text, BANNER.width as usize, '─')
}

fn sysmetric_values(m: SysMetrics) -> Vec<(&'static str, String)> {
    vec![
        (HOST_CPU.name, format_percent(m.host_cpu_pct, METRIC_WIDTH)),
        (DB_CPU_RATIO.name, format_percent(m.db_cpu_ratio, METRIC_WIDTH)),
        (
            AVG_ACTIVE_SESSIONS.name,
            format_rate(m.avg_active_sessions, METRIC_WIDTH),
        ),
    ]
}

fn share_rows<K>(list: &TopNList<K>, label: impl Fn(&K) -> String) -> Vec<String> {
    list.iter()
        .map(|e: &TopEntry<K>| format!("{} | {}", format_share(e.percent, e.clamped), label(&e.key)))
        .collect()
}

fn sql_columns(
    texts: &[SqlText],
    width: usize,
    cell: impl Fn(&SqlText, usize) -> String,
) -> Vec<String> {
    texts.iter().map(|s| cell(s, width)).collect()
}

/// Single display line: control characters (line breaks, tabs) become
/// spaces, then runs of spaces collapse.
fn display_text(text: &str) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    collapse_whitespace(&flat)
}
