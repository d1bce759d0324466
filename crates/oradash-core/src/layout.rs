//! Fixed screen layout.
//!
//! The static grid ([`TEMPLATE`]) is painted once; every dynamic value lives in
//! a named rectangle ([`FieldSpec`]) inside one of its blank areas. Coordinates
//! are 0-based character cells, column first.
//!
//! ```text
//!  0 ┌ INSTANCE METRICS ─[ banner ]──────────────────────────┐
//!  1 │ Execs/s  │ Parses/s  │ LIOs/s  │ Read MB/s           │  3 × 4 rates
//!  4 │ Host CPU │ DB CPU    │ AAS     │                     │  sysmetrics
//!  5 └──────────────────────────────────────────────────────┘
//!  6 ┌ TOP SQL_ID ┬ TOP SESSIONS ┬ TOP WAITS ┬ WAIT CLASS ──┐
//!  7 │            │              │           │              │  5 rows each
//! 12 └────────────┴──────────────┴───────────┴──────────────┘
//! 13 ┌ SQL_ID ┬ PLAN_HV ┬ SQL_TEXT ──────────────────────────┐
//! 14 │        │         │                                   │  5 rows each
//! 19 └────────┴─────────┴───────────────────────────────────┘
//! ```

use std::collections::HashMap;

pub const GRID_WIDTH: u16 = 110;
pub const GRID_HEIGHT: u16 = 20;

/// Row the cursor is parked on after each frame, below the grid.
pub const CURSOR_PARK_ROW: u16 = 21;

pub const TEMPLATE: [&str; GRID_HEIGHT as usize] = [
    "┌ INSTANCE METRICS ──────────────────────────────────────────────────────────────────────────────────────────┐",
    "│ Execs/s:                 │ Parses/s:                │ LIOs/s:                  │ Read MB/s:                │",
    "│ Calls/s:                 │ Hard prs/s:              │ PhyRD/s:                 │ Write MB/s:               │",
    "│ Commits/s:               │ Cur hits/s:              │ PhyWR/s:                 │ Redo MB/s:                │",
    "│ Host CPU %:              │ DB CPU %:                │ Avg act sess:            │                           │",
    "└────────────────────────────────────────────────────────────────────────────────────────────────────────────┘",
    "┌ TOP SQL_ID (child#) ───────┬ TOP SESSIONS ──────┬ TOP WAITS ───────────────────────────────┬ WAIT CLASS ───┐",
    "│                            │                    │                                          │               │",
    "│                            │                    │                                          │               │",
    "│                            │                    │                                          │               │",
    "│                            │                    │                                          │               │",
    "│                            │                    │                                          │               │",
    "└────────────────────────────┴────────────────────┴──────────────────────────────────────────┴───────────────┘",
    "┌ SQL_ID ───────┬ PLAN_HV ────┬ SQL_TEXT ────────────────────────────────────────────────────────────────────┐",
    "│               │             │                                                                              │",
    "│               │             │                                                                              │",
    "│               │             │                                                                              │",
    "│               │             │                                                                              │",
    "│               │             │                                                                              │",
    "└───────────────┴─────────────┴──────────────────────────────────────────────────────────────────────────────┘",
];

/// Panel title painted over the template in the title colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Title {
    pub col: u16,
    pub row: u16,
    pub text: &'static str,
}

pub const TITLES: [Title; 8] = [
    Title { col: 2, row: 0, text: "INSTANCE METRICS" },
    Title { col: 2, row: 6, text: "TOP SQL_ID (child#)" },
    Title { col: 31, row: 6, text: "TOP SESSIONS" },
    Title { col: 52, row: 6, text: "TOP WAITS" },
    Title { col: 95, row: 6, text: "WAIT CLASS" },
    Title { col: 2, row: 13, text: "SQL_ID" },
    Title { col: 18, row: 13, text: "PLAN_HV" },
    Title { col: 32, row: 13, text: "SQL_TEXT" },
];

/// Named screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    pub name: &'static str,
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

impl FieldSpec {
    pub const fn new(name: &'static str, col: u16, row: u16, width: u16, height: u16) -> Self {
        Self {
            name,
            col,
            row,
            width,
            height,
        }
    }

    pub fn overlaps(&self, other: &FieldSpec) -> bool {
        self.col < other.col + other.width
            && other.col < self.col + self.width
            && self.row < other.row + other.height
            && other.row < self.row + self.height
    }
}

pub const BANNER: FieldSpec = FieldSpec::new("banner", 20, 0, 60, 1);

pub const EXECS: FieldSpec = FieldSpec::new("execs", 16, 1, 10, 1);
pub const CALLS: FieldSpec = FieldSpec::new("calls", 16, 2, 10, 1);
pub const COMMITS: FieldSpec = FieldSpec::new("commits", 16, 3, 10, 1);
pub const SOFT_PARSES: FieldSpec = FieldSpec::new("sparse", 43, 1, 10, 1);
pub const HARD_PARSES: FieldSpec = FieldSpec::new("hparse", 43, 2, 10, 1);
pub const CURSOR_HITS: FieldSpec = FieldSpec::new("cchits", 43, 3, 10, 1);
pub const LOGICAL_READS: FieldSpec = FieldSpec::new("lios", 70, 1, 10, 1);
pub const PHYSICAL_READS: FieldSpec = FieldSpec::new("phyrd", 70, 2, 10, 1);
pub const PHYSICAL_WRITES: FieldSpec = FieldSpec::new("phywr", 70, 3, 10, 1);
pub const READ_MB: FieldSpec = FieldSpec::new("readmb", 97, 1, 10, 1);
pub const WRITE_MB: FieldSpec = FieldSpec::new("writemb", 97, 2, 10, 1);
pub const REDO_MB: FieldSpec = FieldSpec::new("redomb", 97, 3, 10, 1);

pub const HOST_CPU: FieldSpec = FieldSpec::new("cpuutil", 16, 4, 10, 1);
pub const DB_CPU_RATIO: FieldSpec = FieldSpec::new("cpuratio", 43, 4, 10, 1);
pub const AVG_ACTIVE_SESSIONS: FieldSpec = FieldSpec::new("aas", 70, 4, 10, 1);

pub const TOP_SQL_IDS: FieldSpec = FieldSpec::new("topsqlids", 2, 7, 26, 5);
pub const TOP_SESSIONS: FieldSpec = FieldSpec::new("topsids", 31, 7, 18, 5);
pub const TOP_EVENTS: FieldSpec = FieldSpec::new("events", 52, 7, 40, 5);
pub const WAIT_CLASSES: FieldSpec = FieldSpec::new("waitclasses", 95, 7, 13, 5);

pub const SQL_IDS: FieldSpec = FieldSpec::new("sqlid", 2, 14, 13, 5);
pub const PLAN_HASHES: FieldSpec = FieldSpec::new("phv", 18, 14, 11, 5);
pub const SQL_TEXTS: FieldSpec = FieldSpec::new("sqltext", 32, 14, 76, 5);

/// Every field of the standard screen.
pub const STANDARD_FIELDS: [FieldSpec; 23] = [
    BANNER,
    EXECS,
    CALLS,
    COMMITS,
    SOFT_PARSES,
    HARD_PARSES,
    CURSOR_HITS,
    LOGICAL_READS,
    PHYSICAL_READS,
    PHYSICAL_WRITES,
    READ_MB,
    WRITE_MB,
    REDO_MB,
    HOST_CPU,
    DB_CPU_RATIO,
    AVG_ACTIVE_SESSIONS,
    TOP_SQL_IDS,
    TOP_SESSIONS,
    TOP_EVENTS,
    WAIT_CLASSES,
    SQL_IDS,
    PLAN_HASHES,
    SQL_TEXTS,
];

/// Name → rectangle registry, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    fields: HashMap<&'static str, FieldSpec>,
}

impl FieldLayout {
    /// Layout of the full dashboard screen.
    pub fn standard() -> Self {
        Self::from_fields(&STANDARD_FIELDS)
    }

    /// Builds a registry from `fields`; a later duplicate name wins.
    pub fn from_fields(fields: &[FieldSpec]) -> Self {
        Self {
            fields: fields.iter().map(|f| (f.name, *f)).collect(),
        }
    }

    /// Looks up a field. Absent names are not an error; callers skip them.
    pub fn lookup(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self::standard()
    }
}
