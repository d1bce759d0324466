//! Refresh scheduler.
//!
//! One bootstrap render, then a cancellable loop of refresh cycles:
//!
//! ```text
//!  Bootstrapping ──► Idle ──(interval elapsed)──► Refreshing
//!        │            ▲  │                           │
//!        │            └──┼───────────────────────────┘
//!        │               │ (Quit / Terminate / channel closed)
//!        └─(error)──────►▼
//!                     Stopped
//! ```
//!
//! Cancellation is observed only while idle, so an in-flight cycle always
//! completes. The next wait starts after the cycle ends, which keeps cycles
//! from overlapping.

use std::io;
use std::sync::mpsc::{Receiver, RecvTimeoutError};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{CounterSnapshot, SqlKey, SqlText};
use crate::rates::SnapshotPair;
use crate::render::Renderer;
use crate::source::{MetricsSource, SourceError};
use crate::terminal::{TerminalControl, TerminalGuard};
use crate::topn::{TOP_K, TopNList, WINDOW_TICKS, top_n};
use crate::view::{DashboardView, Frame, counter_names};

/// Placeholder for an instance name that could not be read.
const UNKNOWN_INSTANCE: &str = "?";

/// Cancellation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Quit key pressed.
    Quit,
    /// SIGINT / SIGTERM.
    Terminate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Bootstrapping,
    Idle,
    Refreshing,
    Stopped,
}

/// Result of one refresh cycle that did not hit a terminal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Rendered,
    /// A fetch failed; frame and counters were left as they were.
    Skipped,
}

/// Fatal scheduler outcome.
#[derive(Debug)]
pub enum DashboardError {
    /// The first fetch failed; nothing was drawn.
    Bootstrap(SourceError),
    Terminal(io::Error),
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardError::Bootstrap(e) => write!(f, "initial fetch failed: {}", e),
            DashboardError::Terminal(e) => write!(f, "terminal error: {}", e),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::Bootstrap(e) => Some(e),
            DashboardError::Terminal(e) => Some(e),
        }
    }
}

impl From<io::Error> for DashboardError {
    fn from(e: io::Error) -> Self {
        DashboardError::Terminal(e)
    }
}

/// Owns the metrics source, the renderer and the counter state.
pub struct Dashboard<S, R> {
    source: S,
    renderer: R,
    config: Config,
    counters: SnapshotPair,
    counter_names: Vec<&'static str>,
    instance: String,
    phase: Phase,
    cycles: u64,
    skipped: u64,
}

impl<S: MetricsSource, R: Renderer> Dashboard<S, R> {
    pub fn new(source: S, renderer: R, config: Config) -> Self {
        Self {
            source,
            renderer,
            config,
            counters: SnapshotPair::new(),
            counter_names: counter_names(),
            instance: UNKNOWN_INSTANCE.to_string(),
            phase: Phase::Bootstrapping,
            cycles: 0,
            skipped: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn counters(&self) -> &SnapshotPair {
        &self.counters
    }

    /// Completed refresh cycles, bootstrap excluded.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Refresh cycles skipped because a fetch failed.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Fetches everything once and paints the full screen.
    ///
    /// Any counter or activity failure is fatal here, and nothing is drawn.
    pub fn bootstrap(&mut self) -> Result<(), DashboardError> {
        self.phase = Phase::Bootstrapping;

        self.instance = match self.source.instance_name() {
            Ok(name) => name,
            Err(e) => {
                warn!(error = %e, "instance name unavailable");
                UNKNOWN_INSTANCE.to_string()
            }
        };

        let (counters, frame) = self.fetch().map_err(DashboardError::Bootstrap)?;
        self.counters.rotate(counters);

        self.renderer.draw_fixed_grid()?;
        self.render(&frame)?;
        self.phase = Phase::Idle;
        info!(instance = %self.instance, "dashboard started");
        Ok(())
    }

    /// Runs one refresh cycle.
    ///
    /// A failed fetch is logged and skipped. Only renderer errors are fatal.
    pub fn refresh(&mut self) -> Result<CycleOutcome, DashboardError> {
        self.phase = Phase::Refreshing;
        let outcome = match self.fetch() {
            Ok((counters, frame)) => {
                self.counters.rotate(counters);
                self.render(&frame)?;
                self.cycles += 1;
                debug!(cycle = self.cycles, "refreshed");
                CycleOutcome::Rendered
            }
            Err(e) => {
                self.skipped += 1;
                warn!(error = %e, skipped = self.skipped, "refresh failed, keeping last frame");
                CycleOutcome::Skipped
            }
        };
        self.phase = Phase::Idle;
        Ok(outcome)
    }

    /// Bootstraps, then refreshes every interval until a signal arrives or
    /// the channel closes.
    pub fn run(&mut self, signals: &Receiver<Signal>) -> Result<(), DashboardError> {
        let result = self.run_loop(signals);
        self.phase = Phase::Stopped;
        result
    }

    fn run_loop(&mut self, signals: &Receiver<Signal>) -> Result<(), DashboardError> {
        self.bootstrap()?;
        loop {
            match signals.recv_timeout(self.config.refresh_interval) {
                Ok(signal) => {
                    info!(?signal, "stopping");
                    return Ok(());
                }
                Err(RecvTimeoutError::Disconnected) => {
                    info!("signal channel closed, stopping");
                    return Ok(());
                }
                Err(RecvTimeoutError::Timeout) => {
                    self.refresh()?;
                }
            }
        }
    }

    /// Fetches a full cycle. Nothing is committed here.
    fn fetch(&mut self) -> Result<(CounterSnapshot, Frame), SourceError> {
        let counters = self.source.counters()?;
        let sessions = match self.source.session_counts() {
            Ok(counts) => Some(counts),
            Err(e) => {
                warn!(error = %e, "session counts unavailable");
                None
            }
        };
        let sysmetrics = match self.source.sysmetrics() {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                warn!(error = %e, "sysmetrics unavailable");
                None
            }
        };
        let top_sql = top_n(self.source.top_sql()?, TOP_K, WINDOW_TICKS);
        let top_sessions = top_n(self.source.top_sessions()?, TOP_K, WINDOW_TICKS);
        let top_events = top_n(self.source.top_events()?, TOP_K, WINDOW_TICKS);
        let sql_texts = self.sql_texts(&top_sql);

        let frame = Frame {
            taken_at: Local::now().time(),
            sessions,
            sysmetrics,
            top_sql,
            top_sessions,
            top_events,
            sql_texts,
        };
        Ok((counters, frame))
    }

    fn sql_texts(&mut self, top_sql: &TopNList<SqlKey>) -> Vec<SqlText> {
        top_sql
            .iter()
            .filter_map(|entry| match self.source.sql_text(&entry.key) {
                Ok(text) => text,
                Err(e) => {
                    warn!(sql_id = %entry.key.sql_id, error = %e, "sql text lookup failed");
                    None
                }
            })
            .collect()
    }

    fn render(&mut self, frame: &Frame) -> io::Result<()> {
        let rates = self.counters.rates(&self.counter_names);
        DashboardView::build(&self.instance, frame, &rates).draw(&mut self.renderer)
    }
}

/// Runs `dashboard` with `terminal` in dashboard mode.
///
/// The terminal is restored exactly once, whichever way the run ends.
pub fn run_dashboard<S, R, T>(
    dashboard: &mut Dashboard<S, R>,
    terminal: T,
    signals: &Receiver<Signal>,
) -> Result<(), DashboardError>
where
    S: MetricsSource,
    R: Renderer,
    T: TerminalControl,
{
    let mut guard = TerminalGuard::enter(terminal)?;
    let result = dashboard.run(signals);
    let restored = guard.restore();
    result?;
    restored.map_err(DashboardError::Terminal)
}

#[cfg(all(test, feature = "tui"))]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc::{self, Sender};
    use std::time::Duration;

    use crate::layout::{FieldLayout, TOP_EVENTS, TOP_SQL_IDS, WAIT_CLASSES};
    use crate::models::{
        ActivitySample, EventKey, SessionCounts, SessionKey, SysMetrics, TIMER_COUNTER,
    };
    use crate::source::MockSource;
    use crate::tui::GridRenderer;

    #[derive(Clone, Default)]
    struct CountingTerminal {
        enters: Arc<AtomicUsize>,
        restores: Arc<AtomicUsize>,
    }

    impl TerminalControl for CountingTerminal {
        fn enter(&mut self) -> io::Result<()> {
            self.enters.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn restore(&mut self) -> io::Result<()> {
            self.restores.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Sends `Quit` while serving the n-th counters call.
    struct QuitOnCounters {
        inner: MockSource,
        remaining: usize,
        tx: Sender<Signal>,
    }

    impl MetricsSource for QuitOnCounters {
        fn instance_name(&mut self) -> Result<String, SourceError> {
            self.inner.instance_name()
        }

        fn counters(&mut self) -> Result<CounterSnapshot, SourceError> {
            self.remaining -= 1;
            if self.remaining == 0 {
                self.tx.send(Signal::Quit).unwrap();
            }
            self.inner.counters()
        }

        fn session_counts(&mut self) -> Result<SessionCounts, SourceError> {
            self.inner.session_counts()
        }

        fn sysmetrics(&mut self) -> Result<SysMetrics, SourceError> {
            self.inner.sysmetrics()
        }

        fn top_sql(&mut self) -> Result<Vec<ActivitySample<SqlKey>>, SourceError> {
            self.inner.top_sql()
        }

        fn top_sessions(&mut self) -> Result<Vec<ActivitySample<SessionKey>>, SourceError> {
            self.inner.top_sessions()
        }

        fn top_events(&mut self) -> Result<Vec<ActivitySample<EventKey>>, SourceError> {
            self.inner.top_events()
        }

        fn sql_text(&mut self, key: &SqlKey) -> Result<Option<SqlText>, SourceError> {
            self.inner.sql_text(key)
        }
    }

    fn snapshot(hsecs: i64, execs: i64) -> CounterSnapshot {
        [(TIMER_COUNTER, hsecs), ("execute count", execs)]
            .into_iter()
            .collect()
    }

    fn sql(id: &str, ticks: u64) -> ActivitySample<SqlKey> {
        ActivitySample::new(
            SqlKey {
                sql_id: id.to_string(),
                child: 0,
            },
            ticks,
        )
    }

    fn source() -> MockSource {
        MockSource::new("ORCL")
            .with_counters([snapshot(1000, 100), snapshot(1500, 150)])
            .with_top_sql(vec![sql("aaaaaaaaaaaaa", 30), sql("bbbbbbbbbbbbb", 15)])
            .with_sql_text(
                SqlKey {
                    sql_id: "aaaaaaaaaaaaa".to_string(),
                    child: 0,
                },
                Some(42),
                "select 1 from dual",
            )
    }

    fn dashboard(source: MockSource) -> Dashboard<MockSource, GridRenderer> {
        Dashboard::new(
            source,
            GridRenderer::new(FieldLayout::standard()),
            Config::default().with_refresh_interval(Duration::from_millis(1)),
        )
    }

    #[test]
    fn test_bootstrap_then_refresh_renders_rate() {
        let mut dash = dashboard(source());
        dash.bootstrap().unwrap();
        assert_eq!(dash.phase(), Phase::Idle);
        assert_eq!(dash.renderer().field_line("execs", 0).unwrap().trim(), "-");
        assert!(dash.renderer().row_text(0).contains("[ ORCL "));
        assert_eq!(dash.renderer().field_line("sqlid", 0).unwrap().trim(), "aaaaaaaaaaaaa");
        assert_eq!(dash.renderer().field_line("phv", 0).unwrap().trim(), "42");

        assert_eq!(dash.refresh().unwrap(), CycleOutcome::Rendered);
        assert_eq!(dash.renderer().field_line("execs", 0).unwrap(), "      10.0");
        assert_eq!(dash.cycles(), 1);
        // the static grid is painted once
        assert_eq!(dash.renderer().clears(), 1);
    }

    #[test]
    fn test_shorter_result_blanks_stale_rows() {
        let mut dash = dashboard(source());
        dash.bootstrap().unwrap();
        assert!(dash.renderer().field_line(TOP_SQL_IDS.name, 1).unwrap().contains("bbbbbbbbbbbbb"));

        dash.source.set_top_sql(vec![sql("aaaaaaaaaaaaa", 30)]);
        dash.refresh().unwrap();
        let blank = " ".repeat(TOP_SQL_IDS.width as usize);
        assert_eq!(dash.renderer().field_line(TOP_SQL_IDS.name, 1).unwrap(), blank);
    }

    fn event(name: &str, class: &str, ticks: u64) -> ActivitySample<EventKey> {
        ActivitySample::new(
            EventKey {
                event: name.to_string(),
                wait_class: class.to_string(),
            },
            ticks,
        )
    }

    #[test]
    fn test_event_panels_render_and_blank() {
        let mut dash = dashboard(source().with_top_events(vec![
            event("ON CPU", "CPU", 90),
            event("db file sequential read", "User I/O", 30),
            event("log file sync", "Commit", 15),
        ]));
        dash.bootstrap().unwrap();
        let r = dash.renderer();
        assert_eq!(r.field_line(TOP_EVENTS.name, 0).unwrap().trim_end(), " 30% | ON CPU");
        assert_eq!(
            r.field_line(TOP_EVENTS.name, 1).unwrap().trim_end(),
            " 10% | db file sequential read"
        );
        assert_eq!(r.field_line(WAIT_CLASSES.name, 0).unwrap().trim_end(), "CPU");
        assert_eq!(r.field_line(WAIT_CLASSES.name, 2).unwrap().trim_end(), "Commit");

        dash.source.set_top_events(vec![event("ON CPU", "CPU", 60)]);
        assert_eq!(dash.refresh().unwrap(), CycleOutcome::Rendered);
        let r = dash.renderer();
        assert_eq!(r.field_line(TOP_EVENTS.name, 0).unwrap().trim_end(), " 20% | ON CPU");
        for line in 1..3 {
            assert_eq!(
                r.field_line(TOP_EVENTS.name, line).unwrap(),
                " ".repeat(TOP_EVENTS.width as usize)
            );
            assert_eq!(
                r.field_line(WAIT_CLASSES.name, line).unwrap(),
                " ".repeat(WAIT_CLASSES.width as usize)
            );
        }
    }

    #[test]
    fn test_sysmetrics_render_and_failure_is_not_fatal() {
        let metrics = SysMetrics {
            host_cpu_pct: Some(45.2),
            db_cpu_ratio: Some(80.0),
            avg_active_sessions: Some(2.5),
        };
        let mut dash = dashboard(source().with_sysmetrics(Ok(metrics)));
        dash.bootstrap().unwrap();
        assert_eq!(dash.renderer().field_line("cpuutil", 0).unwrap().trim(), "45%");
        assert_eq!(dash.renderer().field_line("cpuratio", 0).unwrap().trim(), "80%");
        assert_eq!(dash.renderer().field_line("aas", 0).unwrap().trim(), "2.5");

        let mut dash = dashboard(
            source().with_sysmetrics(Err(SourceError::Query("ORA-00942".to_string()))),
        );
        dash.bootstrap().unwrap();
        assert_eq!(dash.phase(), Phase::Idle);
        for field in ["cpuutil", "cpuratio", "aas"] {
            assert_eq!(dash.renderer().field_line(field, 0).unwrap().trim(), "-");
        }
        assert_eq!(dash.refresh().unwrap(), CycleOutcome::Rendered);
        assert_eq!(dash.source().calls().sysmetrics, 2);
    }

    #[test]
    fn test_failed_refresh_keeps_frame_and_counters() {
        let mut dash = dashboard(MockSource::new("ORCL").with_counters([snapshot(1000, 100)]));
        dash.bootstrap().unwrap();
        let before = dash.renderer().dump();
        let counters = dash.counters().current().clone();

        dash.source.push_counter_error(SourceError::Query("ORA-03113".to_string()));
        assert_eq!(dash.refresh().unwrap(), CycleOutcome::Skipped);
        assert_eq!(dash.renderer().dump(), before);
        assert_eq!(dash.counters().current(), &counters);
        assert!(dash.counters().previous().is_empty());
        assert_eq!(dash.skipped(), 1);
        assert_eq!(dash.phase(), Phase::Idle);

        dash.source.fail_next_activity(SourceError::Query("ORA-00942".to_string()));
        assert_eq!(dash.refresh().unwrap(), CycleOutcome::Skipped);
        assert!(dash.counters().previous().is_empty());

        assert_eq!(dash.refresh().unwrap(), CycleOutcome::Rendered);
        assert_eq!(dash.counters().previous(), &counters);
    }

    #[test]
    fn test_sql_text_failure_is_not_fatal() {
        let failing = SqlKey {
            sql_id: "bbbbbbbbbbbbb".to_string(),
            child: 0,
        };
        let mut dash = dashboard(source().with_sql_text_error(failing));
        dash.bootstrap().unwrap();
        assert_eq!(dash.renderer().field_line("sqlid", 0).unwrap().trim(), "aaaaaaaaaaaaa");
        assert_eq!(dash.renderer().field_line("sqlid", 1).unwrap().trim(), "");
    }

    #[test]
    fn test_instance_and_session_failures_render_placeholders() {
        let mut dash = dashboard(
            source()
                .with_instance_error(SourceError::Query("ORA-00942".to_string()))
                .with_session_counts(Err(SourceError::Query("ORA-00942".to_string()))),
        );
        dash.bootstrap().unwrap();
        assert!(dash.renderer().row_text(0).contains("[ ? "));
        assert!(dash.renderer().row_text(0).contains("act/blk ?/? ]"));
    }

    #[test]
    fn test_bootstrap_failure_is_fatal_and_draws_nothing() {
        let mut mock = MockSource::new("ORCL");
        mock.push_counter_error(SourceError::Connection("ORA-12541".to_string()));
        let mut dash = dashboard(mock);
        let term = CountingTerminal::default();
        let (_tx, rx) = mpsc::channel();

        let err = run_dashboard(&mut dash, term.clone(), &rx).unwrap_err();
        assert!(matches!(err, DashboardError::Bootstrap(SourceError::Connection(_))));
        assert_eq!(dash.renderer().clears(), 0);
        assert_eq!(dash.renderer().frames(), 0);
        assert_eq!(dash.phase(), Phase::Stopped);
        assert_eq!(term.restores.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_bootstrap_activity_failure_is_fatal() {
        let mut mock = source();
        mock.fail_next_activity(SourceError::Query("ORA-00942".to_string()));
        let mut dash = dashboard(mock);
        assert!(matches!(dash.bootstrap(), Err(DashboardError::Bootstrap(_))));
        assert_eq!(dash.renderer().frames(), 0);
    }

    #[test]
    fn test_quit_while_idle_stops_without_refresh() {
        let mut dash = Dashboard::new(
            source(),
            GridRenderer::new(FieldLayout::standard()),
            Config::default().with_refresh_interval(Duration::from_secs(60)),
        );
        let term = CountingTerminal::default();
        let (tx, rx) = mpsc::channel();
        tx.send(Signal::Quit).unwrap();

        run_dashboard(&mut dash, term.clone(), &rx).unwrap();
        assert_eq!(dash.phase(), Phase::Stopped);
        assert_eq!(dash.source().calls().counters, 1);
        assert_eq!(dash.cycles(), 0);
        assert_eq!(term.enters.load(Ordering::SeqCst), 1);
        assert_eq!(term.restores.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_signal_during_refresh_lets_cycle_finish() {
        let (tx, rx) = mpsc::channel();
        let source = QuitOnCounters {
            inner: source(),
            remaining: 3,
            tx,
        };
        let mut dash = Dashboard::new(
            source,
            GridRenderer::new(FieldLayout::standard()),
            Config::default().with_refresh_interval(Duration::from_millis(1)),
        );
        let term = CountingTerminal::default();

        run_dashboard(&mut dash, term.clone(), &rx).unwrap();
        // bootstrap plus two refreshes; the second completed after the signal
        assert_eq!(dash.source().inner.calls().counters, 3);
        assert_eq!(dash.source().inner.calls().top_events, 3);
        assert_eq!(dash.cycles(), 2);
        assert_eq!(term.restores.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_closed_channel_stops() {
        let mut dash = dashboard(source());
        let (tx, rx) = mpsc::channel::<Signal>();
        drop(tx);
        run_dashboard(&mut dash, CountingTerminal::default(), &rx).unwrap();
        assert_eq!(dash.phase(), Phase::Stopped);
        assert_eq!(dash.cycles(), 0);
    }
}
