//! Scripted in-memory metrics source for tests.

use std::collections::{HashMap, HashSet, VecDeque};

use super::{MetricsSource, SourceError};
use crate::models::{
    ActivitySample, CounterSnapshot, EventKey, SessionCounts, SessionKey, SqlKey, SqlText,
    SysMetrics,
};

/// Number of calls made to each source operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MockCalls {
    pub instance_name: usize,
    pub counters: usize,
    pub session_counts: usize,
    pub sysmetrics: usize,
    pub top_sql: usize,
    pub top_sessions: usize,
    pub top_events: usize,
    pub sql_text: usize,
}

/// Source that replays scripted answers.
///
/// Counter snapshots are consumed in order; once the script runs out the last
/// successful snapshot repeats. Activity lists are returned as configured on
/// every call unless a one-shot failure is queued.
pub struct MockSource {
    instance: Result<String, SourceError>,
    counters: VecDeque<Result<CounterSnapshot, SourceError>>,
    last_counters: CounterSnapshot,
    sessions: Result<SessionCounts, SourceError>,
    sysmetrics: Result<SysMetrics, SourceError>,
    top_sql: Vec<ActivitySample<SqlKey>>,
    top_sessions: Vec<ActivitySample<SessionKey>>,
    top_events: Vec<ActivitySample<EventKey>>,
    activity_failures: VecDeque<SourceError>,
    sql_texts: HashMap<SqlKey, SqlText>,
    sql_text_errors: HashSet<SqlKey>,
    calls: MockCalls,
}

impl MockSource {
    pub fn new(instance: &str) -> Self {
        Self {
            instance: Ok(instance.to_string()),
            counters: VecDeque::new(),
            last_counters: CounterSnapshot::default(),
            sessions: Ok(SessionCounts::default()),
            sysmetrics: Ok(SysMetrics::default()),
            top_sql: Vec::new(),
            top_sessions: Vec::new(),
            top_events: Vec::new(),
            activity_failures: VecDeque::new(),
            sql_texts: HashMap::new(),
            sql_text_errors: HashSet::new(),
            calls: MockCalls::default(),
        }
    }

    pub fn with_instance_error(mut self, err: SourceError) -> Self {
        self.instance = Err(err);
        self
    }

    pub fn with_counters(mut self, snapshots: impl IntoIterator<Item = CounterSnapshot>) -> Self {
        self.counters.extend(snapshots.into_iter().map(Ok));
        self
    }

    /// Queues a failed counter read for a later call.
    pub fn push_counter_error(&mut self, err: SourceError) {
        self.counters.push_back(Err(err));
    }

    pub fn with_session_counts(mut self, counts: Result<SessionCounts, SourceError>) -> Self {
        self.sessions = counts;
        self
    }

    pub fn with_sysmetrics(mut self, metrics: Result<SysMetrics, SourceError>) -> Self {
        self.sysmetrics = metrics;
        self
    }

    pub fn with_top_sql(mut self, samples: Vec<ActivitySample<SqlKey>>) -> Self {
        self.top_sql = samples;
        self
    }

    pub fn with_top_sessions(mut self, samples: Vec<ActivitySample<SessionKey>>) -> Self {
        self.top_sessions = samples;
        self
    }

    pub fn with_top_events(mut self, samples: Vec<ActivitySample<EventKey>>) -> Self {
        self.top_events = samples;
        self
    }

    pub fn set_top_sql(&mut self, samples: Vec<ActivitySample<SqlKey>>) {
        self.top_sql = samples;
    }

    pub fn set_top_events(&mut self, samples: Vec<ActivitySample<EventKey>>) {
        self.top_events = samples;
    }

    pub fn with_sql_text(mut self, key: SqlKey, plan_hash: Option<i64>, text: &str) -> Self {
        let sql = SqlText {
            sql_id: key.sql_id.clone(),
            plan_hash,
            text: text.to_string(),
        };
        self.sql_texts.insert(key, sql);
        self
    }

    pub fn with_sql_text_error(mut self, key: SqlKey) -> Self {
        self.sql_text_errors.insert(key);
        self
    }

    /// Makes the next activity query (of any dimension) fail once.
    pub fn fail_next_activity(&mut self, err: SourceError) {
        self.activity_failures.push_back(err);
    }

    pub fn calls(&self) -> MockCalls {
        self.calls
    }

    fn activity<T>(&mut self, rows: Vec<T>) -> Result<Vec<T>, SourceError> {
        match self.activity_failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(rows),
        }
    }
}

impl MetricsSource for MockSource {
    fn instance_name(&mut self) -> Result<String, SourceError> {
        self.calls.instance_name += 1;
        self.instance.clone()
    }

    fn counters(&mut self) -> Result<CounterSnapshot, SourceError> {
        self.calls.counters += 1;
        match self.counters.pop_front() {
            Some(Ok(snapshot)) => {
                self.last_counters = snapshot.clone();
                Ok(snapshot)
            }
            Some(Err(err)) => Err(err),
            None => Ok(self.last_counters.clone()),
        }
    }

    fn session_counts(&mut self) -> Result<SessionCounts, SourceError> {
        self.calls.session_counts += 1;
        self.sessions.clone()
    }

    fn sysmetrics(&mut self) -> Result<SysMetrics, SourceError> {
        self.calls.sysmetrics += 1;
        self.sysmetrics.clone()
    }

    fn top_sql(&mut self) -> Result<Vec<ActivitySample<SqlKey>>, SourceError> {
        self.calls.top_sql += 1;
        let rows = self.top_sql.clone();
        self.activity(rows)
    }

    fn top_sessions(&mut self) -> Result<Vec<ActivitySample<SessionKey>>, SourceError> {
        self.calls.top_sessions += 1;
        let rows = self.top_sessions.clone();
        self.activity(rows)
    }

    fn top_events(&mut self) -> Result<Vec<ActivitySample<EventKey>>, SourceError> {
        self.calls.top_events += 1;
        let rows = self.top_events.clone();
        self.activity(rows)
    }

    fn sql_text(&mut self, key: &SqlKey) -> Result<Option<SqlText>, SourceError> {
        self.calls.sql_text += 1;
        if self.sql_text_errors.contains(key) {
            return Err(SourceError::Query(format!("no cursor for {}", key)));
        }
        Ok(self.sql_texts.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TIMER_COUNTER;

    fn timer(hsecs: i64) -> CounterSnapshot {
        [(TIMER_COUNTER, hsecs)].into_iter().collect()
    }

    #[test]
    fn test_counters_replay_then_repeat() {
        let mut source = MockSource::new("ORCL").with_counters([timer(100), timer(200)]);
        source.push_counter_error(SourceError::Query("boom".to_string()));

        assert_eq!(source.counters().unwrap().timer(), Some(100));
        assert_eq!(source.counters().unwrap().timer(), Some(200));
        assert!(source.counters().is_err());
        assert_eq!(source.counters().unwrap().timer(), Some(200));
        assert_eq!(source.calls().counters, 4);
    }

    #[test]
    fn test_activity_failure_is_one_shot() {
        let mut source = MockSource::new("ORCL").with_top_sessions(vec![ActivitySample::new(
            SessionKey { sid: 1, serial: 2 },
            3,
        )]);
        source.fail_next_activity(SourceError::Query("ORA-00942".to_string()));

        assert!(source.top_sessions().is_err());
        assert_eq!(source.top_sessions().unwrap().len(), 1);
        assert!(source.top_sql().unwrap().is_empty());
    }

    #[test]
    fn test_sql_text_lookup() {
        let key = SqlKey {
            sql_id: "abc".to_string(),
            child: 0,
        };
        let missing = SqlKey {
            sql_id: "zzz".to_string(),
            child: 1,
        };
        let mut source = MockSource::new("ORCL")
            .with_sql_text(key.clone(), Some(42), "select 1 from dual")
            .with_sql_text_error(missing.clone());

        let sql = source.sql_text(&key).unwrap().unwrap();
        assert_eq!(sql.plan_hash, Some(42));
        assert!(source.sql_text(&missing).is_err());
        assert_eq!(source.instance_name().unwrap(), "ORCL");
    }
}
