//! Oracle metrics source.
//!
//! Reads from the dynamic performance views:
//! - `v$instance` - instance name
//! - `v$sysstat` / `v$timer` - cumulative statistics and the hundredths clock
//! - `v$session` - active and blocked session counts
//! - `v$sysmetric` - host CPU, DB CPU ratio and average active sessions
//! - `v$active_session_history` - 5-minute top-N by SQL, session and wait event
//! - `v$sql` - text and plan hash per cursor
//!
//! A single connection is kept open. Any failed statement drops it, and the
//! next call reconnects, so a restarted instance is picked up without
//! restarting the dashboard.

mod queries;

use oracle::{Connection, Connector, Privilege};
use tracing::{debug, info, warn};

use super::{ConnectDescriptor, MetricsSource, SourceError};
use crate::models::{
    ActivitySample, CounterSnapshot, EventKey, SessionCounts, SessionKey, SqlKey, SqlText,
    SysMetrics,
};

/// Metrics source backed by an Oracle connection.
pub struct OracleSource {
    descriptor: ConnectDescriptor,
    conn: Option<Connection>,
}

impl OracleSource {
    /// Creates a source without connecting.
    pub fn new(descriptor: ConnectDescriptor) -> Self {
        Self {
            descriptor,
            conn: None,
        }
    }

    /// Creates a source and connects immediately.
    pub fn connect(descriptor: ConnectDescriptor) -> Result<Self, SourceError> {
        let mut source = Self::new(descriptor);
        source.try_connect()?;
        Ok(source)
    }

    /// Attempts to connect, for startup checks before the screen is taken over.
    pub fn try_connect(&mut self) -> Result<(), SourceError> {
        self.ensure_connected().map(|_| ())
    }

    fn connector(&self) -> Connector {
        let d = &self.descriptor;
        let mut connector = Connector::new(
            d.user.as_str(),
            d.password.as_str(),
            d.connect_string.as_str(),
        );
        if d.sysdba {
            connector.privilege(Privilege::Sysdba);
        }
        connector
    }

    fn ensure_connected(&mut self) -> Result<&Connection, SourceError> {
        if self.conn.is_none() {
            match self.connector().connect() {
                Ok(conn) => {
                    info!(db = %self.descriptor, "connected");
                    self.conn = Some(conn);
                }
                Err(e) => return Err(SourceError::Connection(e.to_string())),
            }
        }
        self.conn
            .as_ref()
            .ok_or_else(|| SourceError::Connection("not connected".to_string()))
    }

    /// Runs `f` on the live connection; a failure drops the connection.
    fn run<T>(
        &mut self,
        what: &'static str,
        f: impl FnOnce(&Connection) -> oracle::Result<T>,
    ) -> Result<T, SourceError> {
        let result = {
            let conn = self.ensure_connected()?;
            f(conn)
        };
        result.map_err(|e| {
            let msg = e.to_string();
            warn!(query = what, error = %msg, "query failed, dropping connection");
            self.conn = None;
            SourceError::Query(msg)
        })
    }
}

/// Tick counts come back as NUMBER; anything negative is treated as zero.
fn ticks(seconds: i64) -> u64 {
    u64::try_from(seconds).unwrap_or(0)
}

impl MetricsSource for OracleSource {
    fn instance_name(&mut self) -> Result<String, SourceError> {
        self.run("instance_name", |conn| {
            conn.query_row_as::<String>(queries::INSTANCE_NAME, &[])
        })
    }

    fn counters(&mut self) -> Result<CounterSnapshot, SourceError> {
        let snapshot = self.run("counters", |conn| {
            let mut snapshot = CounterSnapshot::new();
            for row in conn.query_as::<(String, i64)>(queries::COUNTERS, &[])? {
                let (name, value) = row?;
                snapshot.insert(name, value);
            }
            Ok(snapshot)
        })?;
        debug!(counters = snapshot.len(), "collected counters");
        Ok(snapshot)
    }

    fn session_counts(&mut self) -> Result<SessionCounts, SourceError> {
        let (active, blocked) = self.run("session_counts", |conn| {
            conn.query_row_as::<(i64, i64)>(queries::SESSION_COUNTS, &[])
        })?;
        Ok(SessionCounts { active, blocked })
    }

    fn sysmetrics(&mut self) -> Result<SysMetrics, SourceError> {
        self.run("sysmetrics", |conn| {
            let mut metrics = SysMetrics::default();
            for row in conn.query_as::<(String, f64)>(queries::SYSMETRICS, &[])? {
                let (name, value) = row?;
                metrics.set(&name, value);
            }
            Ok(metrics)
        })
    }

    fn top_sql(&mut self) -> Result<Vec<ActivitySample<SqlKey>>, SourceError> {
        self.run("top_sql", |conn| {
            let rows = conn.query_as::<(Option<String>, Option<i64>, i64)>(queries::TOP_SQL, &[])?;
            rows.map(|row| -> oracle::Result<ActivitySample<SqlKey>> {
                let (sql_id, child, seconds) = row?;
                Ok(ActivitySample {
                    key: sql_id.map(|sql_id| SqlKey {
                        sql_id,
                        child: child.unwrap_or(0),
                    }),
                    ticks: ticks(seconds),
                })
            })
            .collect()
        })
    }

    fn top_sessions(&mut self) -> Result<Vec<ActivitySample<SessionKey>>, SourceError> {
        self.run("top_sessions", |conn| {
            let rows =
                conn.query_as::<(Option<i64>, Option<i64>, i64)>(queries::TOP_SESSIONS, &[])?;
            rows.map(|row| -> oracle::Result<ActivitySample<SessionKey>> {
                let (sid, serial, seconds) = row?;
                Ok(ActivitySample {
                    key: sid.map(|sid| SessionKey {
                        sid,
                        serial: serial.unwrap_or(0),
                    }),
                    ticks: ticks(seconds),
                })
            })
            .collect()
        })
    }

    fn top_events(&mut self) -> Result<Vec<ActivitySample<EventKey>>, SourceError> {
        self.run("top_events", |conn| {
            let rows =
                conn.query_as::<(Option<String>, Option<String>, i64)>(queries::TOP_EVENTS, &[])?;
            rows.map(|row| -> oracle::Result<ActivitySample<EventKey>> {
                let (event, wait_class, seconds) = row?;
                Ok(ActivitySample {
                    key: event.map(|event| EventKey {
                        event,
                        wait_class: wait_class.unwrap_or_default(),
                    }),
                    ticks: ticks(seconds),
                })
            })
            .collect()
        })
    }

    fn sql_text(&mut self, key: &SqlKey) -> Result<Option<SqlText>, SourceError> {
        let row = self.run("sql_text", |conn| {
            conn.query_as::<(Option<i64>, Option<String>)>(
                queries::SQL_TEXT,
                &[&key.sql_id, &key.child],
            )?
            .next()
            .transpose()
        })?;

        Ok(row.and_then(|(plan_hash, text)| {
            text.map(|text| SqlText {
                sql_id: key.sql_id.clone(),
                plan_hash,
                text,
            })
        }))
    }
}
