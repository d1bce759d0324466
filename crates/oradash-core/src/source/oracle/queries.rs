//! Fixed SQL statements against the instance's dynamic performance views.

pub(super) const INSTANCE_NAME: &str = "select instance_name from v$instance";

/// Cumulative statistics plus `v$timer.hsecs` reported as the `timer` counter.
pub(super) const COUNTERS: &str = r#"
    select sn.name, ss.value
    from   v$statname sn, v$sysstat ss
    where  sn.statistic# = ss.statistic#
    and    sn.name in ('execute count', 'user calls', 'user commits',
                       'parse count (total)', 'parse count (hard)',
                       'session cursor cache hits', 'session logical reads',
                       'physical read total IO requests', 'physical write total IO requests',
                       'physical read total bytes', 'physical write total bytes',
                       'redo size')
    union all
    select 'timer', hsecs from v$timer
"#;

/// Non-idle sessions other than our own, and sessions blocked by another.
pub(super) const SESSION_COUNTS: &str = r#"
    select
        nvl(sum(case when wait_class != 'Idle'
                      and sid != sys_context('userenv', 'sid') then 1 else 0 end), 0) active,
        nvl(sum(case when blocking_session is not null then 1 else 0 end), 0) blocked
    from v$session
"#;

/// Last 60-second values of the instance-computed metrics shown on screen.
pub(super) const SYSMETRICS: &str = r#"
    select metric_name, value
    from   v$sysmetric
    where  group_id = 3
    and    metric_name in ('Host CPU Utilization (%)', 'Database CPU Time Ratio',
                           'Average Active Sessions')
"#;

pub(super) const TOP_SQL: &str = r#"
    select * from (
        select sql_id, sql_child_number, count(*) seconds
        from   v$active_session_history
        where  sample_time >= sysdate - 5/1440
        and    sql_id is not null
        group  by sql_id, sql_child_number
        order  by 3 desc
    )
    where rownum < 6
"#;

pub(super) const TOP_SESSIONS: &str = r#"
    select * from (
        select session_id, session_serial#, count(*) seconds
        from   v$active_session_history
        where  sample_time >= sysdate - 5/1440
        and    session_id is not null
        group  by session_id, session_serial#
        order  by 3 desc
    )
    where rownum < 6
"#;

pub(super) const TOP_EVENTS: &str = r#"
    select * from (
        select decode(session_state, 'ON CPU', session_state, event) event,
               decode(session_state, 'ON CPU', 'CPU', wait_class) wait_class,
               count(*) seconds
        from   v$active_session_history
        where  sample_time >= sysdate - 5/1440
        and    (session_state = 'ON CPU' or event is not null)
        group  by decode(session_state, 'ON CPU', session_state, event),
                  decode(session_state, 'ON CPU', 'CPU', wait_class)
        order  by 3 desc
    )
    where rownum < 6
"#;

pub(super) const SQL_TEXT: &str = r#"
    select plan_hash_value, sql_text
    from   v$sql
    where  sql_id = :1 and child_number = :2
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AVG_ACTIVE_SESSIONS_METRIC, DB_CPU_RATIO_METRIC, HOST_CPU_METRIC, TIMER_COUNTER,
    };
    use crate::view::METRICS;

    #[test]
    fn test_counter_query_covers_every_metric() {
        for metric in METRICS.iter() {
            assert!(
                COUNTERS.contains(&format!("'{}'", metric.counter)),
                "counter '{}' missing from query",
                metric.counter
            );
        }
        assert!(COUNTERS.contains(&format!("'{}'", TIMER_COUNTER)));
    }

    #[test]
    fn test_sysmetric_query_uses_long_duration_group() {
        assert!(SYSMETRICS.contains("group_id = 3"));
        for name in [HOST_CPU_METRIC, DB_CPU_RATIO_METRIC, AVG_ACTIVE_SESSIONS_METRIC] {
            assert!(SYSMETRICS.contains(&format!("'{name}'")), "{name}");
        }
    }

    #[test]
    fn test_history_queries_bounded_to_five_rows() {
        for q in [TOP_SQL, TOP_SESSIONS, TOP_EVENTS] {
            assert!(q.contains("rownum < 6"));
            assert!(q.contains("sysdate - 5/1440"));
        }
    }

    /// Null groups must be removed inside the ranked subquery, otherwise they
    /// take one of the five rows and a real key is lost.
    #[test]
    fn test_history_queries_filter_null_keys_before_rownum() {
        let cases = [
            (TOP_SQL, "sql_id is not null"),
            (TOP_SESSIONS, "session_id is not null"),
            (TOP_EVENTS, "(session_state = 'ON CPU' or event is not null)"),
        ];
        for (q, filter) in cases {
            let filter_at = q.find(filter).unwrap();
            let group_at = q.find("group  by").unwrap();
            let rownum_at = q.find("rownum < 6").unwrap();
            assert!(filter_at < group_at, "{filter} must precede grouping");
            assert!(group_at < rownum_at);
        }
    }
}
