//! Instance-computed 60-second metrics (`v$sysmetric`, long-duration group).

pub const HOST_CPU_METRIC: &str = "Host CPU Utilization (%)";
pub const DB_CPU_RATIO_METRIC: &str = "Database CPU Time Ratio";
pub const AVG_ACTIVE_SESSIONS_METRIC: &str = "Average Active Sessions";

/// Metrics the instance averages itself; no delta is needed.
///
/// A field is `None` when the instance did not report that metric.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SysMetrics {
    pub host_cpu_pct: Option<f64>,
    pub db_cpu_ratio: Option<f64>,
    pub avg_active_sessions: Option<f64>,
}

impl SysMetrics {
    /// Records `value` under its `v$sysmetric` name. Returns `false` for names
    /// not shown on the dashboard.
    pub fn set(&mut self, metric: &str, value: f64) -> bool {
        let slot = match metric {
            HOST_CPU_METRIC => &mut self.host_cpu_pct,
            DB_CPU_RATIO_METRIC => &mut self.db_cpu_ratio,
            AVG_ACTIVE_SESSIONS_METRIC => &mut self.avg_active_sessions,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}
