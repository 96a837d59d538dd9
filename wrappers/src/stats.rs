//! Per-wrapper usage counters, kept in process memory
use api_wrappers::prelude::log_debug1;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, OnceLock};

// metric list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    CreateTimes,
    RowsIn,
    RowsOut,
    BytesIn,
    BytesOut,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Metric::CreateTimes => write!(f, "create_times"),
            Metric::RowsIn => write!(f, "rows_in"),
            Metric::RowsOut => write!(f, "rows_out"),
            Metric::BytesIn => write!(f, "bytes_in"),
            Metric::BytesOut => write!(f, "bytes_out"),
        }
    }
}

/// Snapshot of one wrapper's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FdwStats {
    pub create_times: i64,
    pub rows_in: i64,
    pub rows_out: i64,
    pub bytes_in: i64,
    pub bytes_out: i64,
}

impl FdwStats {
    fn counter(&mut self, metric: Metric) -> &mut i64 {
        match metric {
            Metric::CreateTimes => &mut self.create_times,
            Metric::RowsIn => &mut self.rows_in,
            Metric::RowsOut => &mut self.rows_out,
            Metric::BytesIn => &mut self.bytes_in,
            Metric::BytesOut => &mut self.bytes_out,
        }
    }
}

fn stats_table() -> &'static Mutex<HashMap<String, FdwStats>> {
    static STATS: OnceLock<Mutex<HashMap<String, FdwStats>>> = OnceLock::new();
    STATS.get_or_init(|| Mutex::new(HashMap::new()))
}

// increase stats value
pub(crate) fn inc_stats(fdw_name: &str, metric: Metric, inc: i64) {
    // counters stay usable even if a holder panicked
    let mut stats = stats_table()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let counter = stats.entry(fdw_name.to_owned()).or_default().counter(metric);
    *counter = counter.saturating_add(inc);
    log_debug1(&format!("{}: {} += {}", fdw_name, metric, inc));
}

/// Get the counters of a wrapper, all zero if it has not recorded anything
pub fn get_stats(fdw_name: &str) -> FdwStats {
    let stats = stats_table()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    stats.get(fdw_name).copied().unwrap_or_default()
}
