//! Request statistics for the service.
//!
//! This module tracks HTTP traffic, memory report sizes and process control
//! outcomes. `/health` renders them as a plain-text table.

use std::collections::VecDeque;
use std::fmt::Write as FmtWrite;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Running statistics for a single metric.
#[derive(Clone, Copy, Default)]
pub struct RunningStat {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
    last: f64,
}

impl RunningStat {
    pub fn add(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
            self.last = value;
            self.sum = value;
            self.count = 1;
            return;
        }
        self.count += 1;
        self.sum += value;
        self.last = value;
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / (self.count as f64)
        }
    }
}

/// Thread-safe wrapper for running statistics.
#[derive(Default)]
pub struct Stat {
    inner: Mutex<RunningStat>,
}

impl Stat {
    pub fn add_sample(&self, value: f64) {
        if let Ok(mut s) = self.inner.lock() {
            s.add(value);
        }
    }

    /// (last, avg, max, min, count)
    pub fn snapshot(&self) -> (f64, f64, f64, f64, u64) {
        if let Ok(s) = self.inner.lock() {
            (s.last, s.avg(), s.max, s.min, s.count)
        } else {
            (0.0, 0.0, 0.0, 0.0, 0)
        }
    }
}

/// Thread-safe circular buffer for tracking HTTP request timestamps.
pub struct RequestTimestamps {
    inner: Mutex<VecDeque<Instant>>,
}

impl Default for RequestTimestamps {
    fn default() -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(1024)),
        }
    }
}

impl RequestTimestamps {
    pub fn record(&self) {
        if let Ok(mut guard) = self.inner.lock() {
            let now = Instant::now();
            guard.push_back(now);
            // Keep only last 10 minutes of timestamps to avoid unbounded growth
            while guard
                .front()
                .is_some_and(|&t| now.duration_since(t) > Duration::from_secs(600))
            {
                guard.pop_front();
            }
        }
    }

    pub fn count_last_minute(&self) -> u64 {
        if let Ok(guard) = self.inner.lock() {
            let now = Instant::now();
            guard
                .iter()
                .filter(|&&t| now.duration_since(t) <= Duration::from_secs(60))
                .count() as u64
        } else {
            0
        }
    }
}

/// Counters shared by all handlers.
pub struct HealthStats {
    // HTTP server stats
    pub http_request_timestamps: RequestTimestamps,
    pub http_requests_total: AtomicU64,

    // Memory reports
    pub memory_reports_served: AtomicU64,
    pub memory_read_errors: AtomicU64,
    pub regions_per_report: Stat,
    pub parsing_duration_ms: Stat,

    // Snapshots
    pub snapshots_served: AtomicU64,
    pub snapshot_failures: AtomicU64,

    // Process control
    pub kill_requests: AtomicU64,
    pub kill_failures: AtomicU64,

    // Bad request bodies
    pub invalid_pid_requests: AtomicU64,

    pub start_time: Instant,
}

impl Default for HealthStats {
    fn default() -> Self {
        Self {
            http_request_timestamps: RequestTimestamps::default(),
            http_requests_total: AtomicU64::new(0),
            memory_reports_served: AtomicU64::new(0),
            memory_read_errors: AtomicU64::new(0),
            regions_per_report: Stat::default(),
            parsing_duration_ms: Stat::default(),
            snapshots_served: AtomicU64::new(0),
            snapshot_failures: AtomicU64::new(0),
            kill_requests: AtomicU64::new(0),
            kill_failures: AtomicU64::new(0),
            invalid_pid_requests: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }
}

impl HealthStats {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn record_http_request(&self) {
        self.http_request_timestamps.record();
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_memory_report(&self, regions: usize, parsing_duration_ms: f64) {
        self.memory_reports_served.fetch_add(1, Ordering::Relaxed);
        self.regions_per_report.add_sample(regions as f64);
        self.parsing_duration_ms.add_sample(parsing_duration_ms);
    }

    pub fn record_memory_read_error(&self) {
        self.memory_read_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_snapshot(&self, success: bool) {
        if success {
            self.snapshots_served.fetch_add(1, Ordering::Relaxed);
        } else {
            self.snapshot_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_kill(&self, success: bool) {
        self.kill_requests.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.kill_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_invalid_pid(&self) {
        self.invalid_pid_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn render_table(&self) -> String {
        let (rg_cur, rg_avg, rg_max, rg_min, _) = self.regions_per_report.snapshot();
        let (pd_cur, pd_avg, pd_max, pd_min, _) = self.parsing_duration_ms.snapshot();

        let left_col = 26usize;
        let col_w = 12usize;

        let mut out = String::new();

        writeln!(out, "SERVICE STATISTICS").ok();
        writeln!(out, "==================").ok();
        writeln!(out).ok();

        writeln!(out, "HTTP").ok();
        writeln!(out, "----").ok();
        let counters = [
            ("requests_total", self.http_requests_total.load(Ordering::Relaxed)),
            (
                "requests_last_minute",
                self.http_request_timestamps.count_last_minute(),
            ),
            (
                "invalid_pid_requests",
                self.invalid_pid_requests.load(Ordering::Relaxed),
            ),
        ];
        for (name, value) in counters {
            writeln!(out, "{:left$} | {:>col$}", name, value, left = left_col, col = col_w).ok();
        }

        writeln!(out).ok();
        writeln!(out, "MEMORY REPORTS").ok();
        writeln!(out, "--------------").ok();
        for (name, value) in [
            ("reports_served", self.memory_reports_served.load(Ordering::Relaxed)),
            ("read_errors", self.memory_read_errors.load(Ordering::Relaxed)),
        ] {
            writeln!(out, "{:left$} | {:>col$}", name, value, left = left_col, col = col_w).ok();
        }
        writeln!(
            out,
            "{:left$} | {:^col$} | {:^col$} | {:^col$} | {:^col$}",
            "",
            "current",
            "average",
            "max",
            "min",
            left = left_col,
            col = col_w
        )
        .ok();
        writeln!(
            out,
            "{:left$} | {:^col$} | {:^col$} | {:^col$} | {:^col$}",
            "regions_per_report",
            format!("{:.0}", rg_cur),
            format!("{:.1}", rg_avg),
            format!("{:.0}", rg_max),
            format!("{:.0}", rg_min),
            left = left_col,
            col = col_w
        )
        .ok();
        writeln!(
            out,
            "{:left$} | {:^col$} | {:^col$} | {:^col$} | {:^col$}",
            "parsing_duration (ms)",
            format!("{:.3}", pd_cur),
            format!("{:.3}", pd_avg),
            format!("{:.3}", pd_max),
            format!("{:.3}", pd_min),
            left = left_col,
            col = col_w
        )
        .ok();

        writeln!(out).ok();
        writeln!(out, "SNAPSHOTS AND PROCESS CONTROL").ok();
        writeln!(out, "-----------------------------").ok();
        for (name, value) in [
            ("snapshots_served", self.snapshots_served.load(Ordering::Relaxed)),
            ("snapshot_failures", self.snapshot_failures.load(Ordering::Relaxed)),
            ("kill_requests", self.kill_requests.load(Ordering::Relaxed)),
            ("kill_failures", self.kill_failures.load(Ordering::Relaxed)),
        ] {
            writeln!(out, "{:left$} | {:>col$}", name, value, left = left_col, col = col_w).ok();
        }

        out
    }
}
