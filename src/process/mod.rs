//! Process-related modules for the HTTP handlers and subcommands.
//!
//! This module provides:
//! - `pid`: PID parsing from request bodies
//! - `smaps`: reading `/proc/<pid>/smaps` into memory reports
//! - `terminate`: sending termination signals

pub mod pid;
pub mod smaps;
pub mod terminate;

// Re-export commonly used types
pub use pid::{parse_pid_body, InvalidPid};
pub use smaps::{parse_reader, read_memory_report, read_memory_report_blocking, smaps_path};
pub use terminate::{ProcessTerminator, SignalTerminator, TerminateError};
