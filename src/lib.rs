//! procmem-api library
//!
//! Parsing and payload types behind the `procmem-api` HTTP service. The
//! binary adds routing, configuration and process control on top of these.
//!
//! # Modules
//!
//! - **memmap**: `/proc/<pid>/smaps` parsing into regions and totals
//! - **snapshot**: RAM/process snapshot models and the `/tasks` payload
//! - **identity**: uid → user name resolution
//!
//! # Usage
//!
//! ```rust
//! use procmem_api::memmap::{parse_memory_map_with, AccessMode};
//!
//! let smaps = "\
//! 00400000-00452000 r-xp 00000000 08:01 1234567 /bin/example
//! Size:               72 kB
//! Rss:                40 kB
//! ";
//!
//! let report = parse_memory_map_with(smaps, 1.0);
//! assert_eq!(report.regions.len(), 1);
//! assert_eq!(report.regions[0].access_modes, vec![AccessMode::Read, AccessMode::Execute]);
//! assert_eq!(report.total_resident_kib, 40.0);
//! ```

pub mod identity;
pub mod memmap;
pub mod snapshot;

// Re-export main types for convenience
pub use identity::{IdentityError, IdentityResolver, StaticIdentityResolver, SystemIdentityResolver};
pub use memmap::{parse_memory_map, parse_memory_map_with, MemoryRegion, MemoryReport};
pub use snapshot::{build_overview, load_overview, SnapshotError, TasksOverview};
