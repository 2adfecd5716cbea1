//! Memory-map parsing and aggregation.
//!
//! This module turns the text of a `/proc/<pid>/smaps` report into a
//! [`MemoryReport`]:
//! - `attribute`: numeric decoding of attribute lines (`Size:`, `Rss:`)
//! - `access`: permission token decoding (`r-xp` → Read, Execute)
//! - `parser`: the region state machine and running totals
//! - `report`: the output records
//!
//! Parsing never fails. Malformed input yields fewer regions or zeroed values.

pub mod access;
pub mod attribute;
pub mod parser;
pub mod report;

pub use access::{decode_access_modes, AccessMode};
pub use attribute::decode_attribute;
pub use parser::{parse_memory_map, parse_memory_map_with, MemoryMapParser, DEFAULT_UNIT_DIVISOR};
pub use report::{MemoryRegion, MemoryReport};
