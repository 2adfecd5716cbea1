//! Line-oriented parser for `/proc/<pid>/smaps` reports.
//!
//! The parser walks the report once and keeps at most one region open. A
//! region is opened by a header line, receives its size from `Size:` and is
//! emitted when `Rss:` arrives. Anything that does not fit that sequence is
//! dropped without error.

use super::access::{decode_access_modes, AccessMode};
use super::attribute::decode_attribute;
use super::report::{MemoryRegion, MemoryReport};

/// Divisor applied to the kB values of `Size:` and `Rss:`.
///
/// The kernel already reports kB, so 1024 yields MiB-scaled numbers. The
/// value is kept for compatibility with existing consumers of the API; set
/// 1.0 to get plain kB.
pub const DEFAULT_UNIT_DIVISOR: f64 = 1024.0;

/// Minimum whitespace-separated fields of a usable header line.
const HEADER_MIN_FIELDS: usize = 6;

const SIZE_LABEL: &str = "Size:";
const RSS_LABEL: &str = "Rss:";

/// Header fields of a region whose attributes are still being read.
#[derive(Debug)]
struct OpenRegion {
    start_address: String,
    end_address: String,
    access_modes: Vec<AccessMode>,
    backing_device: String,
    mapped_file: String,
    size_kib: Option<f64>,
}

impl OpenRegion {
    /// Builds a region from a header line, or `None` for a malformed one.
    fn from_header(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < HEADER_MIN_FIELDS {
            return None;
        }

        let (start, end) = fields[0].split_once('-')?;

        Some(Self {
            start_address: start.to_string(),
            end_address: end.to_string(),
            access_modes: decode_access_modes(fields[1]),
            backing_device: fields[3].to_string(),
            mapped_file: fields[fields.len() - 1].to_string(),
            size_kib: None,
        })
    }

    fn finish(self, size_kib: f64, resident_kib: f64) -> MemoryRegion {
        MemoryRegion {
            start_address: self.start_address,
            end_address: self.end_address,
            access_modes: self.access_modes,
            backing_device: self.backing_device,
            mapped_file: self.mapped_file,
            size_kib,
            resident_kib,
        }
    }
}

#[derive(Debug, Default)]
enum ParserState {
    #[default]
    Idle,
    RegionOpen(OpenRegion),
}

/// Recognized shape of one report line.
enum Line<'a> {
    Header,
    Size(&'a str),
    Rss(&'a str),
    Other,
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Self {
        if line.starts_with(SIZE_LABEL) {
            Line::Size(line)
        } else if line.starts_with(RSS_LABEL) {
            Line::Rss(line)
        } else if line
            .split_whitespace()
            .next()
            .is_some_and(|first| first.contains('-'))
        {
            // Only the address range of a header carries a hyphen in its first token.
            Line::Header
        } else {
            Line::Other
        }
    }
}

/// Incremental smaps parser. Feed lines in order, then call [`finish`].
///
/// [`finish`]: MemoryMapParser::finish
#[derive(Debug)]
pub struct MemoryMapParser {
    unit_divisor: f64,
    state: ParserState,
    regions: Vec<MemoryRegion>,
    total_size_kib: f64,
    total_resident_kib: f64,
}

impl Default for MemoryMapParser {
    fn default() -> Self {
        Self::new(DEFAULT_UNIT_DIVISOR)
    }
}

impl MemoryMapParser {
    /// Creates a parser that divides every size and resident value by `unit_divisor`.
    pub fn new(unit_divisor: f64) -> Self {
        Self {
            unit_divisor,
            state: ParserState::Idle,
            regions: Vec::new(),
            total_size_kib: 0.0,
            total_resident_kib: 0.0,
        }
    }

    pub fn feed_line(&mut self, line: &str) {
        match Line::classify(line) {
            Line::Header => {
                // A new header always replaces an unfinished region, and a
                // malformed one leaves nothing open so that its attribute
                // lines cannot be credited to the previous region.
                self.state = match OpenRegion::from_header(line) {
                    Some(region) => ParserState::RegionOpen(region),
                    None => ParserState::Idle,
                };
            }
            Line::Size(raw) => {
                let size = self.convert(raw);
                if let ParserState::RegionOpen(region) = &mut self.state {
                    region.size_kib = Some(size);
                }
            }
            Line::Rss(raw) => {
                let resident = self.convert(raw);
                if let ParserState::RegionOpen(region) = std::mem::take(&mut self.state) {
                    if let Some(size) = region.size_kib {
                        self.emit(region.finish(size, resident));
                    }
                }
            }
            Line::Other => {}
        }
    }

    /// Consumes the parser. A region still open at this point is dropped.
    pub fn finish(self) -> MemoryReport {
        MemoryReport::assemble(self.regions, self.total_size_kib, self.total_resident_kib)
    }

    fn convert(&self, line: &str) -> f64 {
        decode_attribute(line) as f64 / self.unit_divisor
    }

    fn emit(&mut self, region: MemoryRegion) {
        self.total_size_kib += region.size_kib;
        self.total_resident_kib += region.resident_kib;
        self.regions.push(region);
    }
}

/// Parses a complete report with [`DEFAULT_UNIT_DIVISOR`].
pub fn parse_memory_map(report: &str) -> MemoryReport {
    parse_memory_map_with(report, DEFAULT_UNIT_DIVISOR)
}

/// Parses a complete report with a caller-chosen unit divisor.
pub fn parse_memory_map_with(report: &str, unit_divisor: f64) -> MemoryReport {
    let mut parser = MemoryMapParser::new(unit_divisor);
    for line in report.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}
