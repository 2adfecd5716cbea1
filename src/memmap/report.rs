//! Parsed memory-map records and the report handed to the HTTP layer.

use serde::{Deserialize, Serialize};

use super::access::AccessMode;

/// One emitted region of a process memory map.
///
/// Addresses, device and file are kept verbatim from the report header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRegion {
    #[serde(rename = "initial_address")]
    pub start_address: String,
    #[serde(rename = "final_address")]
    pub end_address: String,
    #[serde(rename = "permissions")]
    pub access_modes: Vec<AccessMode>,
    #[serde(rename = "device")]
    pub backing_device: String,
    #[serde(rename = "file")]
    pub mapped_file: String,
    #[serde(rename = "size")]
    pub size_kib: f64,
    #[serde(rename = "rss")]
    pub resident_kib: f64,
}

/// Regions of one report plus totals accumulated while parsing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MemoryReport {
    #[serde(rename = "total_size")]
    pub total_size_kib: f64,
    #[serde(rename = "total_rss")]
    pub total_resident_kib: f64,
    #[serde(rename = "blocks")]
    pub regions: Vec<MemoryRegion>,
}

impl MemoryReport {
    /// Packages parser output without recomputing anything.
    pub fn assemble(
        regions: Vec<MemoryRegion>,
        total_size_kib: f64,
        total_resident_kib: f64,
    ) -> Self {
        Self {
            total_size_kib,
            total_resident_kib,
            regions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> MemoryRegion {
        MemoryRegion {
            start_address: "7f00".into(),
            end_address: "7f10".into(),
            access_modes: vec![AccessMode::Read, AccessMode::Write],
            backing_device: "00:00".into(),
            mapped_file: "[heap]".into(),
            size_kib: 1.5,
            resident_kib: 0.5,
        }
    }

    #[test]
    fn test_assemble_keeps_values() {
        let report = MemoryReport::assemble(vec![region()], 1.5, 0.5);
        assert_eq!(report.regions.len(), 1);
        assert_eq!(report.total_size_kib, 1.5);
        assert_eq!(report.total_resident_kib, 0.5);
    }

    #[test]
    fn test_wire_field_names() {
        let report = MemoryReport::assemble(vec![region()], 1.5, 0.5);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["total_size"], 1.5);
        assert_eq!(value["total_rss"], 0.5);
        let block = &value["blocks"][0];
        assert_eq!(block["initial_address"], "7f00");
        assert_eq!(block["final_address"], "7f10");
        assert_eq!(block["permissions"], serde_json::json!(["Read", "Write"]));
        assert_eq!(block["device"], "00:00");
        assert_eq!(block["file"], "[heap]");
        assert_eq!(block["size"], 1.5);
        assert_eq!(block["rss"], 0.5);
    }

    #[test]
    fn test_empty_report_serializes_empty_blocks() {
        let json = serde_json::to_string(&MemoryReport::default()).unwrap();
        assert_eq!(json, r#"{"total_size":0.0,"total_rss":0.0,"blocks":[]}"#);
    }
}
