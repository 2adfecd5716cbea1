//! Integration tests for smaps parsing through the public library API.
//!
//! These tests feed realistic multi-region reports and check the regions,
//! totals and JSON payload that `POST /memory` returns.

use procmem_api::memmap::{parse_memory_map, parse_memory_map_with, AccessMode, MemoryMapParser};
use procmem_api::MemoryReport;

const SMAPS: &str = "\
55d4c2a00000-55d4c2a28000 r--p 00000000 fd:01 2097313                    /usr/bin/bash
Size:                160 kB
KernelPageSize:        4 kB
MMUPageSize:           4 kB
Rss:                 160 kB
Pss:                  53 kB
Shared_Clean:        160 kB
VmFlags: rd mr mw me dw sd
55d4c2a28000-55d4c2b05000 r-xp 00028000 fd:01 2097313                    /usr/bin/bash
Size:                884 kB
KernelPageSize:        4 kB
MMUPageSize:           4 kB
Rss:                 852 kB
Pss:                 284 kB
VmFlags: rd ex mr mw me dw sd
55d4c3b51000-55d4c3cd6000 rw-p 00000000 00:00 0                          [heap]
Size:               1556 kB
KernelPageSize:        4 kB
MMUPageSize:           4 kB
Rss:                1432 kB
Pss:                1432 kB
VmFlags: rd wr mr mw me ac sd
7ffd7a3f0000-7ffd7a411000 rw-p 00000000 00:00 0                          [stack]
Size:                132 kB
Rss:                  36 kB
VmFlags: rd wr mr mw me gd ac
";

#[test]
fn test_realistic_report_in_kib() {
    let report = parse_memory_map_with(SMAPS, 1.0);

    assert_eq!(report.regions.len(), 4);
    assert_eq!(report.total_size_kib, 160.0 + 884.0 + 1556.0 + 132.0);
    assert_eq!(report.total_resident_kib, 160.0 + 852.0 + 1432.0 + 36.0);

    let heap = &report.regions[2];
    assert_eq!(heap.start_address, "55d4c3b51000");
    assert_eq!(heap.end_address, "55d4c3cd6000");
    assert_eq!(heap.access_modes, vec![AccessMode::Read, AccessMode::Write]);
    assert_eq!(heap.backing_device, "00:00");
    assert_eq!(heap.mapped_file, "[heap]");
    assert_eq!(heap.size_kib, 1556.0);
    assert_eq!(heap.resident_kib, 1432.0);
}

#[test]
fn test_default_divisor_scales_values() {
    let report = parse_memory_map(SMAPS);

    assert_eq!(report.regions.len(), 4);
    assert_eq!(report.regions[0].size_kib, 160.0 / 1024.0);
    assert_eq!(report.regions[2].resident_kib, 1432.0 / 1024.0);
}

#[test]
fn test_totals_match_region_sums() {
    for divisor in [1.0, 1024.0, 3.0] {
        let report = parse_memory_map_with(SMAPS, divisor);
        let size: f64 = report.regions.iter().map(|r| r.size_kib).sum();
        let rss: f64 = report.regions.iter().map(|r| r.resident_kib).sum();
        assert!((report.total_size_kib - size).abs() < 1e-9);
        assert!((report.total_resident_kib - rss).abs() < 1e-9);
    }
}

#[test]
fn test_regions_keep_report_order() {
    let report = parse_memory_map_with(SMAPS, 1.0);
    let files: Vec<&str> = report
        .regions
        .iter()
        .map(|r| r.mapped_file.as_str())
        .collect();
    assert_eq!(files, ["/usr/bin/bash", "/usr/bin/bash", "[heap]", "[stack]"]);
}

#[test]
fn test_anonymous_mapping_without_path_is_skipped() {
    // Five fields only: the header is malformed and its attributes are dropped.
    let smaps = "\
7f0000000000-7f0000001000 rw-p 00000000 00:00 0
Size:                  4 kB
Rss:                   4 kB
7f0000001000-7f0000002000 r--p 00000000 00:00 0 [vvar]
Size:                  8 kB
Rss:                   0 kB
";
    let report = parse_memory_map_with(smaps, 1.0);

    assert_eq!(report.regions.len(), 1);
    assert_eq!(report.regions[0].mapped_file, "[vvar]");
    assert_eq!(report.total_size_kib, 8.0);
    assert_eq!(report.total_resident_kib, 0.0);
}

#[test]
fn test_incremental_feed_matches_one_shot() {
    let mut parser = MemoryMapParser::new(1.0);
    for line in SMAPS.lines() {
        parser.feed_line(line);
    }
    assert_eq!(parser.finish(), parse_memory_map_with(SMAPS, 1.0));
}

#[test]
fn test_empty_report_json() {
    let report = parse_memory_map("");
    assert_eq!(report, MemoryReport::default());
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        serde_json::json!({"total_size": 0.0, "total_rss": 0.0, "blocks": []})
    );
}

#[test]
fn test_report_json_payload() {
    let report = parse_memory_map_with(SMAPS, 1.0);
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["total_size"], 2732.0);
    assert_eq!(value["total_rss"], 2480.0);
    let first = &value["blocks"][1];
    assert_eq!(first["initial_address"], "55d4c2a28000");
    assert_eq!(first["final_address"], "55d4c2b05000");
    assert_eq!(first["permissions"], serde_json::json!(["Read", "Execute"]));
    assert_eq!(first["device"], "fd:01");
    assert_eq!(first["file"], "/usr/bin/bash");
    assert_eq!(first["size"], 884.0);
    assert_eq!(first["rss"], 852.0);
}
