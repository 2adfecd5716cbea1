//! Reading `/proc/<pid>/smaps` into memory reports.
//!
//! Reads are byte-based and decoded lossily: mapped file names are not
//! guaranteed to be UTF-8 and must not turn a readable report into an error.

use procmem_api::memmap::{parse_memory_map_with, MemoryMapParser, MemoryReport};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Read buffer for the blocking reader. smaps of large processes run to
/// several hundred KB.
const SMAPS_BUFFER_BYTES: usize = 512 * 1024;

/// Location of the smaps report of `pid` below `proc_root`.
pub fn smaps_path(proc_root: &Path, pid: i32) -> PathBuf {
    proc_root.join(pid.to_string()).join("smaps")
}

/// Reads and parses the smaps report of `pid`.
pub async fn read_memory_report(
    proc_root: &Path,
    pid: i32,
    unit_divisor: f64,
) -> Result<MemoryReport, std::io::Error> {
    let raw = tokio::fs::read(smaps_path(proc_root, pid)).await?;
    Ok(parse_memory_map_with(&String::from_utf8_lossy(&raw), unit_divisor))
}

/// Streams a report file through the parser line by line.
pub fn read_memory_report_blocking(
    path: &Path,
    unit_divisor: f64,
) -> Result<MemoryReport, std::io::Error> {
    let file = fs::File::open(path)?;
    let reader = BufReader::with_capacity(SMAPS_BUFFER_BYTES, file);
    parse_reader(reader, unit_divisor)
}

/// Feeds every line of `reader` to a fresh parser.
pub fn parse_reader<R: BufRead>(
    reader: R,
    unit_divisor: f64,
) -> Result<MemoryReport, std::io::Error> {
    let mut parser = MemoryMapParser::new(unit_divisor);
    for line in reader.split(b'\n') {
        let line = line?;
        let text = String::from_utf8_lossy(&line);
        parser.feed_line(text.trim_end_matches('\r'));
    }
    Ok(parser.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SMAPS: &str = "\
55d0c2a00000-55d0c2a28000 r--p 00000000 fd:01 3938 /usr/bin/bash
Size:                160 kB
Rss:                 160 kB
55d0c2a28000-55d0c2af1000 r-xp 00028000 fd:01 3938 /usr/bin/bash
Size:                804 kB
Rss:                 804 kB
";

    fn write_proc(root: &Path, pid: i32, content: &[u8]) {
        let dir = root.join(pid.to_string());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("smaps"), content).unwrap();
    }

    #[test]
    fn test_smaps_path() {
        assert_eq!(
            smaps_path(Path::new("/proc"), 42),
            PathBuf::from("/proc/42/smaps")
        );
    }

    #[tokio::test]
    async fn test_read_memory_report() {
        let dir = tempfile::tempdir().unwrap();
        write_proc(dir.path(), 7, SMAPS.as_bytes());

        let report = read_memory_report(dir.path(), 7, 1.0).await.unwrap();
        assert_eq!(report.regions.len(), 2);
        assert_eq!(report.total_size_kib, 964.0);
        assert_eq!(report.total_resident_kib, 964.0);
    }

    #[tokio::test]
    async fn test_read_memory_report_missing_pid() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_memory_report(dir.path(), 404, 1.0).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_non_utf8_path_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let mut content = b"00400000-00401000 r--p 00000000 08:01 1 /tmp/\xff\xfe\n".to_vec();
        content.extend_from_slice(b"Size: 4 kB\nRss: 4 kB\n");
        write_proc(dir.path(), 8, &content);

        let report = read_memory_report(dir.path(), 8, 1.0).await.unwrap();
        assert_eq!(report.regions.len(), 1);
        assert!(report.regions[0].mapped_file.starts_with("/tmp/"));
    }

    #[test]
    fn test_blocking_reader_matches_string_parser() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smaps");
        fs::write(&path, SMAPS).unwrap();

        let streamed = read_memory_report_blocking(&path, 1024.0).unwrap();
        assert_eq!(streamed, parse_memory_map_with(SMAPS, 1024.0));
    }

    #[test]
    fn test_parse_reader_handles_crlf() {
        let input = SMAPS.replace('\n', "\r\n");
        let report = parse_reader(Cursor::new(input), 1.0).unwrap();
        assert_eq!(report.regions[1].mapped_file, "/usr/bin/bash");
        assert_eq!(report.regions[1].access_modes.len(), 2);
    }
}
