//! Decoding of the permission column of a memory-map header (`r-xp`, `rw-s`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Capability label derived from a permission token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessMode {
    Read,
    Write,
    Execute,
}

impl AccessMode {
    /// Token letter and label, in output order.
    const FLAGS: [(char, AccessMode); 3] = [
        ('r', AccessMode::Read),
        ('w', AccessMode::Write),
        ('x', AccessMode::Execute),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessMode::Read => "Read",
            AccessMode::Write => "Write",
            AccessMode::Execute => "Execute",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decodes a permission token into labels ordered Read, Write, Execute.
///
/// Only membership of `r`, `w` and `x` is tested. The shared/private flag,
/// the `-` padding and any unknown character produce no label.
pub fn decode_access_modes(token: &str) -> Vec<AccessMode> {
    AccessMode::FLAGS
        .iter()
        .filter(|(flag, _)| token.contains(*flag))
        .map(|(_, mode)| *mode)
        .collect()
}
