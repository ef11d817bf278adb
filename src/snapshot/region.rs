//! Declared memory regions

use serde::{Deserialize, Serialize};
use std::fmt;

/// A contiguous range of the captured address space.
///
/// `end` is exclusive. The `mapped` flag records whether the source process
/// considered the range live; it has no bearing on how the range is replayed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Region {
    start: u64,
    end: u64,

    #[serde(rename = "r")]
    readable: bool,

    #[serde(rename = "w")]
    writable: bool,

    #[serde(rename = "x")]
    executable: bool,

    #[serde(rename = "m")]
    mapped: bool,

    #[serde(default)]
    name: String,

    /// The capture tool's own description of the region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pretty: Option<String>,
}

impl Region {
    pub fn new(start: u64, end: u64, readable: bool, writable: bool, executable: bool) -> Self {
        Region {
            start,
            end,
            readable,
            writable,
            executable,
            mapped: true,
            name: String::new(),
            pretty: None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_readable(&self) -> bool {
        self.readable
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn is_executable(&self) -> bool {
        self.executable
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    pub fn as_name(&self) -> &str {
        &self.name
    }

    pub fn as_pretty(&self) -> Option<&str> {
        self.pretty.as_deref()
    }

    /// Determine if an address falls within `[start, end)`.
    pub fn contains(&self, address: u64) -> bool {
        self.start <= address && address < self.end
    }

    /// The key this region's backing content is stored under.
    ///
    /// Bounds are rendered in lowercase hex with a `0x` prefix; regions never
    /// overlap, so the pair is unique.
    pub fn backing_key(&self) -> String {
        format!("{:#x}-{:#x}", self.start, self.end)
    }

    /// Permissions in `ls -l` style, e.g. `r-x`.
    pub fn perms(&self) -> String {
        let mut perms = String::with_capacity(3);

        perms.push(if self.readable { 'r' } else { '-' });
        perms.push(if self.writable { 'w' } else { '-' });
        perms.push(if self.executable { 'x' } else { '-' });

        perms
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:#x}-{:#x}[{:#x}] {} {}",
            self.start,
            self.end,
            self.len(),
            self.perms(),
            self.name
        )
    }
}
