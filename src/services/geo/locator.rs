use std::fmt;
use std::net::IpAddr;

/// Maps a public network address to a region code (ISO country code).
///
/// Lookups are local and synchronous; `None` means "no data".
pub trait GeoLocator: Send + Sync {
    fn lookup(&self, addr: IpAddr) -> Option<String>;
}

/// Coarse region of a request, or `Unknown` when it cannot be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationTag {
    Region(String),
    Unknown,
}

impl LocationTag {
    pub const UNKNOWN: &'static str = "Unknown";

    pub fn as_str(&self) -> &str {
        match self {
            Self::Region(code) => code,
            Self::Unknown => Self::UNKNOWN,
        }
    }
}

impl fmt::Display for LocationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
