//! In-memory IP range table.
//!
//! Source format, one range per line:
//!
//! ```text
//! # start,end,country
//! 203.0.113.0,203.0.113.255,US
//! 2001:db8::,2001:db8::ffff,FR
//! ```
//!
//! IPv4 ranges are stored in the IPv4-mapped IPv6 space so both families
//! share one sorted key space.

use std::net::IpAddr;
use std::path::Path;

use thiserror::Error;

use super::locator::GeoLocator;

#[derive(Debug, Error)]
pub enum GeoTableError {
    #[error("failed to read geo table: {0}")]
    Io(#[from] std::io::Error),
    #[error("geo table line {line}: {reason}")]
    Parse { line: usize, reason: &'static str },
}

#[derive(Debug, Clone)]
struct GeoRange {
    line: usize,
    start: u128,
    end: u128,
    country: String,
}

#[derive(Debug, Clone, Default)]
pub struct RangeTable {
    ranges: Vec<GeoRange>,
}

fn key(addr: IpAddr) -> u128 {
    match addr.to_canonical() {
        IpAddr::V4(v4) => u128::from(v4.to_ipv6_mapped()),
        IpAddr::V6(v6) => u128::from(v6),
    }
}

impl RangeTable {
    /// An empty table; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, GeoTableError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, GeoTableError> {
        let mut ranges = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let err = |reason| GeoTableError::Parse {
                line: idx + 1,
                reason,
            };

            let mut fields = line.split(',').map(str::trim);
            let (Some(start), Some(end), Some(country), None) =
                (fields.next(), fields.next(), fields.next(), fields.next())
            else {
                return Err(err("expected start,end,country"));
            };

            let start: IpAddr = start.parse().map_err(|_| err("invalid start address"))?;
            let end: IpAddr = end.parse().map_err(|_| err("invalid end address"))?;
            if start.is_ipv4() != end.is_ipv4() {
                return Err(err("start and end are different address families"));
            }
            let (start, end) = (key(start), key(end));
            if start > end {
                return Err(err("start is after end"));
            }
            if country.is_empty() {
                return Err(err("empty country"));
            }

            ranges.push(GeoRange {
                line: idx + 1,
                start,
                end,
                country: country.to_ascii_uppercase(),
            });
        }

        ranges.sort_by_key(|r| r.start);

        // lookup only inspects the closest range below an address
        if let Some(pair) = ranges.windows(2).find(|w| w[1].start <= w[0].end) {
            return Err(GeoTableError::Parse {
                line: pair[0].line.max(pair[1].line),
                reason: "range overlaps another range",
            });
        }

        Ok(Self { ranges })
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl GeoLocator for RangeTable {
    fn lookup(&self, addr: IpAddr) -> Option<String> {
        let k = key(addr);
        // last range starting at or before k
        let idx = self.ranges.partition_point(|r| r.start <= k);
        let candidate = self.ranges.get(idx.checked_sub(1)?)?;
        (k <= candidate.end).then(|| candidate.country.clone())
    }
}
