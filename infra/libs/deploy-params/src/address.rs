/// Operator-supplied IP allow-list ranges, partitioned by address family.
use ipnetwork::{Ipv4Network, Ipv6Network};
use serde::Serialize;
use tracing::warn;

use crate::error::{ParamsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// Wire value expected by the firewall rule-set resource.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V4 => "IPV4",
            Self::V6 => "IPV6",
        }
    }
}

/// An ordered, syntactically validated set of CIDR ranges of one family.
///
/// Emptiness is allowed: an empty set binds to a rule that never matches.
/// Callers that need a non-empty allow-list must check upstream; construction
/// only warns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressRangeSet {
    family: AddressFamily,
    ranges: Vec<String>,
}

impl AddressRangeSet {
    pub fn v4(ranges: Vec<String>) -> Result<Self> {
        for range in &ranges {
            range
                .parse::<Ipv4Network>()
                .map_err(|e| ParamsError::InvalidCidr {
                    family: "IPv4",
                    range: range.clone(),
                    reason: e.to_string(),
                })?;
        }
        Ok(Self::checked(AddressFamily::V4, ranges))
    }

    pub fn v6(ranges: Vec<String>) -> Result<Self> {
        for range in &ranges {
            range
                .parse::<Ipv6Network>()
                .map_err(|e| ParamsError::InvalidCidr {
                    family: "IPv6",
                    range: range.clone(),
                    reason: e.to_string(),
                })?;
        }
        Ok(Self::checked(AddressFamily::V6, ranges))
    }

    fn checked(family: AddressFamily, ranges: Vec<String>) -> Self {
        if ranges.is_empty() {
            warn!(
                family = family.as_str(),
                "allow-list is empty; its firewall rule will never match"
            );
        }
        Self { family, ranges }
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    pub fn ranges(&self) -> &[String] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }
}
