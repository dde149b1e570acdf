//! Common types used across the workspace

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Vendor selection for order planning: exact vendor name or everything
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VendorFilter {
    #[default]
    All,
    Vendor(String),
}

impl VendorFilter {
    /// Parse a query value; missing, blank and "all" select every vendor
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => VendorFilter::All,
            Some(v) if v.eq_ignore_ascii_case("all") => VendorFilter::All,
            Some(v) => VendorFilter::Vendor(v.to_string()),
        }
    }

    pub fn matches(&self, vendor: Option<&str>) -> bool {
        match self {
            VendorFilter::All => true,
            VendorFilter::Vendor(name) => vendor == Some(name.as_str()),
        }
    }
}

impl fmt::Display for VendorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VendorFilter::All => f.write_str("all"),
            VendorFilter::Vendor(name) => f.write_str(name),
        }
    }
}

impl Serialize for VendorFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VendorFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(VendorFilter::parse(raw.as_deref()))
    }
}
