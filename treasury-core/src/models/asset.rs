//! Asset identifier: opaque coin/asset type string.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Wraps the raw coin-type string (e.g. `"SUI"`, `"USDC"`) so balances and
/// transactions cannot be indexed by an arbitrary unvalidated string without
/// going through construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AssetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AssetId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn looks_up_by_borrowed_str_without_allocating_an_owned_key() {
        let mut map: BTreeMap<AssetId, u32> = BTreeMap::new();
        map.insert(AssetId::from("SUI"), 1);
        assert_eq!(map.get("SUI"), Some(&1));
    }

    #[test]
    fn displays_as_the_raw_string() {
        assert_eq!(AssetId::from("USDC").to_string(), "USDC");
    }
}
