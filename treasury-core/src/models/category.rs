//! Spending category taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of spending categories a proposal can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Operations,
    Marketing,
    Development,
    Research,
    Security,
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Operations => "operations",
            Category::Marketing => "marketing",
            Category::Development => "development",
            Category::Research => "research",
            Category::Security => "security",
            Category::Other => "other",
        };
        f.write_str(s)
    }
}
