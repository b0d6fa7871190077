//! Claims extracted from a statement.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Topic category of a claim, used to pick evidence sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Institutional,
    Demographic,
    Economic,
    Scientific,
    Political,
    #[default]
    General,
}

impl Category {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Institutional => "institutional",
            Category::Demographic => "demographic",
            Category::Economic => "economic",
            Category::Scientific => "scientific",
            Category::Political => "political",
            Category::General => "general",
        }
    }

    /// Whether statistical indicators can speak to this category.
    pub fn is_statistical(&self) -> bool {
        matches!(self, Category::Demographic | Category::Economic)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single verifiable proposition drawn from a statement.
///
/// Claims live for one verification call and are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// The extracted claim text
    pub text: String,

    /// Category assigned to the whole statement
    pub category: Category,

    /// Context the statement was found in (page title, surrounding text)
    pub originating_context: String,
}

impl Claim {
    /// Create a new claim.
    pub fn new(
        text: impl Into<String>,
        category: Category,
        originating_context: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            category,
            originating_context: originating_context.into(),
        }
    }
}
