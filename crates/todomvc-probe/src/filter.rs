//! List filters and their hash routes.

use crate::result::ProbeError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Visibility filter selectable from the footer links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every item
    #[default]
    All,
    /// Items not yet completed
    Active,
    /// Completed items
    Completed,
}

impl Filter {
    /// All filters in footer order
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// `href` of the footer link selecting this filter
    #[must_use]
    pub const fn href(self) -> &'static str {
        match self {
            Self::All => "#/",
            Self::Active => "#/active",
            Self::Completed => "#/completed",
        }
    }

    /// Location hash once the filter is applied
    #[must_use]
    pub const fn hash(self) -> &'static str {
        self.href()
    }

    /// CSS selector for the footer link
    #[must_use]
    pub fn link_selector(self) -> String {
        format!(r#"a[href="{}"]"#, self.href())
    }

    /// Whether an item with the given completion state is listed under this filter
    #[must_use]
    pub const fn matches(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => !completed,
            Self::Completed => completed,
        }
    }

    /// Upper-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "ACTIVE" => Ok(Self::Active),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(ProbeError::Config {
                message: format!("unknown filter '{other}' (expected ALL, ACTIVE or COMPLETED)"),
            }),
        }
    }
}
