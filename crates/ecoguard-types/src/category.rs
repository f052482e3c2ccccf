//! Incident categories

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of incident a report describes.
///
/// New kinds are added here as the producer gains analysis endpoints; matching
/// on this enum outside the crate must keep a wildcard arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Category {
    /// Illegal dumping / landfill detection
    Landfill,
    /// Vegetation loss between two observations
    Deforestation,
}

impl Category {
    /// Every known category, in display order
    pub const ALL: [Category; 2] = [Category::Landfill, Category::Deforestation];

    /// Wire label used by the producer
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Landfill => "landfill",
            Category::Deforestation => "deforestation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}
