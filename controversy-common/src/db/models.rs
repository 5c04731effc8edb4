//! Database models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Category a data point is charted under
///
/// Stored in the `data_set` column as its lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Data,
    Opinion,
    Advice,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 3] = [Category::Data, Category::Opinion, Category::Advice];

    /// Stored value
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Data => "data",
            Category::Opinion => "opinion",
            Category::Advice => "advice",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Data => "DATA",
            Category::Opinion => "OPINION",
            Category::Advice => "ADVICE",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Data
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "data" => Ok(Category::Data),
            "opinion" => Ok(Category::Opinion),
            "advice" => Ok(Category::Advice),
            other => Err(Error::InvalidInput(format!(
                "'{}' is not one of the available categories",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Controversy {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub slug: String,
}

impl Controversy {
    /// Canonical detail page path
    pub fn absolute_url(&self) -> String {
        format!("/{}/", self.slug)
    }
}

impl fmt::Display for Controversy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoint {
    pub id: i64,
    pub controversy_id: i64,
    pub name: String,
    pub description: String,
    pub url: String,
    pub category: Category,
    pub boolean: bool,
}

/// Fields for creating or updating a controversy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewControversy {
    pub name: String,
    pub description: String,
    pub slug: String,
}

/// Fields for creating or updating a data point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDataPoint {
    pub controversy_id: i64,
    pub name: String,
    pub description: String,
    pub url: String,
    pub category: Category,
    pub boolean: bool,
}

/// Data point joined with its controversy, for admin listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPointListing {
    pub point: DataPoint,
    pub controversy_name: String,
}
