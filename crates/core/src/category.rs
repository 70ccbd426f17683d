use serde::{Deserialize, Serialize};
use std::fmt;

/// Expense categories an extracted receipt can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Groceries,
    FoodAndDining,
    Transportation,
    Shopping,
    Healthcare,
    Entertainment,
    Utilities,
    Uncategorized,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Groceries => write!(f, "Groceries"),
            Category::FoodAndDining => write!(f, "Food & Dining"),
            Category::Transportation => write!(f, "Transportation"),
            Category::Shopping => write!(f, "Shopping"),
            Category::Healthcare => write!(f, "Healthcare"),
            Category::Entertainment => write!(f, "Entertainment"),
            Category::Utilities => write!(f, "Utilities"),
            Category::Uncategorized => write!(f, "Uncategorized"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Groceries" => Ok(Category::Groceries),
            "Food & Dining" => Ok(Category::FoodAndDining),
            "Transportation" => Ok(Category::Transportation),
            "Shopping" => Ok(Category::Shopping),
            "Healthcare" => Ok(Category::Healthcare),
            "Entertainment" => Ok(Category::Entertainment),
            "Utilities" => Ok(Category::Utilities),
            "Uncategorized" => Ok(Category::Uncategorized),
            other => Err(format!("Unknown category: '{other}'")),
        }
    }
}
