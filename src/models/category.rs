//! Expense and income categories.
//!
//! Categories are global: every user picks from the same fixed set of
//! names, and each name exists at most once per table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategoryName {
    Food,
    Transport,
    SocialLife,
    Pets,
    Apparel,
    Health,
    Education,
    Other,
}

impl ExpenseCategoryName {
    pub const ALL: [ExpenseCategoryName; 8] = [
        ExpenseCategoryName::Food,
        ExpenseCategoryName::Transport,
        ExpenseCategoryName::SocialLife,
        ExpenseCategoryName::Pets,
        ExpenseCategoryName::Apparel,
        ExpenseCategoryName::Health,
        ExpenseCategoryName::Education,
        ExpenseCategoryName::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategoryName::Food => "food",
            ExpenseCategoryName::Transport => "transport",
            ExpenseCategoryName::SocialLife => "social_life",
            ExpenseCategoryName::Pets => "pets",
            ExpenseCategoryName::Apparel => "apparel",
            ExpenseCategoryName::Health => "health",
            ExpenseCategoryName::Education => "education",
            ExpenseCategoryName::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategoryName::Food => "Food",
            ExpenseCategoryName::Transport => "Transport",
            ExpenseCategoryName::SocialLife => "Social Life",
            ExpenseCategoryName::Pets => "Pets",
            ExpenseCategoryName::Apparel => "Apparel",
            ExpenseCategoryName::Health => "Health",
            ExpenseCategoryName::Education => "Education",
            ExpenseCategoryName::Other => "Other",
        }
    }
}

impl FromStr for ExpenseCategoryName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown expense category: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeCategoryName {
    Salary,
    Allowance,
    Bonus,
    Other,
}

impl IncomeCategoryName {
    pub const ALL: [IncomeCategoryName; 4] = [
        IncomeCategoryName::Salary,
        IncomeCategoryName::Allowance,
        IncomeCategoryName::Bonus,
        IncomeCategoryName::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeCategoryName::Salary => "salary",
            IncomeCategoryName::Allowance => "allowance",
            IncomeCategoryName::Bonus => "bonus",
            IncomeCategoryName::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IncomeCategoryName::Salary => "Salary",
            IncomeCategoryName::Allowance => "Allowance",
            IncomeCategoryName::Bonus => "Bonus",
            IncomeCategoryName::Other => "Other",
        }
    }
}

impl FromStr for IncomeCategoryName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown income category: {}", s))
    }
}

/// Label for a stored expense category name; unknown names pass through.
pub fn expense_label(name: &str) -> String {
    name.parse::<ExpenseCategoryName>()
        .map(|c| c.label().to_string())
        .unwrap_or_else(|_| name.to_string())
}

/// Label for a stored income category name; unknown names pass through.
pub fn income_label(name: &str) -> String {
    name.parse::<IncomeCategoryName>()
        .map(|c| c.label().to_string())
        .unwrap_or_else(|_| name.to_string())
}

/// Row of `expense_categories` or `income_categories`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

impl CategoryResponse {
    pub fn expense(category: Category) -> Self {
        Self {
            label: expense_label(&category.name),
            id: category.id,
            name: category.name,
            created_at: category.created_at,
        }
    }

    pub fn income(category: Category) -> Self {
        Self {
            label: income_label(&category.name),
            id: category.id,
            name: category.name,
            created_at: category.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub expense_categories: Vec<CategoryResponse>,
    pub income_categories: Vec<CategoryResponse>,
}

#[derive(Debug, Deserialize)]
pub struct AddExpenseCategoryRequest {
    pub name: ExpenseCategoryName,
}

#[derive(Debug, Deserialize)]
pub struct AddIncomeCategoryRequest {
    pub name: IncomeCategoryName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_their_string_form() {
        for c in ExpenseCategoryName::ALL {
            assert_eq!(c.as_str().parse::<ExpenseCategoryName>(), Ok(c));
        }
        for c in IncomeCategoryName::ALL {
            assert_eq!(c.as_str().parse::<IncomeCategoryName>(), Ok(c));
        }
    }

    #[test]
    fn labels_are_human_readable() {
        assert_eq!(expense_label("social_life"), "Social Life");
        assert_eq!(income_label("bonus"), "Bonus");
        assert_eq!(expense_label("legacy"), "legacy");
    }
}
