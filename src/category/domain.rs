//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{user::UserId, validation::Violation};

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return a [Violation] on the `name` field if `name` is empty or
    /// only whitespace.
    pub fn new(name: &str) -> Result<Self, Violation> {
        let name = name.trim();

        if name.is_empty() {
            Err(Violation::new("name", "cannot be empty"))
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because breaking the
    /// non-empty invariant causes incorrect behaviour but does not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Violation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = i64;

/// A category for grouping expenses (e.g., 'Groceries', 'Rent').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The display name of the category.
    pub name: CategoryName,
    /// The user that owns the category, if any.
    pub user_id: Option<UserId>,
}

/// Request body for creating a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryForm {
    /// The name of the new category.
    pub name: String,
    /// The user that owns the category.
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// A validated category that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// The name of the new category.
    pub name: CategoryName,
    /// The user that owns the category.
    pub user_id: Option<UserId>,
}

impl NewCategory {
    /// Validate the request body for a new category.
    ///
    /// # Errors
    /// Returns every field that failed validation.
    pub fn validate(form: CategoryForm) -> Result<Self, Vec<Violation>> {
        let name = CategoryName::new(&form.name).map_err(|violation| vec![violation])?;

        Ok(Self {
            name,
            user_id: form.user_id,
        })
    }
}

/// Request body for a partial update of a category.
///
/// Fields that are absent are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    /// The new name of the category.
    #[serde(default)]
    pub name: Option<String>,
}

impl CategoryUpdate {
    /// Apply the fields that are set to `category`.
    ///
    /// # Errors
    /// Returns every field that failed validation, `category` is not modified.
    pub fn merge(self, category: Category) -> Result<Category, Vec<Violation>> {
        let mut category = category;

        if let Some(name) = self.name {
            category.name = CategoryName::new(&name).map_err(|violation| vec![violation])?;
        }

        Ok(category)
    }
}
