// Category entity - row of the `categories` table

use anyhow::{bail, Result};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
}

impl Category {
    pub fn new(category_id: i64, category_name: &str) -> Result<Self> {
        if category_name.is_empty() {
            bail!("category name cannot be empty");
        }
        Ok(Category {
            category_id,
            category_name: category_name.to_string(),
        })
    }

    pub fn rename(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            bail!("category name cannot be empty");
        }
        self.category_name = name.to_string();
        Ok(())
    }

    /// Map a row selected as CategoryID, CategoryName.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Category {
            category_id: row.get(0)?,
            category_name: row.get(1)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_rejected() {
        assert!(Category::new(1, "").is_err());

        let mut category = Category::new(1, "Beverages").unwrap();
        assert!(category.rename("").is_err());
        assert_eq!(category.category_name, "Beverages");
    }
}
