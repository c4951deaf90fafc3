// Product entity - row of the `products` table

use anyhow::{bail, Result};
use chrono::NaiveDate;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    pub price: f64,
    /// FK into `categories`
    pub category_id: i64,
    pub prod_class: Option<String>,
    pub modify_date: Option<NaiveDate>,
    pub resistant: Option<String>,
    pub is_allergic: bool,
    /// Shelf life in days
    pub vitality_days: i64,
}

impl Product {
    pub fn new(
        product_id: i64,
        product_name: &str,
        price: f64,
        category_id: i64,
        vitality_days: i64,
    ) -> Result<Self> {
        if price < 0.0 {
            bail!("price cannot be negative");
        }
        Ok(Product {
            product_id,
            product_name: product_name.to_string(),
            price,
            category_id,
            prod_class: None,
            modify_date: None,
            resistant: None,
            is_allergic: false,
            vitality_days,
        })
    }

    pub fn set_price(&mut self, price: f64) -> Result<()> {
        if price < 0.0 {
            bail!("price cannot be negative");
        }
        self.price = price;
        Ok(())
    }

    /// Reduce the price by a percentage in 0..=100.
    pub fn apply_discount(&mut self, percentage: f64) -> Result<()> {
        if !(0.0..=100.0).contains(&percentage) {
            bail!("discount percentage must be between 0 and 100");
        }
        self.price *= 1.0 - percentage / 100.0;
        Ok(())
    }

    /// Whether the shelf life has run out after `days_passed` days.
    pub fn is_expired(&self, days_passed: i64) -> Result<bool> {
        if days_passed < 0 {
            bail!("days passed cannot be negative");
        }
        Ok(self.vitality_days <= days_passed)
    }

    /// Map a row selected as ProductID, ProductName, Price, CategoryID,
    /// Class, ModifyDate, Resistant, IsAllergic, VitalityDays.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Product {
            product_id: row.get(0)?,
            product_name: row.get(1)?,
            price: row.get(2)?,
            category_id: row.get(3)?,
            prod_class: row.get(4)?,
            modify_date: row.get(5)?,
            resistant: row.get(6)?,
            is_allergic: row.get(7)?,
            vitality_days: row.get(8)?,
        })
    }
}
