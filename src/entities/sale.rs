// Sale entity - row of the `sales` table

use anyhow::{bail, Result};
use chrono::NaiveDate;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub sale_id: i64,
    /// FK into `employees`
    pub salesperson_id: i64,
    /// FK into `customers`
    pub customer_id: i64,
    /// FK into `products`
    pub product_id: i64,
    pub quantity: i64,
    /// Percentage in 0..=100
    pub discount: f64,
    pub total_price: f64,
    pub sales_date: Option<NaiveDate>,
    pub transaction_number: Option<String>,
}

impl Sale {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sale_id: i64,
        salesperson_id: i64,
        customer_id: i64,
        product_id: i64,
        quantity: i64,
        discount: f64,
        total_price: f64,
        sales_date: Option<NaiveDate>,
        transaction_number: Option<&str>,
    ) -> Result<Self> {
        if quantity < 0 {
            bail!("quantity cannot be negative");
        }
        if !(0.0..=100.0).contains(&discount) {
            bail!("discount percentage must be between 0 and 100");
        }
        Ok(Sale {
            sale_id,
            salesperson_id,
            customer_id,
            product_id,
            quantity,
            discount,
            total_price,
            sales_date,
            transaction_number: transaction_number.map(|t| t.to_string()),
        })
    }

    pub fn set_quantity(&mut self, quantity: i64) -> Result<()> {
        if quantity < 0 {
            bail!("quantity cannot be negative");
        }
        self.quantity = quantity;
        Ok(())
    }

    /// Total price with the discount percentage applied.
    pub fn final_price(&self) -> f64 {
        self.total_price - (self.total_price * self.discount / 100.0)
    }

    /// Map a row selected as SalesID, SalesPersonID, CustomerID, ProductID,
    /// Quantity, Discount, TotalPrice, SalesDate, TransactionNumber.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Sale {
            sale_id: row.get(0)?,
            salesperson_id: row.get(1)?,
            customer_id: row.get(2)?,
            product_id: row.get(3)?,
            quantity: row.get(4)?,
            discount: row.get(5)?,
            total_price: row.get(6)?,
            sales_date: row.get(7)?,
            transaction_number: row.get(8)?,
        })
    }
}
