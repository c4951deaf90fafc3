// Customer entity - row of the `customers` table

use anyhow::{bail, Result};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: i64,
    pub first_name: String,
    pub middle_initial: Option<String>,
    pub last_name: String,
    /// FK into `cities`; absent for customers imported from flat exports
    pub city_id: Option<i64>,
    pub address: String,
}

impl Customer {
    pub fn new(
        customer_id: i64,
        first_name: &str,
        middle_initial: Option<&str>,
        last_name: &str,
        city_id: Option<i64>,
        address: &str,
    ) -> Result<Self> {
        if address.is_empty() {
            bail!("address cannot be empty");
        }
        Ok(Customer {
            customer_id,
            first_name: first_name.to_string(),
            middle_initial: middle_initial.map(|m| m.to_string()),
            last_name: last_name.to_string(),
            city_id,
            address: address.to_string(),
        })
    }

    pub fn set_address(&mut self, address: &str) -> Result<()> {
        if address.is_empty() {
            bail!("address cannot be empty");
        }
        self.address = address.to_string();
        Ok(())
    }

    /// "First M. Last" display form; the middle initial is skipped when
    /// absent.
    pub fn full_name(&self) -> String {
        full_display_name(&self.first_name, self.middle_initial.as_deref(), &self.last_name)
    }

    /// Map a row selected as CustomerID, FirstName, MiddleInitial,
    /// LastName, CityID, Address.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Customer {
            customer_id: row.get(0)?,
            first_name: row.get(1)?,
            middle_initial: row.get(2)?,
            last_name: row.get(3)?,
            city_id: row.get(4)?,
            address: row.get(5)?,
        })
    }
}

/// Shared display-name format for customers and employees.
pub(crate) fn full_display_name(first: &str, middle: Option<&str>, last: &str) -> String {
    match middle {
        Some(m) if !m.is_empty() => format!("{} {}. {}", first, m, last),
        _ => format!("{} {}", first, last).trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_address_rejected() {
        assert!(Customer::new(1, "John", None, "Doe", Some(1), "").is_err());

        let mut customer = Customer::new(1, "John", None, "Doe", Some(1), "Main St 1").unwrap();
        assert!(customer.set_address("").is_err());
        assert_eq!(customer.address, "Main St 1");
    }

    #[test]
    fn test_full_name() {
        let with_middle = Customer::new(1, "John", Some("A"), "Doe", Some(1), "Main St 1").unwrap();
        assert_eq!(with_middle.full_name(), "John A. Doe");

        let without_middle = Customer::new(2, "Jane", None, "Smith", Some(1), "Main St 2").unwrap();
        assert_eq!(without_middle.full_name(), "Jane Smith");
    }
}
