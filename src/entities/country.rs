// Country entity - row of the `countries` table

use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub country_id: i64,
    pub country_name: String,
    /// Two-letter code, e.g. "AR"
    pub country_code: Option<String>,
}

impl Country {
    pub fn new(country_id: i64, country_name: &str, country_code: Option<&str>) -> Self {
        Country {
            country_id,
            country_name: country_name.to_string(),
            country_code: country_code.map(|c| c.to_string()),
        }
    }

    /// Map a row selected as CountryID, CountryName, CountryCode.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Country {
            country_id: row.get(0)?,
            country_name: row.get(1)?,
            country_code: row.get(2)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_new() {
        let country = Country::new(1, "Argentina", Some("AR"));
        assert_eq!(country.country_name, "Argentina");
        assert_eq!(country.country_code.as_deref(), Some("AR"));
    }
}
