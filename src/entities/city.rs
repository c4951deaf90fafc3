// City entity - row of the `cities` table

use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub city_id: i64,
    pub city_name: String,
    /// FK into `countries`
    pub country_id: i64,
}

impl City {
    pub fn new(city_id: i64, city_name: &str, country_id: i64) -> Self {
        City {
            city_id,
            city_name: city_name.to_string(),
            country_id,
        }
    }

    /// Map a row selected as CityID, CityName, CountryID.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(City {
            city_id: row.get(0)?,
            city_name: row.get(1)?,
            country_id: row.get(2)?,
        })
    }
}
