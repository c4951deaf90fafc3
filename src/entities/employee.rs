// Employee entity - row of the `employees` table

use super::customer::full_display_name;
use chrono::NaiveDate;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: i64,
    pub first_name: String,
    pub middle_initial: Option<String>,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    /// FK into `cities`; absent for employees imported from flat exports
    pub city_id: Option<i64>,
    pub hire_date: Option<NaiveDate>,
}

impl Employee {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        employee_id: i64,
        first_name: &str,
        middle_initial: Option<&str>,
        last_name: &str,
        birth_date: Option<NaiveDate>,
        gender: Option<&str>,
        city_id: Option<i64>,
        hire_date: Option<NaiveDate>,
    ) -> Self {
        Employee {
            employee_id,
            first_name: first_name.to_string(),
            middle_initial: middle_initial.map(|m| m.to_string()),
            last_name: last_name.to_string(),
            birth_date,
            gender: gender.map(|g| g.to_string()),
            city_id,
            hire_date,
        }
    }

    /// "First M. Last" display form, the same shape the summary query
    /// concatenates into `EmployeeName`.
    pub fn full_name(&self) -> String {
        full_display_name(&self.first_name, self.middle_initial.as_deref(), &self.last_name)
    }

    /// Map a row selected as EmployeeID, FirstName, MiddleInitial,
    /// LastName, BirthDate, Gender, CityID, HireDate.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Employee {
            employee_id: row.get(0)?,
            first_name: row.get(1)?,
            middle_initial: row.get(2)?,
            last_name: row.get(3)?,
            birth_date: row.get(4)?,
            gender: row.get(5)?,
            city_id: row.get(6)?,
            hire_date: row.get(7)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_trims_missing_middle() {
        let employee = Employee::new(1, "Alice", None, "Smith", None, None, Some(1), None);
        assert_eq!(employee.full_name(), "Alice Smith");

        let with_middle = Employee::new(2, "Bob", Some("J"), "Johnson", None, None, Some(1), None);
        assert_eq!(with_middle.full_name(), "Bob J. Johnson");
    }
}
