use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{AgencyError, Result};

/// A field agent. Only the salary can change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: i64,
    pub name: String,
    pub years_of_experience: i32,
    pub breed: String,
    pub salary: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an agent
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewAgent {
    pub name: String,
    pub breed: String,
    pub years_of_experience: i32,
    pub salary: Decimal,
}

impl NewAgent {
    /// Trim text fields and check basic bounds
    pub fn normalized(self) -> Result<Self> {
        let name = self.name.trim().to_string();
        let breed = self.breed.trim().to_string();

        if name.is_empty() {
            return Err(AgencyError::Validation("name is required".to_string()));
        }
        if breed.is_empty() {
            return Err(AgencyError::Validation("breed is required".to_string()));
        }
        if self.years_of_experience < 0 {
            return Err(AgencyError::Validation(
                "years_of_experience cannot be negative".to_string(),
            ));
        }
        validate_salary(self.salary)?;

        Ok(Self {
            name,
            breed,
            years_of_experience: self.years_of_experience,
            salary: self.salary,
        })
    }
}

/// Decimal places kept by the `agents.salary` column (`NUMERIC(12,2)`)
pub const SALARY_SCALE: u32 = 2;

/// Exclusive upper bound of the `agents.salary` column
pub const SALARY_LIMIT: Decimal = dec!(10000000000);

pub fn validate_salary(salary: Decimal) -> Result<()> {
    if salary.is_sign_negative() && !salary.is_zero() {
        return Err(AgencyError::Validation(
            "salary cannot be negative".to_string(),
        ));
    }
    if salary.normalize().scale() > SALARY_SCALE {
        return Err(AgencyError::Validation(format!(
            "salary cannot have more than {SALARY_SCALE} decimal places"
        )));
    }
    if salary >= SALARY_LIMIT {
        return Err(AgencyError::Validation(format!(
            "salary must be below {SALARY_LIMIT}"
        )));
    }
    Ok(())
}
