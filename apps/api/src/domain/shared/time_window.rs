use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;
pub const MAX_LOOKBACK_DAYS: i64 = 365;

/// Number of days a read looks back from "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LookbackDays {
    #[validate(range(min = 1, max = 365))]
    pub value: i64,
}

impl LookbackDays {
    pub fn new(value: i64) -> Result<Self, validator::ValidationErrors> {
        let days = Self { value };
        days.validate()?;
        Ok(days)
    }

    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.value)
    }

    pub fn period_label(&self) -> String {
        format!("{} days", self.value)
    }
}

impl Default for LookbackDays {
    fn default() -> Self {
        Self {
            value: DEFAULT_LOOKBACK_DAYS,
        }
    }
}
