use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static! {
    static ref WAREHOUSE_ID_REGEX: regex::Regex = regex::Regex::new(r"^wh_[0-9a-z_]{1,32}$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct WarehouseId {
    #[validate(regex(path = *WAREHOUSE_ID_REGEX))]
    pub value: String,
}

impl WarehouseId {
    pub fn new(value: impl Into<String>) -> Result<Self, validator::ValidationErrors> {
        let id = Self {
            value: value.into(),
        };
        id.validate()?;
        Ok(id)
    }

    /// `wh_NNN` for the n-th warehouse, zero-padded to three digits.
    pub fn sequential(n: i64) -> Self {
        Self {
            value: format!("wh_{:03}", n),
        }
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}
