use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeRecord {
    #[serde(default)]
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub date: NaiveDate,
    pub hours: Decimal,
    pub rate: Decimal,
    /// As reported by the server; not recomputed here.
    pub amount: Decimal,
}

impl Entity for OvertimeRecord {
    const RESOURCE: &'static str = "overtime";

    fn id(&self) -> &str {
        &self.id
    }
}
