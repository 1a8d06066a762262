use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Entity;

/// One employee's pay for one month. Figures come from the server as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRecord {
    #[serde(default)]
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    /// `YYYY-MM`.
    pub month: String,
    pub basic: Decimal,
    #[serde(default)]
    pub allowance: Decimal,
    #[serde(default)]
    pub deduction: Decimal,
    pub net_pay: Decimal,
}

impl Entity for PayrollRecord {
    const RESOURCE: &'static str = "payroll";

    fn id(&self) -> &str {
        &self.id
    }
}
