use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Entity;

/// Ledger balance carried into the books at `as_of`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningBalance {
    #[serde(default)]
    pub id: String,
    pub company_id: String,
    pub account: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub as_of: NaiveDate,
}

impl OpeningBalance {
    /// Debit minus credit.
    pub fn net(&self) -> Decimal {
        self.debit - self.credit
    }
}

impl Entity for OpeningBalance {
    const RESOURCE: &'static str = "opening-balances";

    fn id(&self) -> &str {
        &self.id
    }
}
