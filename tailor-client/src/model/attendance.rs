use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Leave,
}

impl AttendanceStatus {
    pub const ALL: [Self; 4] = [Self::Present, Self::Absent, Self::Late, Self::Leave];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Late => "Late",
            Self::Leave => "Leave",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One employee's attendance for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default)]
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub date: NaiveDate,
    /// `HH:MM`, absent for days without a punch.
    #[serde(default)]
    pub check_in: Option<String>,
    #[serde(default)]
    pub check_out: Option<String>,
    pub status: AttendanceStatus,
}

impl Entity for AttendanceRecord {
    const RESOURCE: &'static str = "attendance";

    fn id(&self) -> &str {
        &self.id
    }
}
