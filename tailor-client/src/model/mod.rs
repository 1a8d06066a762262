//! Typed payloads for the ERP resources.

mod attendance;
mod company;
mod employee;
mod leave;
mod opening_balance;
mod overtime;
mod payroll;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use company::Company;
pub use employee::{Employee, EmployeeStatus};
pub use leave::{LeaveRequest, LeaveStatus};
pub use opening_balance::OpeningBalance;
pub use overtime::OvertimeRecord;
pub use payroll::PayrollRecord;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A record type served under one REST collection.
///
/// `RESOURCE` is the collection's path segment, e.g. `employees` for
/// `{base}/employees` and `{base}/employees/{id}`.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const RESOURCE: &'static str;

    /// Server-assigned id. Empty for records not yet created.
    fn id(&self) -> &str;
}
