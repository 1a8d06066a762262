//! Leave requests by status.

use tailor_client::TailorClient;
use tailor_client::model::{LeaveRequest, LeaveStatus};
use tailor_ui::prelude::*;
use tailor_ui::table::DataTableBuilder;

use super::form::ReadOnly;
use super::seed_date;
use super::table::{PageFuture, TableSpec, delete_by_id, list_rows};

#[derive(Debug, Clone, PartialEq)]
pub struct LeaveRow(pub LeaveRequest);

impl TableRow for LeaveRow {
    type Key = String;
    const FIELDS: &'static [&'static str] = &[
        "id",
        "employee_id",
        "employee_name",
        "leave_type",
        "from_date",
        "to_date",
        "days",
        "reason",
        "status",
    ];

    fn key(&self) -> String {
        self.0.id.clone()
    }

    fn field(&self, name: &str) -> CellValue {
        let r = &self.0;
        match name {
            "id" => CellValue::from(&r.id),
            "employee_id" => CellValue::from(&r.employee_id),
            "employee_name" => CellValue::from(&r.employee_name),
            "leave_type" => CellValue::from(&r.leave_type),
            "from_date" => CellValue::from(r.from_date),
            "to_date" => CellValue::from(r.to_date),
            "days" => CellValue::from(r.days),
            "reason" => CellValue::from(&r.reason),
            "status" => CellValue::from(r.status.to_string()),
            _ => CellValue::Empty,
        }
    }
}

pub struct Leave;

impl TableSpec for Leave {
    type Row = LeaveRow;
    type Form = ReadOnly<LeaveRow>;

    const TITLE: &'static str = "Leave";
    const NOUN: &'static str = "Leave request";

    fn columns() -> Vec<ColumnDef<LeaveRow>> {
        vec![
            ColumnDef::new("employee_id", "Employee ID").width(11).sortable().pinned(),
            ColumnDef::new("employee_name", "Name").width(18).sortable(),
            ColumnDef::new("leave_type", "Type").width(9).sortable(),
            ColumnDef::new("from_date", "From").width(10).sortable(),
            ColumnDef::new("to_date", "To").width(10),
            ColumnDef::new("days", "Days")
                .width(4)
                .align(Alignment::Right)
                .sortable(),
            ColumnDef::new("reason", "Reason").width(20),
            ColumnDef::new("status", "Status").width(8),
        ]
    }

    fn configure(builder: DataTableBuilder<LeaveRow>) -> DataTableBuilder<LeaveRow> {
        builder.search_key("employee_name").filter_key(
            "status",
            vec![
                Tab::all(),
                Tab::new("Pending", "Pending"),
                Tab::new("Approved", "Approved"),
                Tab::new("Rejected", "Rejected"),
            ],
        )
    }

    fn seed() -> Vec<LeaveRow> {
        [
            ("EMP003", "Nasrin Akter", "Sick", (5, 6), (5, 7), "Fever", LeaveStatus::Approved),
            ("EMP001", "Rahim Uddin", "Casual", (5, 13), (5, 13), "Family event", LeaveStatus::Pending),
            ("EMP004", "Shirin Begum", "Annual", (6, 2), (6, 9), "Village visit", LeaveStatus::Pending),
            ("EMP002", "Karim Hossain", "Casual", (5, 20), (5, 21), "", LeaveStatus::Rejected),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (employee_id, name, leave_type, (fm, fd), (tm, td), reason, status))| {
            let from_date = seed_date(2024, fm, fd);
            let to_date = seed_date(2024, tm, td);
            LeaveRow(LeaveRequest {
                id: format!("lv-{}", i + 1),
                employee_id: employee_id.to_string(),
                employee_name: name.to_string(),
                leave_type: leave_type.to_string(),
                from_date,
                to_date,
                days: (to_date - from_date).num_days() as u32 + 1,
                reason: reason.to_string(),
                status,
            })
        })
        .collect()
    }

    fn fetch(client: &TailorClient) -> Option<PageFuture<Vec<LeaveRow>>> {
        Some(list_rows(client.leaves(), LeaveRow))
    }

    fn delete(client: &TailorClient, row: &LeaveRow) -> Option<PageFuture<()>> {
        Some(delete_by_id(client.leaves(), &row.0.id))
    }
}
