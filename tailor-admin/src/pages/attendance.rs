//! Daily attendance, searchable by employee id.

use tailor_client::TailorClient;
use tailor_client::model::{AttendanceRecord, AttendanceStatus};
use tailor_ui::prelude::*;
use tailor_ui::table::DataTableBuilder;

use super::form::ReadOnly;
use super::seed_date;
use super::table::{PageFuture, TableSpec, delete_by_id, list_rows};

#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRow(pub AttendanceRecord);

impl TableRow for AttendanceRow {
    type Key = String;
    const FIELDS: &'static [&'static str] = &[
        "id",
        "employee_id",
        "employee_name",
        "date",
        "check_in",
        "check_out",
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
            "date" => CellValue::from(r.date),
            "check_in" => CellValue::from(r.check_in.as_ref()),
            "check_out" => CellValue::from(r.check_out.as_ref()),
            "status" => CellValue::from(r.status.as_str()),
            _ => CellValue::Empty,
        }
    }
}

pub struct Attendance;

impl TableSpec for Attendance {
    type Row = AttendanceRow;
    type Form = ReadOnly<AttendanceRow>;

    const TITLE: &'static str = "Attendance";
    const NOUN: &'static str = "Attendance record";

    fn columns() -> Vec<ColumnDef<AttendanceRow>> {
        vec![
            ColumnDef::new("employee_id", "Employee ID")
                .width(11)
                .sortable()
                .pinned(),
            ColumnDef::new("employee_name", "Name").width(20).sortable(),
            ColumnDef::new("date", "Date").width(10).sortable(),
            ColumnDef::new("check_in", "In").width(5),
            ColumnDef::new("check_out", "Out").width(5),
            ColumnDef::new("status", "Status").width(8).sortable(),
        ]
    }

    fn configure(builder: DataTableBuilder<AttendanceRow>) -> DataTableBuilder<AttendanceRow> {
        let tabs = std::iter::once(Tab::all())
            .chain(
                AttendanceStatus::ALL
                    .iter()
                    .map(|s| Tab::new(s.as_str(), s.as_str())),
            )
            .collect();
        builder.search_key("employee_id").filter_key("status", tabs)
    }

    fn seed() -> Vec<AttendanceRow> {
        let day = seed_date(2024, 5, 2);
        [
            ("EMP001", "Rahim Uddin", Some("08:55"), Some("17:05"), AttendanceStatus::Present),
            ("EMP002", "Karim Hossain", Some("09:14"), Some("17:30"), AttendanceStatus::Late),
            ("EMP003", "Nasrin Akter", None, None, AttendanceStatus::Leave),
            ("EMP004", "Shirin Begum", Some("08:48"), Some("17:00"), AttendanceStatus::Present),
            ("EMP005", "Jamal Mia", None, None, AttendanceStatus::Absent),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (employee_id, name, check_in, check_out, status))| {
            AttendanceRow(AttendanceRecord {
                id: format!("att-{}", i + 1),
                employee_id: employee_id.to_string(),
                employee_name: name.to_string(),
                date: day,
                check_in: check_in.map(str::to_string),
                check_out: check_out.map(str::to_string),
                status,
            })
        })
        .collect()
    }

    fn fetch(client: &TailorClient) -> Option<PageFuture<Vec<AttendanceRow>>> {
        Some(list_rows(client.attendance(), AttendanceRow))
    }

    fn delete(client: &TailorClient, row: &AttendanceRow) -> Option<PageFuture<()>> {
        Some(delete_by_id(client.attendance(), &row.0.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::TablePage;

    fn table() -> DataTable<AttendanceRow> {
        Attendance::configure(DataTable::builder(Attendance::columns(), Attendance::seed()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_search_by_employee_id() {
        let mut table = table();
        table.set_search("EMP002");
        let rows = table.visible_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0.employee_name, "Karim Hossain");
    }

    #[test]
    fn test_status_tabs() {
        let mut table = table();
        assert_eq!(table.tabs().len(), 5);
        table.set_tab(Some("Present"));
        assert_eq!(table.visible_keys(), vec!["att-1", "att-4"]);
    }

    #[test]
    fn test_page_builds() {
        assert!(TablePage::<Attendance>::new(None, 10).is_ok());
    }
}
