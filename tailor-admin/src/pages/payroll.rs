//! Monthly payroll with a month facet.

use rust_decimal::Decimal;
use tailor_client::TailorClient;
use tailor_client::model::PayrollRecord;
use tailor_ui::prelude::*;
use tailor_ui::table::DataTableBuilder;

use super::form::ReadOnly;
use super::table::{PageFuture, TableSpec, delete_by_id, list_rows};

#[derive(Debug, Clone, PartialEq)]
pub struct PayrollRow(pub PayrollRecord);

impl TableRow for PayrollRow {
    type Key = String;
    const FIELDS: &'static [&'static str] = &[
        "id",
        "employee_id",
        "employee_name",
        "month",
        "basic",
        "allowance",
        "deduction",
        "net_pay",
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
            "month" => CellValue::from(&r.month),
            "basic" => CellValue::from(r.basic),
            "allowance" => CellValue::from(r.allowance),
            "deduction" => CellValue::from(r.deduction),
            "net_pay" => CellValue::from(r.net_pay),
            _ => CellValue::Empty,
        }
    }
}

fn money(key: &'static str, label: &'static str) -> ColumnDef<PayrollRow> {
    ColumnDef::new(key, label)
        .width(10)
        .align(Alignment::Right)
        .sortable()
        .cell(move |row: &PayrollRow| match row.field(key) {
            CellValue::Decimal(d) => format!("{:.2}", d),
            other => other.to_string(),
        })
}

pub struct Payroll;

impl TableSpec for Payroll {
    type Row = PayrollRow;
    type Form = ReadOnly<PayrollRow>;

    const TITLE: &'static str = "Payroll";
    const NOUN: &'static str = "Payroll record";

    fn columns() -> Vec<ColumnDef<PayrollRow>> {
        vec![
            ColumnDef::new("employee_id", "Employee ID").width(11).sortable().pinned(),
            ColumnDef::new("employee_name", "Name").width(18).sortable(),
            ColumnDef::new("month", "Month").width(7).sortable(),
            money("basic", "Basic"),
            money("allowance", "Allowance"),
            money("deduction", "Deduction"),
            money("net_pay", "Net pay"),
        ]
    }

    fn configure(builder: DataTableBuilder<PayrollRow>) -> DataTableBuilder<PayrollRow> {
        builder.search_key("employee_id").facet_key("month")
    }

    fn seed() -> Vec<PayrollRow> {
        [
            ("EMP001", "Rahim Uddin", "2024-04", 18000, 2500, 300, 20200),
            ("EMP002", "Karim Hossain", "2024-04", 14500, 2000, 0, 16500),
            ("EMP001", "Rahim Uddin", "2024-05", 18000, 2500, 800, 19700),
            ("EMP002", "Karim Hossain", "2024-05", 14500, 2000, 450, 16050),
            ("EMP004", "Shirin Begum", "2024-05", 26000, 3500, 0, 29500),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (employee_id, name, month, basic, allowance, deduction, net_pay))| {
            PayrollRow(PayrollRecord {
                id: format!("pay-{}", i + 1),
                employee_id: employee_id.to_string(),
                employee_name: name.to_string(),
                month: month.to_string(),
                basic: Decimal::from(basic),
                allowance: Decimal::from(allowance),
                deduction: Decimal::from(deduction),
                net_pay: Decimal::from(net_pay),
            })
        })
        .collect()
    }

    fn fetch(client: &TailorClient) -> Option<PageFuture<Vec<PayrollRow>>> {
        Some(list_rows(client.payroll(), PayrollRow))
    }

    fn delete(client: &TailorClient, row: &PayrollRow) -> Option<PageFuture<()>> {
        Some(delete_by_id(client.payroll(), &row.0.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataTable<PayrollRow> {
        Payroll::configure(DataTable::builder(Payroll::columns(), Payroll::seed()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_month_facet() {
        let mut table = table();
        assert_eq!(table.facet_options(), vec!["2024-04", "2024-05"]);
        table.set_facet(Some("2024-04".into()));
        assert_eq!(table.visible_keys(), vec!["pay-1", "pay-2"]);
    }

    #[test]
    fn test_money_cells() {
        let table = table();
        let row = &table.data()[0];
        let net = &table.columns()[6];
        assert_eq!(net.render_cell(row), "20200.00");
    }

    #[test]
    fn test_sort_by_net_pay() {
        let mut table = table();
        assert!(table.sort_by("net_pay"));
        assert_eq!(
            table.visible_keys(),
            vec!["pay-4", "pay-2", "pay-3", "pay-1", "pay-5"]
        );
    }
}
