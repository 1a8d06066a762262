//! Employee directory with add/edit through a validated draft.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tailor_client::TailorClient;
use tailor_client::model::{Employee, EmployeeStatus};
use tailor_ui::prelude::*;
use tailor_ui::table::DataTableBuilder;

use super::form::FormDraft;
use super::seed_date;
use super::table::{PageFuture, TableSpec, delete_by_id, list_rows, save_entity};

pub const DEPARTMENTS: &[&str] = &[
    "Cutting",
    "Sewing",
    "Finishing",
    "Quality",
    "Merchandising",
    "Store",
    "Accounts",
    "HR",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRow(pub Employee);

impl TableRow for EmployeeRow {
    type Key = String;
    const FIELDS: &'static [&'static str] = &[
        "id",
        "employee_id",
        "name",
        "email",
        "phone",
        "department",
        "designation",
        "joining_date",
        "salary",
        "status",
    ];

    fn key(&self) -> String {
        self.0.id.clone()
    }

    fn field(&self, name: &str) -> CellValue {
        let e = &self.0;
        match name {
            "id" => CellValue::from(&e.id),
            "employee_id" => CellValue::from(&e.employee_id),
            "name" => CellValue::from(&e.name),
            "email" => CellValue::from(&e.email),
            "phone" => CellValue::from(&e.phone),
            "department" => CellValue::from(&e.department),
            "designation" => CellValue::from(&e.designation),
            "joining_date" => CellValue::from(e.joining_date),
            "salary" => CellValue::from(e.salary),
            "status" => CellValue::from(e.status.to_string()),
            _ => CellValue::Empty,
        }
    }
}

/// Raw form input for an employee.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDraft {
    id: String,
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub designation: String,
    pub joining_date: String,
    pub salary: String,
    pub status: String,
}

impl Default for EmployeeDraft {
    fn default() -> Self {
        Self {
            id: String::new(),
            employee_id: String::new(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            department: String::new(),
            designation: String::new(),
            joining_date: String::new(),
            salary: String::new(),
            status: EmployeeStatus::Active.to_string(),
        }
    }
}

impl From<&Employee> for EmployeeDraft {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id.clone(),
            employee_id: e.employee_id.clone(),
            name: e.name.clone(),
            email: e.email.clone(),
            phone: e.phone.clone(),
            department: e.department.clone(),
            designation: e.designation.clone(),
            joining_date: e.joining_date.format(DATE_FORMAT).to_string(),
            salary: e.salary.to_string(),
            status: e.status.to_string(),
        }
    }
}

impl Draft for EmployeeDraft {
    type Output = EmployeeRow;

    fn schema() -> Schema<Self> {
        Schema::new()
            .field("employee_id", |d: &Self| d.employee_id.trim().to_string())
            .required("Employee ID is required")
            .pattern(r"^EMP\d{3,}$", "Employee ID must look like EMP001")
            .field("name", |d: &Self| d.name.trim().to_string())
            .required("Name is required")
            .min_length(2, "Name is too short")
            .max_length(80, "Name is too long")
            .field("email", |d: &Self| d.email.trim().to_string())
            .required("Email is required")
            .email("Please enter a valid email")
            .field("phone", |d: &Self| d.phone.trim().to_string())
            .pattern(r"^\+?[0-9][0-9 -]{6,14}$", "Please enter a valid phone number")
            .field("department", |d: &Self| d.department.trim().to_string())
            .required("Department is required")
            .one_of(DEPARTMENTS, "Unknown department")
            .field("designation", |d: &Self| d.designation.trim().to_string())
            .required("Designation is required")
            .field("joining_date", |d: &Self| d.joining_date.trim().to_string())
            .required("Joining date is required")
            .date("Use YYYY-MM-DD")
            .field("salary", |d: &Self| d.salary.trim().to_string())
            .required("Salary is required")
            .numeric("Salary must be a number")
            .range(Decimal::ZERO, Decimal::from(10_000_000), "Salary is out of range")
            .field("status", |d: &Self| d.status.trim().to_string())
            .one_of(&["Active", "Inactive"], "Status must be Active or Inactive")
    }

    fn build(&self) -> Result<EmployeeRow, FieldError> {
        let joining_date = NaiveDate::parse_from_str(self.joining_date.trim(), DATE_FORMAT)
            .map_err(|_| FieldError::new("joining_date", "Use YYYY-MM-DD"))?;
        if joining_date > chrono::Local::now().date_naive() {
            return Err(FieldError::new(
                "joining_date",
                "Joining date cannot be in the future",
            ));
        }
        let salary = Decimal::from_str(self.salary.trim())
            .map_err(|_| FieldError::new("salary", "Salary must be a number"))?;
        let status = match self.status.trim() {
            "Inactive" => EmployeeStatus::Inactive,
            _ => EmployeeStatus::Active,
        };

        Ok(EmployeeRow(Employee {
            id: self.id.clone(),
            employee_id: self.employee_id.trim().to_string(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            department: self.department.trim().to_string(),
            designation: self.designation.trim().to_string(),
            joining_date,
            salary,
            status,
        }))
    }
}

impl FormDraft for EmployeeDraft {
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("employee_id", "Employee ID"),
        ("name", "Name"),
        ("email", "Email"),
        ("phone", "Phone"),
        ("department", "Department"),
        ("designation", "Designation"),
        ("joining_date", "Joining date"),
        ("salary", "Salary"),
        ("status", "Status"),
    ];

    fn value(&self, key: &str) -> &str {
        match key {
            "employee_id" => &self.employee_id,
            "name" => &self.name,
            "email" => &self.email,
            "phone" => &self.phone,
            "department" => &self.department,
            "designation" => &self.designation,
            "joining_date" => &self.joining_date,
            "salary" => &self.salary,
            "status" => &self.status,
            _ => "",
        }
    }

    fn value_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "employee_id" => Some(&mut self.employee_id),
            "name" => Some(&mut self.name),
            "email" => Some(&mut self.email),
            "phone" => Some(&mut self.phone),
            "department" => Some(&mut self.department),
            "designation" => Some(&mut self.designation),
            "joining_date" => Some(&mut self.joining_date),
            "salary" => Some(&mut self.salary),
            "status" => Some(&mut self.status),
            _ => None,
        }
    }
}

pub struct Employees;

impl TableSpec for Employees {
    type Row = EmployeeRow;
    type Form = EmployeeDraft;

    const TITLE: &'static str = "Employees";
    const NOUN: &'static str = "Employee";
    const EDITABLE: bool = true;

    fn columns() -> Vec<ColumnDef<EmployeeRow>> {
        vec![
            ColumnDef::new("employee_id", "ID").width(7).sortable().pinned(),
            ColumnDef::new("name", "Name").width(20).sortable(),
            ColumnDef::new("department", "Department").width(13).sortable(),
            ColumnDef::new("designation", "Designation").width(16),
            ColumnDef::new("email", "Email").width(24),
            ColumnDef::new("joining_date", "Joined").width(10).sortable(),
            ColumnDef::new("salary", "Salary")
                .width(9)
                .align(Alignment::Right)
                .sortable(),
            ColumnDef::new("status", "Status").width(8),
        ]
    }

    fn configure(builder: DataTableBuilder<EmployeeRow>) -> DataTableBuilder<EmployeeRow> {
        builder
            .search_key("name")
            .filter_key(
                "status",
                vec![
                    Tab::all(),
                    Tab::new("Active", "Active"),
                    Tab::new("Inactive", "Inactive"),
                ],
            )
            .facet_key("department")
    }

    fn seed() -> Vec<EmployeeRow> {
        [
            ("EMP001", "Rahim Uddin", "Cutting", "Cutter", (2021, 2, 1), 18000),
            ("EMP002", "Karim Hossain", "Sewing", "Operator", (2022, 7, 15), 14500),
            ("EMP003", "Nasrin Akter", "Quality", "Inspector", (2020, 11, 3), 21000),
            ("EMP004", "Shirin Begum", "Sewing", "Line Chief", (2019, 4, 20), 26000),
            ("EMP005", "Jamal Mia", "Store", "Store Keeper", (2023, 1, 9), 16000),
            ("EMP006", "Farhana Islam", "Merchandising", "Merchandiser", (2018, 9, 1), 42000),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (employee_id, name, department, designation, (y, m, d), salary))| {
            let login = name.split(' ').next().unwrap_or(name).to_lowercase();
            EmployeeRow(Employee {
                id: format!("emp-{}", i + 1),
                employee_id: employee_id.to_string(),
                name: name.to_string(),
                email: format!("{}@tailor.example", login),
                phone: String::new(),
                department: department.to_string(),
                designation: designation.to_string(),
                joining_date: seed_date(y, m, d),
                salary: Decimal::from(salary),
                status: if i == 4 {
                    EmployeeStatus::Inactive
                } else {
                    EmployeeStatus::Active
                },
            })
        })
        .collect()
    }

    fn fetch(client: &TailorClient) -> Option<PageFuture<Vec<EmployeeRow>>> {
        Some(list_rows(client.employees(), EmployeeRow))
    }

    fn delete(client: &TailorClient, row: &EmployeeRow) -> Option<PageFuture<()>> {
        Some(delete_by_id(client.employees(), &row.0.id))
    }

    fn save(client: &TailorClient, row: EmployeeRow) -> Option<PageFuture<EmployeeRow>> {
        Some(save_entity(client.employees(), row.0, EmployeeRow))
    }

    fn draft(row: Option<&EmployeeRow>) -> EmployeeDraft {
        row.map(|r| EmployeeDraft::from(&r.0)).unwrap_or_default()
    }

    fn assign_key(row: &mut EmployeeRow, key: String) {
        row.0.id = key;
    }
}
