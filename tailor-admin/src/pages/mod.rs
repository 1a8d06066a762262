//! Screens of the admin shell.

mod address;
mod attendance;
mod cutting;
mod employees;
mod expenses;
mod form;
mod leave;
mod overtime;
mod payroll;
mod settings;
mod table;

pub use address::AddressPage;
pub use attendance::Attendance;
pub use cutting::CuttingPage;
pub use employees::Employees;
pub use expenses::Expenses;
pub use leave::Leave;
pub use overtime::Overtime;
pub use payroll::Payroll;
pub use settings::SettingsPage;
pub use table::TablePage;

use chrono::NaiveDate;
use crossterm::event::KeyEvent;
use tailor_ui::context::PageContext;

use crate::terminal::StyledLine;

/// One screen. The shell owns the pages and routes input to the current one.
pub trait Page {
    fn title(&self) -> &'static str;

    /// The page became current. Start loads here; they hang off
    /// [`PageContext::load_token`] and are cancelled when the user leaves.
    fn activate(&mut self, cx: &mut PageContext);

    /// Called every frame to pick up finished loads.
    fn poll(&mut self, _cx: &mut PageContext) {}

    fn handle_key(&mut self, key: KeyEvent, cx: &mut PageContext);

    fn render(&self, cx: &PageContext) -> Vec<StyledLine>;
}

/// Fixed dates for seed rows.
fn seed_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}
