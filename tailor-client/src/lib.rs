//! Tailor ERP API client library
//!
//! An async client for the ERP backend's REST services: attendance,
//! payroll, leave, employees, companies, opening balances and overtime.

pub mod api;
pub mod auth;
pub mod error;
pub mod model;
pub mod retry;

mod client;

pub use client::*;

use api::Service;
use model::{
    AttendanceRecord, Company, Employee, Entity, LeaveRequest, OpeningBalance, OvertimeRecord,
    PayrollRecord,
};

impl TailorClient {
    /// CRUD service for any [`Entity`].
    pub fn service<E: Entity>(&self) -> Service<E> {
        Service::new(self.clone())
    }

    pub fn attendance(&self) -> Service<AttendanceRecord> {
        self.service()
    }

    pub fn payroll(&self) -> Service<PayrollRecord> {
        self.service()
    }

    pub fn leaves(&self) -> Service<LeaveRequest> {
        self.service()
    }

    pub fn employees(&self) -> Service<Employee> {
        self.service()
    }

    pub fn companies(&self) -> Service<Company> {
        self.service()
    }

    pub fn opening_balances(&self) -> Service<OpeningBalance> {
        self.service()
    }

    pub fn overtime(&self) -> Service<OvertimeRecord> {
        self.service()
    }
}
