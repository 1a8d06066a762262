//! Form drafts and validation.
//!
//! Forms hold a typed draft. A [`Schema`] checks the draft field by field
//! and [`submit`] turns a valid draft into its payload.
//!
//! # Example
//!
//! ```ignore
//! use tailor_ui::validation::{Draft, Schema, submit};
//!
//! match submit(&draft) {
//!     Ok(employee) => save(employee),
//!     Err(errors) => cx.toasts.push(Toast::error(errors.to_string())),
//! }
//! ```

mod draft;
mod result;
mod schema;

pub use draft::{Draft, submit};
pub use result::{FieldError, ValidationErrors, ValidationResult};
pub use schema::Schema;
