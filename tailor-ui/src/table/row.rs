//! The row trait.

use std::fmt::Display;
use std::hash::Hash;

use crate::value::CellValue;

/// Trait for records that can be displayed as table rows.
///
/// The table never mutates rows. Edits happen in the owner, which then
/// replaces the table's data.
///
/// # Example
///
/// ```
/// use tailor_ui::{CellValue, TableRow};
///
/// #[derive(Clone)]
/// struct Expense {
///     id: String,
///     category: String,
/// }
///
/// impl TableRow for Expense {
///     type Key = String;
///     const FIELDS: &'static [&'static str] = &["id", "category"];
///
///     fn key(&self) -> String {
///         self.id.clone()
///     }
///
///     fn field(&self, name: &str) -> CellValue {
///         match name {
///             "id" => CellValue::from(&self.id),
///             "category" => CellValue::from(&self.category),
///             _ => CellValue::Empty,
///         }
///     }
/// }
/// ```
pub trait TableRow: Clone + Send + Sync + 'static {
    /// Stable identity used for selection and row actions.
    type Key: Clone + Eq + Hash + Ord + Display + Send + Sync + 'static;

    /// Every field name [`field`](TableRow::field) understands.
    const FIELDS: &'static [&'static str];

    fn key(&self) -> Self::Key;

    /// Read a field by name. Unknown names return [`CellValue::Empty`].
    fn field(&self, name: &str) -> CellValue;

    /// Whether `name` is a field of this row type.
    fn has_field(name: &str) -> bool {
        Self::FIELDS.contains(&name)
    }
}
