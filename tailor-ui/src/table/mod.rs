//! Data table - a filtered, sortable, paged view over caller-owned rows.
//!
//! The table provides:
//! - Declarative columns bound to named row fields
//! - Case-insensitive search on one field, tab and facet filters
//! - Multi-row selection where "select all" covers visible rows only
//! - Sorting, pagination and column visibility
//! - Pass-through edit/delete/add requests
//!
//! # Example
//!
//! ```ignore
//! use tailor_ui::prelude::*;
//!
//! let columns = vec![
//!     ColumnDef::new("employee_id", "Employee").width(10),
//!     ColumnDef::new("status", "Status").width(8),
//! ];
//! let mut table = DataTable::builder(columns, rows)
//!     .search_key("employee_id")
//!     .selection(SelectionMode::Multi)
//!     .build()?;
//!
//! table.set_search("EMP002");
//! for line in render(&table) {
//!     println!("{}", line.text);
//! }
//! ```

mod column;
mod error;
mod events;
mod filter;
mod pagination;
mod render;
mod row;
mod sort;
mod state;

pub use column::{Alignment, ColumnDef, Header};
pub use error::TableError;
pub use events::{TableEvent, TableHandlers};
pub use filter::{
    ALL_TAB, FilterKeys, FilterState, FuzzyMatch, SearchMode, Tab, filter_indices, fuzzy_filter,
    matches_facet, matches_search, matches_tab,
};
pub use pagination::{DEFAULT_PAGE_SIZE, Pagination};
pub use render::{EMPTY_DATA, Line, LineKind, NO_RESULTS, fit, render, selection_indicator, truncate};
pub use row::TableRow;
pub use sort::{SortDirection, SortState, cycle_sort, sort_indices};
pub use state::{DataTable, DataTableBuilder, Sheet, TableId};
