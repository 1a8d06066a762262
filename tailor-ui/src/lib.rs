//! Terminal UI building blocks for the Tailor ERP admin.
//!
//! The centre piece is [`DataTable`](table::DataTable), a filtered, sortable,
//! paged view over caller-owned rows. Around it sit typed form drafts with
//! schema validation, cancellable load tasks, toasts and the per-page
//! context.

pub mod context;
pub mod resource;
pub mod selection;
pub mod table;
pub mod toast;
pub mod validation;
pub mod value;
pub mod wizard;

pub use table::TableRow;
pub use value::CellValue;

pub mod prelude {
    pub use crate::context::PageContext;
    pub use crate::resource::{LoadTask, Resource, ResourceError, ResourceState};
    pub use crate::selection::{Selection, SelectionMode};
    pub use crate::table::{
        Alignment, ColumnDef, DataTable, Line, LineKind, SearchMode, Sheet, SortDirection, Tab,
        TableError, TableEvent, TableRow, render,
    };
    pub use crate::toast::{Toast, ToastLevel, Toasts};
    pub use crate::validation::{Draft, FieldError, Schema, ValidationErrors, ValidationResult, submit};
    pub use crate::value::CellValue;
    pub use crate::wizard::{StepForm, Wizard};
}
