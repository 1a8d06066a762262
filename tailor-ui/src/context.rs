//! Per-page UI context handed to every page handler.

use std::fmt::Display;

use tokio_util::sync::CancellationToken;

use crate::toast::{GENERIC_ERROR, Toast, Toasts};
use crate::validation::ValidationErrors;

/// Shell state shared by the pages: whether the search box is open, which
/// filter dropdown is showing, and pending toasts.
///
/// Pages receive `&mut PageContext` instead of reaching for global state.
/// The context also owns the cancellation token that page loads hang off;
/// [`reset`](PageContext::reset) on navigation cancels them.
#[derive(Debug, Default)]
pub struct PageContext {
    search_open: bool,
    open_dropdown: Option<String>,
    pub toasts: Toasts,
    loads: CancellationToken,
}

impl PageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_search_open(&self) -> bool {
        self.search_open
    }

    pub fn open_search(&mut self) {
        self.search_open = true;
        self.open_dropdown = None;
    }

    pub fn close_search(&mut self) {
        self.search_open = false;
    }

    pub fn toggle_search(&mut self) {
        if self.search_open {
            self.close_search();
        } else {
            self.open_search();
        }
    }

    /// The filter dropdown currently open, by field key.
    pub fn open_dropdown(&self) -> Option<&str> {
        self.open_dropdown.as_deref()
    }

    /// Open the dropdown for `key`, closing any other. Opening the one
    /// already open closes it.
    pub fn toggle_dropdown(&mut self, key: &str) {
        if self.open_dropdown.as_deref() == Some(key) {
            self.open_dropdown = None;
        } else {
            self.open_dropdown = Some(key.to_string());
        }
    }

    pub fn close_dropdown(&mut self) {
        self.open_dropdown = None;
    }

    pub fn toast(&mut self, toast: impl Into<Toast>) {
        self.toasts.push(toast);
    }

    /// Log a failed call and show the generic error toast.
    pub fn report_error(&mut self, context: &str, err: impl Display) {
        log::error!("{}: {}", context, err);
        self.toasts.push(Toast::error(GENERIC_ERROR));
    }

    /// Show the first field error of a rejected form.
    pub fn report_invalid(&mut self, errors: &ValidationErrors) {
        if let Some(first) = errors.first() {
            self.toasts.push(Toast::warning(first.message.clone()));
        }
    }

    /// Token for loads started by the current page.
    pub fn load_token(&self) -> CancellationToken {
        self.loads.child_token()
    }

    /// Leave the page: cancel its loads and close transient UI.
    pub fn reset(&mut self) {
        self.loads.cancel();
        self.loads = CancellationToken::new();
        self.search_open = false;
        self.open_dropdown = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toast::ToastLevel;
    use crate::validation::FieldError;

    #[test]
    fn test_search_closes_dropdown() {
        let mut cx = PageContext::new();
        cx.toggle_dropdown("status");
        assert_eq!(cx.open_dropdown(), Some("status"));
        cx.toggle_search();
        assert!(cx.is_search_open());
        assert_eq!(cx.open_dropdown(), None);
    }

    #[test]
    fn test_toggle_dropdown() {
        let mut cx = PageContext::new();
        cx.toggle_dropdown("status");
        cx.toggle_dropdown("month");
        assert_eq!(cx.open_dropdown(), Some("month"));
        cx.toggle_dropdown("month");
        assert_eq!(cx.open_dropdown(), None);
    }

    #[test]
    fn test_report_error_uses_generic_message() {
        let mut cx = PageContext::new();
        cx.report_error("loading payroll", "HTTP 500");
        let toast = cx.toasts.latest().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.message, GENERIC_ERROR);
    }

    #[test]
    fn test_report_invalid_shows_first_error() {
        let mut cx = PageContext::new();
        let errors = ValidationErrors(vec![
            FieldError::new("name", "Name is required"),
            FieldError::new("email", "Invalid email"),
        ]);
        cx.report_invalid(&errors);
        assert_eq!(cx.toasts.latest().unwrap().message, "Name is required");
    }

    #[test]
    fn test_reset_cancels_loads() {
        let mut cx = PageContext::new();
        let token = cx.load_token();
        cx.reset();
        assert!(token.is_cancelled());
        assert!(!cx.load_token().is_cancelled());
    }
}
