//! Add/edit sheet over a typed draft.

use std::marker::PhantomData;

use tailor_ui::prelude::*;

use crate::terminal::{Style, StyledLine};

/// A draft whose fields are edited as text, one field at a time.
pub trait FormDraft: Draft + Default + Clone + Send + 'static {
    /// `(field key, label)` in display order. Keys match the schema's
    /// field names so errors land next to their input.
    const FIELDS: &'static [(&'static str, &'static str)];

    fn value(&self, key: &str) -> &str;

    fn value_mut(&mut self, key: &str) -> Option<&mut String>;
}

/// Draft for pages without forms. Never submits.
pub struct ReadOnly<R>(PhantomData<fn() -> R>);

impl<R> Default for ReadOnly<R> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<R> Clone for ReadOnly<R> {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl<R> Draft for ReadOnly<R> {
    type Output = R;

    fn schema() -> Schema<Self> {
        Schema::new()
    }

    fn build(&self) -> Result<R, FieldError> {
        Err(FieldError::new("", "This page is read-only"))
    }
}

impl<R: 'static> FormDraft for ReadOnly<R> {
    const FIELDS: &'static [(&'static str, &'static str)] = &[];

    fn value(&self, _key: &str) -> &str {
        ""
    }

    fn value_mut(&mut self, _key: &str) -> Option<&mut String> {
        None
    }
}

/// The open sheet: a draft, the focused field and the last validation.
#[derive(Clone)]
pub struct FormSheet<D> {
    draft: D,
    focus: usize,
    errors: ValidationResult,
    editing: bool,
}

impl<D: FormDraft> FormSheet<D> {
    /// Sheet for a new record.
    pub fn new(draft: D) -> Self {
        Self {
            draft,
            focus: 0,
            errors: ValidationResult::Valid,
            editing: false,
        }
    }

    /// Sheet prefilled from an existing record.
    pub fn edit(draft: D) -> Self {
        Self {
            editing: true,
            ..Self::new(draft)
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    #[cfg(test)]
    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn focused(&self) -> Option<&'static str> {
        D::FIELDS.get(self.focus).map(|(key, _)| *key)
    }

    pub fn focus_next(&mut self) {
        if !D::FIELDS.is_empty() {
            self.focus = (self.focus + 1) % D::FIELDS.len();
        }
    }

    pub fn focus_previous(&mut self) {
        if !D::FIELDS.is_empty() {
            self.focus = (self.focus + D::FIELDS.len() - 1) % D::FIELDS.len();
        }
    }

    pub fn input(&mut self, ch: char) {
        if let Some(value) = self.focused().and_then(|key| self.draft.value_mut(key)) {
            value.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(value) = self.focused().and_then(|key| self.draft.value_mut(key)) {
            value.pop();
        }
    }

    /// Validate and build. On failure the errors are kept for inline
    /// display and focus jumps to the first failing field.
    pub fn submit(&mut self) -> Result<D::Output, ValidationErrors> {
        match submit(&self.draft) {
            Ok(output) => {
                self.errors = ValidationResult::Valid;
                Ok(output)
            }
            Err(errors) => {
                if let Some(pos) = errors
                    .first()
                    .and_then(|e| D::FIELDS.iter().position(|(key, _)| *key == e.field))
                {
                    self.focus = pos;
                }
                self.errors = ValidationResult::Invalid(errors.0.clone());
                Err(errors)
            }
        }
    }

    pub fn render(&self, title: &str) -> Vec<StyledLine> {
        let mut lines = vec![StyledLine::new(Style::Title, title)];
        let label_width = D::FIELDS.iter().map(|(_, l)| l.len()).max().unwrap_or(0);

        for (i, (key, label)) in D::FIELDS.iter().enumerate() {
            let focused = i == self.focus;
            let caret = if focused { "▏" } else { "" };
            let text = format!(
                "  {:>width$}: {}{}",
                label,
                self.draft.value(key),
                caret,
                width = label_width
            );
            lines.push(StyledLine::new(
                if focused { Style::Input } else { Style::Normal },
                text,
            ));
            if let Some(message) = self.errors.message_for(key) {
                lines.push(StyledLine::new(
                    Style::Error,
                    format!("  {:>width$}  {}", "", message, width = label_width),
                ));
            }
        }

        lines.push(StyledLine::blank());
        lines.push(StyledLine::new(
            Style::Muted,
            "Tab/↓ next field · ↑ previous · Enter save · Esc cancel",
        ));
        lines
    }
}
