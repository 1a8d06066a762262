//! Cutting-job wizard page.

use crossterm::event::{KeyCode, KeyEvent};
use tailor_ui::prelude::*;

use super::Page;
use crate::cutting::{CuttingJob, CuttingJobForm, STEP_FIELDS};
use crate::terminal::{Style, StyledLine};

pub struct CuttingPage {
    wizard: Wizard<CuttingJobForm>,
    focus: usize,
    errors: ValidationResult,
    jobs: Vec<CuttingJob>,
}

impl CuttingPage {
    pub fn new() -> Self {
        Self {
            wizard: Wizard::new(CuttingJobForm::default()),
            focus: 0,
            errors: ValidationResult::Valid,
            jobs: Vec::new(),
        }
    }

    fn fields(&self) -> &'static [(&'static str, &'static str)] {
        STEP_FIELDS.get(self.wizard.step()).copied().unwrap_or_default()
    }

    fn focused(&self) -> Option<&'static str> {
        self.fields().get(self.focus).map(|(key, _)| *key)
    }

    fn show_errors(&mut self, errors: &ValidationErrors, cx: &mut PageContext) {
        cx.report_invalid(errors);
        self.errors = ValidationResult::Invalid(errors.errors().to_vec());
        if let Some(pos) = errors
            .first()
            .and_then(|e| self.fields().iter().position(|(key, _)| *key == e.field))
        {
            self.focus = pos;
        }
    }

    fn advance(&mut self, cx: &mut PageContext) {
        if !self.wizard.is_last() {
            match self.wizard.next() {
                Ok(_) => {
                    self.focus = 0;
                    self.errors = ValidationResult::Valid;
                }
                Err(errors) => self.show_errors(&errors, cx),
            }
            return;
        }

        match self.wizard.finish() {
            Ok(job) => {
                log::info!("cutting job {} created for {}", job.job_no, job.style_no);
                cx.toast(Toast::success(format!("Cutting job {} created", job.job_no)));
                self.jobs.push(job);
                self.wizard = Wizard::new(CuttingJobForm::default());
                self.focus = 0;
                self.errors = ValidationResult::Valid;
            }
            Err(errors) => {
                self.focus = 0;
                self.show_errors(&errors, cx);
            }
        }
    }

    fn review(&self) -> Vec<StyledLine> {
        let form = self.wizard.form();
        STEP_FIELDS
            .iter()
            .flat_map(|fields| fields.iter())
            .map(|(key, label)| StyledLine::plain(format!("  {:<18} {}", label, form.value(key))))
            .collect()
    }
}

impl Default for CuttingPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for CuttingPage {
    fn title(&self) -> &'static str {
        "Cutting"
    }

    fn activate(&mut self, _cx: &mut PageContext) {}

    fn handle_key(&mut self, key: KeyEvent, cx: &mut PageContext) {
        let fields = self.fields().len();
        match key.code {
            KeyCode::Enter => self.advance(cx),
            KeyCode::Esc => {
                if self.wizard.back() {
                    self.focus = 0;
                    self.errors = ValidationResult::Valid;
                }
            }
            KeyCode::Tab | KeyCode::Down if fields > 0 => self.focus = (self.focus + 1) % fields,
            KeyCode::BackTab | KeyCode::Up if fields > 0 => {
                self.focus = (self.focus + fields - 1) % fields;
            }
            KeyCode::Backspace => {
                if let Some(value) = self.focused().and_then(|k| self.wizard.form_mut().value_mut(k)) {
                    value.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(value) = self.focused().and_then(|k| self.wizard.form_mut().value_mut(k)) {
                    value.push(c);
                }
            }
            _ => {}
        }
    }

    fn render(&self, _cx: &PageContext) -> Vec<StyledLine> {
        let mut lines = vec![
            StyledLine::new(Style::Title, "New cutting job"),
            StyledLine::new(Style::Muted, self.wizard.progress()),
            StyledLine::blank(),
        ];

        if self.wizard.is_last() {
            lines.extend(self.review());
        }
        for (i, (key, label)) in self.fields().iter().enumerate() {
            let focused = i == self.focus;
            let caret = if focused { "▏" } else { "" };
            lines.push(StyledLine::new(
                if focused { Style::Input } else { Style::Normal },
                format!("  {:<18} {}{}", label, self.wizard.form().value(key), caret),
            ));
            if let Some(message) = self.errors.message_for(key) {
                lines.push(StyledLine::new(Style::Error, format!("  {:<18} {}", "", message)));
            }
        }

        lines.push(StyledLine::blank());
        let hint = if self.wizard.is_last() {
            "Enter create job · Esc back"
        } else {
            "Enter next · Esc back · Tab next field"
        };
        lines.push(StyledLine::new(Style::Muted, hint));

        if !self.jobs.is_empty() {
            lines.push(StyledLine::blank());
            lines.push(StyledLine::new(Style::Header, "Created this session"));
            for job in &self.jobs {
                lines.push(StyledLine::plain(format!(
                    "  {}  {}  {}  {} plies  {} pcs/lay",
                    job.job_no,
                    job.style_no,
                    job.buyer,
                    job.plies,
                    job.pieces_per_lay()
                )));
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn press(page: &mut CuttingPage, cx: &mut PageContext, code: KeyCode) {
        page.handle_key(KeyEvent::new(code, KeyModifiers::NONE), cx);
    }

    fn fill(page: &mut CuttingPage, cx: &mut PageContext, values: &[&str]) {
        for value in values {
            for ch in value.chars() {
                press(page, cx, KeyCode::Char(ch));
            }
            press(page, cx, KeyCode::Tab);
        }
    }

    #[test]
    fn test_walk_through_wizard() {
        let mut cx = PageContext::new();
        let mut page = CuttingPage::new();

        press(&mut page, &mut cx, KeyCode::Enter);
        assert_eq!(page.wizard.step(), 0);
        assert_eq!(cx.toasts.latest().unwrap().message, "Style no. is required");

        fill(&mut page, &mut cx, &["ST-2001", "Zara", "600"]);
        press(&mut page, &mut cx, KeyCode::Enter);
        assert_eq!(page.wizard.step(), 1);

        fill(&mut page, &mut cx, &["Twill", "Khaki", "5.2"]);
        press(&mut page, &mut cx, KeyCode::Enter);
        fill(&mut page, &mut cx, &["50", "M:2, L:2"]);
        press(&mut page, &mut cx, KeyCode::Enter);
        assert!(page.wizard.is_last());

        press(&mut page, &mut cx, KeyCode::Enter);
        assert_eq!(page.jobs.len(), 1);
        assert_eq!(page.jobs[0].pieces_per_lay(), 200);
        assert_eq!(page.wizard.step(), 0);
        assert!(cx.toasts.latest().unwrap().message.starts_with("Cutting job CJ-"));
    }

    #[test]
    fn test_back_keeps_values() {
        let mut cx = PageContext::new();
        let mut page = CuttingPage::new();
        fill(&mut page, &mut cx, &["ST-2001", "Zara", "600"]);
        press(&mut page, &mut cx, KeyCode::Enter);
        press(&mut page, &mut cx, KeyCode::Esc);
        assert_eq!(page.wizard.step(), 0);
        assert_eq!(page.wizard.form().buyer, "Zara");
        press(&mut page, &mut cx, KeyCode::Esc);
        assert_eq!(page.wizard.step(), 0);
    }
}
