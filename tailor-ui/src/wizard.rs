//! Multi-step forms.

use crate::validation::{Draft, ValidationErrors, ValidationResult, submit};

/// A draft filled in over several steps.
pub trait StepForm {
    /// Step titles, in order. Must not be empty.
    const STEPS: &'static [&'static str];

    /// Validate the fields that belong to `step`.
    fn validate_step(&self, step: usize) -> ValidationResult;
}

/// Step counter over a [`StepForm`].
///
/// Moving forward requires the current step to validate. Moving back is
/// always allowed. Both ends are bounded.
#[derive(Debug, Clone)]
pub struct Wizard<F> {
    form: F,
    step: usize,
}

impl<F: StepForm> Wizard<F> {
    pub fn new(form: F) -> Self {
        Self { form, step: 0 }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn step_count(&self) -> usize {
        F::STEPS.len()
    }

    pub fn title(&self) -> &'static str {
        F::STEPS.get(self.step).copied().unwrap_or_default()
    }

    pub fn is_first(&self) -> bool {
        self.step == 0
    }

    pub fn is_last(&self) -> bool {
        self.step + 1 >= F::STEPS.len()
    }

    /// "Step 2 of 3: Bundles"
    pub fn progress(&self) -> String {
        format!(
            "Step {} of {}: {}",
            self.step + 1,
            self.step_count(),
            self.title()
        )
    }

    /// Advance if the current step validates. Returns `Ok(false)` on the
    /// last step.
    pub fn next(&mut self) -> Result<bool, ValidationErrors> {
        self.form.validate_step(self.step).into_result()?;
        if self.is_last() {
            return Ok(false);
        }
        self.step += 1;
        log::debug!("wizard step {} -> {}", self.step - 1, self.step);
        Ok(true)
    }

    pub fn back(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.step -= 1;
        true
    }

    /// Validate every step and produce the payload.
    ///
    /// Only allowed from the last step. On failure the wizard moves to the
    /// first step that does not validate.
    pub fn finish(&mut self) -> Result<F::Output, ValidationErrors>
    where
        F: Draft,
    {
        for step in 0..F::STEPS.len() {
            if let Err(errors) = self.form.validate_step(step).into_result() {
                self.step = step;
                return Err(errors);
            }
        }
        submit(&self.form)
    }

    pub fn into_form(self) -> F {
        self.form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{FieldError, Schema};

    #[derive(Debug, Default, Clone)]
    struct ShipmentForm {
        buyer: String,
        cartons: String,
    }

    impl StepForm for ShipmentForm {
        const STEPS: &'static [&'static str] = &["Buyer", "Cartons", "Review"];

        fn validate_step(&self, step: usize) -> ValidationResult {
            match step {
                0 => Schema::new()
                    .field("buyer", |f: &Self| f.buyer.clone())
                    .required("Buyer is required")
                    .validate(self),
                1 => Schema::new()
                    .field("cartons", |f: &Self| f.cartons.clone())
                    .required("Cartons are required")
                    .numeric("Cartons must be a number")
                    .validate(self),
                _ => ValidationResult::Valid,
            }
        }
    }

    impl Draft for ShipmentForm {
        type Output = (String, u32);

        fn schema() -> Schema<Self> {
            Schema::new()
        }

        fn build(&self) -> Result<Self::Output, FieldError> {
            let cartons = self
                .cartons
                .parse()
                .map_err(|_| FieldError::new("cartons", "Cartons must be whole"))?;
            Ok((self.buyer.clone(), cartons))
        }
    }

    #[test]
    fn test_next_requires_valid_step() {
        let mut wizard = Wizard::new(ShipmentForm::default());
        let err = wizard.next().unwrap_err();
        assert_eq!(err.first().unwrap().field, "buyer");
        assert_eq!(wizard.step(), 0);

        wizard.form_mut().buyer = "H&M".into();
        assert!(wizard.next().unwrap());
        assert_eq!(wizard.progress(), "Step 2 of 3: Cartons");
    }

    #[test]
    fn test_bounded_at_both_ends() {
        let mut wizard = Wizard::new(ShipmentForm {
            buyer: "Zara".into(),
            cartons: "12".into(),
        });
        assert!(!wizard.back());
        assert!(wizard.next().unwrap());
        assert!(wizard.next().unwrap());
        assert!(wizard.is_last());
        assert!(!wizard.next().unwrap());
        assert_eq!(wizard.step(), 2);
        assert!(wizard.back());
        assert_eq!(wizard.step(), 1);
    }

    #[test]
    fn test_finish_returns_to_failing_step() {
        let mut wizard = Wizard::new(ShipmentForm {
            buyer: "Zara".into(),
            cartons: "12".into(),
        });
        wizard.next().unwrap();
        wizard.next().unwrap();
        wizard.form_mut().cartons.clear();
        assert!(wizard.finish().is_err());
        assert_eq!(wizard.step(), 1);

        wizard.form_mut().cartons = "12".into();
        assert_eq!(wizard.finish().unwrap(), ("Zara".to_string(), 12));
    }
}
