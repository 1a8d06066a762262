//! Schema builder for validating drafts.

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

use super::result::{FieldError, ValidationResult};

type Accessor<D> = Arc<dyn Fn(&D) -> String + Send + Sync>;
type Rule = Box<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

struct FieldEntry<D> {
    name: String,
    accessor: Accessor<D>,
    rules: Vec<Rule>,
}

/// Validation rules for a draft type `D`.
///
/// Each field is read from the draft as text and checked against its rules
/// in order; the first failing rule per field is reported.
///
/// # Example
///
/// ```
/// use tailor_ui::validation::Schema;
///
/// struct EmployeeDraft {
///     name: String,
///     email: String,
/// }
///
/// let schema = Schema::<EmployeeDraft>::new()
///     .field("name", |d| d.name.clone())
///         .required("Name is required")
///     .field("email", |d| d.email.clone())
///         .email("Please enter a valid email");
///
/// let draft = EmployeeDraft { name: String::new(), email: "a@b.co".into() };
/// let result = schema.validate(&draft);
/// assert_eq!(result.message_for("name"), Some("Name is required"));
/// ```
pub struct Schema<D> {
    fields: Vec<FieldEntry<D>>,
}

impl<D> Default for Schema<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Schema<D> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Start rules for a field read by `accessor`.
    pub fn field<F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&D) -> String + Send + Sync + 'static,
    {
        self.fields.push(FieldEntry {
            name: name.into(),
            accessor: Arc::new(accessor),
            rules: Vec::new(),
        });
        self
    }

    /// Names of the fields in schema order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Add a custom rule to the most recent field.
    pub fn rule<F>(mut self, check: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        let msg = msg.into();
        match self.fields.last_mut() {
            Some(field) => field
                .rules
                .push(Box::new(move |v| if check(v) { Ok(()) } else { Err(msg.clone()) })),
            None => log::warn!("schema rule '{}' added before any field; ignored", msg),
        }
        self
    }

    /// Non-blank.
    pub fn required(self, msg: impl Into<String>) -> Self {
        self.rule(|v| !v.trim().is_empty(), msg)
    }

    /// At least `min` characters. Empty values pass; pair with `required`.
    pub fn min_length(self, min: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.is_empty() || v.chars().count() >= min, msg)
    }

    /// At most `max` characters.
    pub fn max_length(self, max: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.chars().count() <= max, msg)
    }

    /// Matches a regular expression. Empty values pass.
    ///
    /// An invalid pattern makes the rule fail every non-empty value.
    pub fn pattern(self, pattern: &str, msg: impl Into<String>) -> Self {
        match Regex::new(pattern) {
            Ok(re) => self.rule(move |v| v.is_empty() || re.is_match(v), msg),
            Err(e) => {
                log::error!("invalid schema pattern {:?}: {}", pattern, e);
                self.rule(|v| v.is_empty(), msg)
            }
        }
    }

    /// A valid email address. Empty values pass.
    pub fn email(self, msg: impl Into<String>) -> Self {
        self.rule(
            |v| v.is_empty() || email_address::EmailAddress::is_valid(v),
            msg,
        )
    }

    /// Parses as a decimal number. Empty values pass.
    pub fn numeric(self, msg: impl Into<String>) -> Self {
        self.rule(|v| v.is_empty() || Decimal::from_str(v.trim()).is_ok(), msg)
    }

    /// A number within `min..=max`. Empty values pass.
    pub fn range(self, min: Decimal, max: Decimal, msg: impl Into<String>) -> Self {
        self.rule(
            move |v| {
                v.is_empty()
                    || Decimal::from_str(v.trim()).is_ok_and(|n| n >= min && n <= max)
            },
            msg,
        )
    }

    /// A `YYYY-MM-DD` date. Empty values pass.
    pub fn date(self, msg: impl Into<String>) -> Self {
        self.rule(
            |v| v.is_empty() || NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").is_ok(),
            msg,
        )
    }

    /// One of the given options. Empty values pass.
    pub fn one_of(self, options: &[&str], msg: impl Into<String>) -> Self {
        let options: Vec<String> = options.iter().map(|s| s.to_string()).collect();
        self.rule(move |v| v.is_empty() || options.iter().any(|o| o == v), msg)
    }

    /// Run every rule against `draft`.
    pub fn validate(&self, draft: &D) -> ValidationResult {
        let errors: Vec<FieldError> = self
            .fields
            .iter()
            .filter_map(|field| {
                let value = (field.accessor)(draft);
                field
                    .rules
                    .iter()
                    .find_map(|rule| rule(&value).err())
                    .map(|message| FieldError::new(field.name.clone(), message))
            })
            .collect();

        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            log::debug!("draft rejected: {} field error(s)", errors.len());
            ValidationResult::Invalid(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct OrderDraft {
        style: String,
        quantity: String,
        ship_date: String,
        buyer_email: String,
    }

    fn schema() -> Schema<OrderDraft> {
        Schema::new()
            .field("style", |d: &OrderDraft| d.style.clone())
            .required("Style is required")
            .pattern(r"^ST-\d{3}$", "Style must look like ST-123")
            .field("quantity", |d: &OrderDraft| d.quantity.clone())
            .required("Quantity is required")
            .numeric("Quantity must be a number")
            .range(Decimal::ONE, Decimal::from(10_000), "Quantity out of range")
            .field("ship_date", |d: &OrderDraft| d.ship_date.clone())
            .date("Use YYYY-MM-DD")
            .field("buyer_email", |d: &OrderDraft| d.buyer_email.clone())
            .email("Invalid email")
    }

    #[test]
    fn test_valid_draft() {
        let draft = OrderDraft {
            style: "ST-101".into(),
            quantity: "500".into(),
            ship_date: "2024-06-30".into(),
            buyer_email: "buyer@example.com".into(),
        };
        assert!(schema().validate(&draft).is_valid());
    }

    #[test]
    fn test_first_failing_rule_per_field() {
        let draft = OrderDraft::default();
        let result = schema().validate(&draft);
        assert_eq!(result.errors().len(), 2);
        assert_eq!(result.message_for("style"), Some("Style is required"));
        assert_eq!(result.message_for("quantity"), Some("Quantity is required"));
        assert_eq!(result.message_for("ship_date"), None);
    }

    #[test]
    fn test_range_and_pattern() {
        let draft = OrderDraft {
            style: "X1".into(),
            quantity: "0".into(),
            ..Default::default()
        };
        let result = schema().validate(&draft);
        assert_eq!(
            result.message_for("style"),
            Some("Style must look like ST-123")
        );
        assert_eq!(result.message_for("quantity"), Some("Quantity out of range"));
    }

    #[test]
    fn test_errors_in_schema_order() {
        let draft = OrderDraft {
            ship_date: "30/06/2024".into(),
            buyer_email: "nope".into(),
            ..Default::default()
        };
        let fields: Vec<String> = schema()
            .validate(&draft)
            .errors()
            .iter()
            .map(|e| e.field.clone())
            .collect();
        assert_eq!(fields, vec!["style", "quantity", "ship_date", "buyer_email"]);
    }

    #[test]
    fn test_invalid_pattern_rejects_values() {
        let schema = Schema::<OrderDraft>::new()
            .field("style", |d| d.style.clone())
            .pattern("(", "bad");
        let draft = OrderDraft {
            style: "anything".into(),
            ..Default::default()
        };
        assert!(schema.validate(&draft).is_invalid());
    }
}
