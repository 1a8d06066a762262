use super::result::{FieldError, ValidationErrors};
use super::schema::Schema;

/// Typed form state for a record that is not yet valid.
///
/// A draft holds the raw form input. [`submit`] runs the draft's schema and
/// only calls [`build`](Draft::build) when every field passed, so `build`
/// may assume the schema's rules hold.
pub trait Draft: Sized {
    /// The payload produced by a valid draft.
    type Output;

    fn schema() -> Schema<Self>;

    /// Convert the validated draft. Errors here are field errors the schema
    /// cannot express, such as cross-field checks.
    fn build(&self) -> Result<Self::Output, FieldError>;
}

/// Validate `draft` and convert it into its payload.
pub fn submit<D: Draft>(draft: &D) -> Result<D::Output, ValidationErrors> {
    D::schema().validate(draft).into_result()?;
    draft.build().map_err(ValidationErrors::from)
}
