//! REST operations.

mod crud;
mod envelope;

pub use crud::Service;
pub use envelope::Envelope;
