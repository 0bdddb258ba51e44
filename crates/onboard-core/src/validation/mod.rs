//! Enrutado de errores de validación por path.

pub mod index;
pub mod validator;

pub use index::ErrorIndex;
pub use validator::{RequiredPaths, Validator};
