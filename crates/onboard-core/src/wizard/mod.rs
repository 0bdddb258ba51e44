//! Orquestación de una sesión del wizard.

pub mod controller;
pub mod state;

pub use controller::{SubmitOutcome, UpdateOutcome, WizardController};
pub use state::{RouteParams, WizardState};
