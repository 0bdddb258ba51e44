pub mod store;
pub mod types;

pub use store::EventLog;
pub use types::{HydrationSource, WizardEvent, WizardEventKind};
