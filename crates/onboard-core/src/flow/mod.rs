//! Flows: definición inmutable y registro por `(region, applicantType)`.

mod definition;
mod registry;

pub use definition::{Flow, FlowBuilder, FlowId, StepDef};
pub use registry::FlowRegistry;
