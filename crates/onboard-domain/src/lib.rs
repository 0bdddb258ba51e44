// onboard-domain library entry point
pub mod error;
pub mod flows;
pub mod ids;
pub mod registry;

pub use error::DomainError;
pub use ids::{flow_id, ApplicantType, Region, CORPORATE, FOREIGN, INDIVIDUAL, LOCAL};
pub use registry::{default_registry, flow_for};
