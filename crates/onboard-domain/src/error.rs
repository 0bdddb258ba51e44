use onboard_core::FlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("unknown region '{0}'")]
    UnknownRegion(String),
    #[error("unknown applicant type '{0}'")]
    UnknownApplicantType(String),
    #[error(transparent)]
    Flow(#[from] FlowError),
}
