use thiserror::Error;

/// Errores de la aplicación (demo y facade).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error del wizard: {0}")]
    Wizard(#[from] onboard_core::WizardError),
    #[error("Definición de flow inválida: {0}")]
    Flow(#[from] onboard_core::FlowError),
    #[error("Error de persistencia: {0}")]
    Persistence(#[from] onboard_persistence::PersistenceError),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
}
