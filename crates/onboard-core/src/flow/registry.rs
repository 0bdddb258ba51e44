//! FlowRegistry: tabla `(region, applicantType) → Flow`.
//!
//! La búsqueda es por coincidencia exacta. Una combinación desconocida es
//! `WizardError::FlowNotFound`: elegir otro flow por defecto mezclaría el
//! template de un negocio con los datos de otro.
use indexmap::IndexMap;

use super::{Flow, FlowId};
use crate::errors::{FlowError, WizardError};

#[derive(Debug, Clone, Default)]
pub struct FlowRegistry {
    flows: IndexMap<FlowId, Flow>,
}

impl FlowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un flow nuevo. El conjunto es abierto: cualquier crate puede
    /// añadir combinaciones.
    pub fn register(&mut self, flow: Flow) -> Result<(), FlowError> {
        if self.flows.contains_key(flow.id()) {
            return Err(FlowError::AlreadyRegistered(flow.id().clone()));
        }
        self.flows.insert(flow.id().clone(), flow);
        Ok(())
    }

    /// Variante encadenable de `register`.
    pub fn with(mut self, flow: Flow) -> Result<Self, FlowError> {
        self.register(flow)?;
        Ok(self)
    }

    pub fn resolve(&self, region: &str, applicant_type: &str) -> Result<&Flow, WizardError> {
        self.resolve_id(&FlowId::new(region, applicant_type))
    }

    pub fn resolve_id(&self, id: &FlowId) -> Result<&Flow, WizardError> {
        self.flows.get(id).ok_or_else(|| WizardError::FlowNotFound { region: id.region().to_string(),
                                                                     applicant_type: id.applicant_type().to_string() })
    }

    pub fn contains(&self, id: &FlowId) -> bool {
        self.flows.contains_key(id)
    }

    /// Flows en orden de registro.
    pub fn flows(&self) -> impl Iterator<Item = &Flow> {
        self.flows.values()
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}
