// registry.rs
use onboard_core::{Flow, FlowError, FlowRegistry};

use crate::flows::{foreign_corporate, foreign_individual, local_corporate, local_individual};
use crate::ids::{ApplicantType, Region};

/// Flow para una combinación conocida. Las cuatro combinaciones existen, así
/// que sólo puede fallar si una definición es inválida.
pub fn flow_for(region: Region, applicant_type: ApplicantType) -> Result<Flow, FlowError> {
    match (region, applicant_type) {
        (Region::Local, ApplicantType::Individual) => local_individual::flow(),
        (Region::Local, ApplicantType::Corporate) => local_corporate::flow(),
        (Region::Foreign, ApplicantType::Individual) => foreign_individual::flow(),
        (Region::Foreign, ApplicantType::Corporate) => foreign_corporate::flow(),
    }
}

/// Registry con los flows que se distribuyen. Sigue abierto: el llamador
/// puede registrar más con `FlowRegistry::register`.
pub fn default_registry() -> Result<FlowRegistry, FlowError> {
    let mut registry = FlowRegistry::new();
    for region in Region::ALL {
        for applicant_type in ApplicantType::ALL {
            registry.register(flow_for(region, applicant_type)?)?;
        }
    }
    Ok(registry)
}
