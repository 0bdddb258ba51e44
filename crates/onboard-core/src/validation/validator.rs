//! Validación local (cliente). Las reglas de negocio de cada formulario viven
//! fuera del core; aquí sólo está el contrato y un validador genérico de
//! campos requeridos.
use std::collections::BTreeMap;

use crate::constants::REQUIRED_MESSAGE;
use crate::document::{get_str, Node};

/// Produce el mapa completo path → mensaje para un documento. El controller
/// lo vuelca en el `ErrorIndex` con `replace_all`.
pub trait Validator {
    fn validate(&self, doc: &Node) -> BTreeMap<String, String>;
}

/// Marca como error todo path ausente, `null` o texto vacío.
#[derive(Debug, Clone)]
pub struct RequiredPaths {
    paths: Vec<String>,
    message: String,
}

impl RequiredPaths {
    pub fn new<I, P>(paths: I) -> Self
        where I: IntoIterator<Item = P>,
              P: Into<String>
    {
        Self { paths: paths.into_iter().map(Into::into).collect(),
               message: REQUIRED_MESSAGE.to_string() }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Validator for RequiredPaths {
    fn validate(&self, doc: &Node) -> BTreeMap<String, String> {
        self.paths
            .iter()
            .filter(|p| get_str(doc, p).map_or(true, Node::is_blank))
            .map(|p| (p.clone(), self.message.clone()))
            .collect()
    }
}
