//! ErrorIndex: mapa plano path → mensaje.
//!
//! Es la única fuente de "este campo es inválido". Da igual si los errores
//! vienen de una validación local o de la respuesta del servidor: el último
//! que llama a `replace_all` gana. Nunca se muta parcialmente.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorIndex {
    entries: BTreeMap<String, String>,
}

impl ErrorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mensaje para el path exacto, si existe.
    pub fn lookup(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    /// Variante para componentes de campo: sin path no hay validación
    /// posible y el campo simplemente no reporta error.
    pub fn lookup_field(&self, path: Option<&str>) -> Option<&str> {
        path.and_then(|p| self.lookup(p))
    }

    /// Sustituye todo el contenido.
    pub fn replace_all<I, K, V>(&mut self, mapping: I)
        where I: IntoIterator<Item = (K, V)>,
              K: Into<String>,
              V: Into<String>
    {
        self.entries = mapping.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Errores bajo `prefix` respetando límites de segmento: `kyc` incluye
    /// `kyc.pep` pero no `kycExtra.pep`.
    pub fn errors_under<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.iter().filter(move |(path, _)| {
                       path.strip_prefix(prefix)
                           .map(|rest| rest.is_empty() || rest.starts_with('.'))
                           .unwrap_or(false)
                   })
    }

    /// Indicador por step (badge de la navegación).
    pub fn has_errors_under(&self, prefix: &str) -> bool {
        self.errors_under(prefix).next().is_some()
    }
}
