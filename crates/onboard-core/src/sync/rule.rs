//! `AutoSyncRule`: espejo unidireccional fuentes → destino.
//!
//! Una regla es pura: dado el documento calcula el valor deseado para su
//! destino. Todo el estado ("último valor auto-escrito") vive en el
//! `AutoSyncEngine`.
use std::fmt;
use std::sync::Arc;

use crate::document::{get, Node, Path};
use crate::errors::PathError;

/// Deriva el valor del destino a partir de los valores de las fuentes
/// (en el orden declarado; `None` si la fuente no existe).
pub type DeriveFn = Arc<dyn Fn(&[Option<&Node>]) -> Node + Send + Sync>;

/// Predicado de habilitación evaluado sobre el documento completo.
pub type EnabledFn = Arc<dyn Fn(&Node) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct AutoSyncRule {
    name: String,
    sources: Vec<Path>,
    target: Path,
    derive: DeriveFn,
    enabled: Option<EnabledFn>,
}

impl AutoSyncRule {
    /// Regla genérica.
    pub fn derive<F>(sources: &[&str], target: &str, f: F) -> Result<Self, PathError>
        where F: Fn(&[Option<&Node>]) -> Node + Send + Sync + 'static
    {
        let sources = sources.iter().map(|s| Path::parse(s)).collect::<Result<Vec<_>, _>>()?;
        let target = Path::parse(target)?;
        let name = format!("{} -> {}",
                           sources.iter().map(Path::as_str).collect::<Vec<_>>().join("+"),
                           target);
        Ok(Self { name,
                  sources,
                  target,
                  derive: Arc::new(f),
                  enabled: None })
    }

    /// Copia literal de una fuente. Fuente ausente → texto vacío.
    pub fn mirror(source: &str, target: &str) -> Result<Self, PathError> {
        Self::derive(&[source], target, |values| {
            values.first()
                  .copied()
                  .flatten()
                  .cloned()
                  .unwrap_or_else(Node::empty_text)
        })
    }

    /// Concatena las representaciones textuales no vacías de las fuentes.
    pub fn join(sources: &[&str], target: &str, separator: &'static str) -> Result<Self, PathError> {
        Self::derive(sources, target, move |values| {
            let parts: Vec<String> = values.iter()
                                           .filter_map(|v| v.and_then(Node::display_text))
                                           .map(|s| s.trim().to_string())
                                           .filter(|s| !s.is_empty())
                                           .collect();
            Node::text(parts.join(separator))
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn enabled_when<F>(mut self, f: F) -> Self
        where F: Fn(&Node) -> bool + Send + Sync + 'static
    {
        self.enabled = Some(Arc::new(f));
        self
    }

    /// Habilitada sólo mientras `flag` sea el booleano `true` (p.ej. el
    /// toggle de solicitante conjunto).
    pub fn enabled_when_flag(self, flag: &str) -> Result<Self, PathError> {
        let flag = Path::parse(flag)?;
        Ok(self.enabled_when(move |doc| get(doc, &flag).and_then(Node::as_bool).unwrap_or(false)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sources(&self) -> &[Path] {
        &self.sources
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn is_enabled(&self, doc: &Node) -> bool {
        self.enabled.as_ref().map_or(true, |f| f(doc))
    }

    /// Valor deseado para el destino; vacío si la regla está deshabilitada.
    pub fn desired(&self, doc: &Node) -> Node {
        if !self.is_enabled(doc) {
            return Node::empty_text();
        }
        let values: Vec<Option<&Node>> = self.sources.iter().map(|p| get(doc, p)).collect();
        (self.derive)(&values)
    }
}

impl fmt::Debug for AutoSyncRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoSyncRule")
         .field("name", &self.name)
         .field("sources", &self.sources)
         .field("target", &self.target)
         .field("conditional", &self.enabled.is_some())
         .finish()
    }
}
