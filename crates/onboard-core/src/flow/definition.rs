//! Definición inmutable de un Flow.
//!
//! Un `Flow` es la combinación (lista ordenada de steps, template vacío) de
//! un par `(region, applicantType)`, más las reglas de auto-sync y las
//! políticas de adjuntos que antes vivían repartidas en cada pantalla.
//!
//! Invariantes comprobadas por `FlowBuilder::build`:
//! - al menos un step, claves únicas;
//! - el template es un objeto con una entrada raíz por cada step;
//! - cada destino de auto-sync tiene una sola regla.
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::attachment::AttachmentPolicy;
use crate::constants::ENGINE_VERSION;
use crate::document::Node;
use crate::errors::FlowError;
use crate::hashing::{hash_str, to_canonical_json};
use crate::sync::AutoSyncRule;

/// Identidad de un flow: los dos parámetros de ruta, tal cual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlowId {
    region: String,
    applicant_type: String,
}

impl FlowId {
    pub fn new(region: impl Into<String>, applicant_type: impl Into<String>) -> Self {
        Self { region: region.into(),
               applicant_type: applicant_type.into() }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn applicant_type(&self) -> &str {
        &self.applicant_type
    }

    /// Los componentes forman parte de la clave de draft: no pueden estar
    /// vacíos ni contener `:`.
    fn check(&self) -> Result<(), FlowError> {
        for part in [&self.region, &self.applicant_type] {
            if part.trim().is_empty() || part.contains(':') {
                return Err(FlowError::InvalidId(part.clone()));
            }
        }
        Ok(())
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.region, self.applicant_type)
    }
}

/// Un step del wizard: clave raíz en el documento + título visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDef {
    pub key: String,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct Flow {
    id: FlowId,
    steps: Vec<StepDef>,
    template: Arc<Node>,
    sync_rules: Vec<AutoSyncRule>,
    attachments: BTreeMap<String, AttachmentPolicy>,
    definition_hash: String,
}

impl Flow {
    pub fn builder(region: impl Into<String>, applicant_type: impl Into<String>) -> FlowBuilder {
        FlowBuilder { id: FlowId::new(region, applicant_type),
                      steps: Vec::new(),
                      template: Node::object(),
                      sync_rules: Vec::new(),
                      attachments: BTreeMap::new() }
    }

    pub fn id(&self) -> &FlowId {
        &self.id
    }

    pub fn steps(&self) -> &[StepDef] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self, index: usize) -> Option<&StepDef> {
        self.steps.get(index)
    }

    pub fn step_index(&self, key: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.key == key)
    }

    /// Seed compartido (sólo lectura).
    pub fn template(&self) -> &Node {
        &self.template
    }

    /// Copia profunda del template para una sesión nueva: dos sesiones del
    /// mismo flow nunca comparten estructura.
    pub fn instantiate(&self) -> Node {
        Node::clone(&self.template)
    }

    pub fn sync_rules(&self) -> &[AutoSyncRule] {
        &self.sync_rules
    }

    pub fn attachment_policies(&self) -> &BTreeMap<String, AttachmentPolicy> {
        &self.attachments
    }

    pub fn definition_hash(&self) -> &str {
        &self.definition_hash
    }
}

/// Builder de `Flow`.
#[derive(Debug)]
pub struct FlowBuilder {
    id: FlowId,
    steps: Vec<StepDef>,
    template: Node,
    sync_rules: Vec<AutoSyncRule>,
    attachments: BTreeMap<String, AttachmentPolicy>,
}

impl FlowBuilder {
    pub fn step(mut self, key: impl Into<String>, title: impl Into<String>) -> Self {
        self.steps.push(StepDef { key: key.into(),
                                  title: title.into() });
        self
    }

    pub fn template(mut self, template: impl Into<Node>) -> Self {
        self.template = template.into();
        self
    }

    pub fn sync(mut self, rule: AutoSyncRule) -> Self {
        self.sync_rules.push(rule);
        self
    }

    pub fn sync_all(mut self, rules: impl IntoIterator<Item = AutoSyncRule>) -> Self {
        self.sync_rules.extend(rules);
        self
    }

    pub fn attachment(mut self, field: impl Into<String>, policy: AttachmentPolicy) -> Self {
        self.attachments.insert(field.into(), policy);
        self
    }

    pub fn build(self) -> Result<Flow, FlowError> {
        self.id.check()?;
        if self.steps.is_empty() {
            return Err(FlowError::NoSteps(self.id));
        }
        for (i, step) in self.steps.iter().enumerate() {
            if self.steps[..i].iter().any(|s| s.key == step.key) {
                return Err(FlowError::DuplicateStep { flow: self.id.clone(),
                                                      key: step.key.clone() });
            }
        }
        let roots = match &self.template {
            Node::Object(map) => map,
            _ => return Err(FlowError::TemplateNotObject(self.id)),
        };
        if let Some(missing) = self.steps.iter().find(|s| !roots.contains_key(&s.key)) {
            return Err(FlowError::MissingStepRoot { flow: self.id.clone(),
                                                    key: missing.key.clone() });
        }

        for (i, rule) in self.sync_rules.iter().enumerate() {
            if self.sync_rules[..i].iter().any(|r| r.target() == rule.target()) {
                return Err(FlowError::DuplicateSyncTarget { flow: self.id.clone(),
                                                            target: rule.target().to_string() });
            }
        }

        let keys: Vec<&str> = self.steps.iter().map(|s| s.key.as_str()).collect();
        let definition_hash = hash_str(&to_canonical_json(&json!({
                                           "engine_version": ENGINE_VERSION,
                                           "steps": keys,
                                           "template": self.template.to_json(),
                                       })));

        Ok(Flow { id: self.id,
                  steps: self.steps,
                  template: Arc::new(self.template),
                  sync_rules: self.sync_rules,
                  attachments: self.attachments,
                  definition_hash })
    }
}
