//! AutoSyncEngine: evaluación ordenada de reglas con memoria "last-auto".
//!
//! Para cada regla, en orden de declaración:
//! 1. `desired` = valor derivado de las fuentes (vacío si está deshabilitada).
//! 2. `current` = valor actual del destino; `last` = último valor que el
//!    engine escribió en ese destino (inicialmente `""`).
//! 3. `desired` no vacío y (`current` vacío o `current == last`): se escribe
//!    `desired` y se recuerda.
//! 4. `desired` vacío y `current == last`: se limpia el destino (la fuente
//!    se deshabilitó y el valor era nuestro).
//! 5. En otro caso el usuario ha sobrescrito el campo: no se toca hasta que
//!    lo vuelva a dejar vacío.
//!
//! Una escritura que no cambia el valor actual no se reporta, así que una
//! segunda pasada sobre el mismo documento no produce escrituras.
//!
//! La memoria es un único mapa por sesión indexado por path destino, y nunca
//! se persiste. `FlowBuilder` garantiza una sola regla por destino.
use std::collections::HashMap;

use log::{debug, warn};

use super::AutoSyncRule;
use crate::document::{get, set_in, Node, Path};

/// Escritura realizada por el engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncWrite {
    pub rule: String,
    pub target: Path,
    pub value: Node,
}

#[derive(Debug, Default)]
pub struct AutoSyncEngine {
    rules: Vec<AutoSyncRule>,
    memory: HashMap<String, Node>,
}

impl AutoSyncEngine {
    pub fn new(rules: Vec<AutoSyncRule>) -> Self {
        Self { rules,
               memory: HashMap::new() }
    }

    pub fn rules(&self) -> &[AutoSyncRule] {
        &self.rules
    }

    /// Último valor auto-escrito en `target` (`None` equivale a `""`).
    pub fn last_auto(&self, target: &str) -> Option<&Node> {
        self.memory.get(target)
    }

    /// Olvida la memoria (sesión nueva sobre el mismo conjunto de reglas).
    pub fn reset(&mut self) {
        self.memory.clear();
    }

    /// Re-deriva la memoria a partir del documento: un destino que ya
    /// contiene exactamente el valor derivado se considera auto-escrito.
    /// Se usa al hidratar desde un draft, que no guarda la memoria.
    pub fn prime(&mut self, doc: &Node) {
        for rule in &self.rules {
            let desired = rule.desired(doc);
            if !desired.is_blank() && get(doc, rule.target()) == Some(&desired) {
                self.memory.insert(rule.target().as_str().to_string(), desired);
            }
        }
    }

    /// Una pasada completa sobre todas las reglas. Cada regla ve las
    /// escrituras de las anteriores.
    pub fn run_pass(&mut self, doc: &mut Node) -> Vec<SyncWrite> {
        let mut writes = Vec::new();
        for rule in &self.rules {
            let Some(value) = decide(&mut self.memory, rule, doc) else {
                continue;
            };
            match set_in(doc, rule.target(), value.clone()) {
                Ok(()) => {
                    debug!("auto-sync {} wrote {}", rule.name(), rule.target());
                    writes.push(SyncWrite { rule: rule.name().to_string(),
                                            target: rule.target().clone(),
                                            value });
                }
                Err(e) => warn!("auto-sync {} skipped: {e}", rule.name()),
            }
        }
        writes
    }
}

/// Aplica los pasos 1-5 y devuelve el valor a escribir, si hay que hacerlo.
fn decide(memory: &mut HashMap<String, Node>, rule: &AutoSyncRule, doc: &Node) -> Option<Node> {
    let desired = rule.desired(doc);
    let current = get(doc, rule.target());
    let key = rule.target().as_str();
    let empty = Node::empty_text();
    let last = memory.get(key).unwrap_or(&empty);

    let current_blank = current.map_or(true, Node::is_blank);
    let current_is_last = current.map_or(last.is_blank(), |c| c == last);

    if !desired.is_blank() {
        if !(current_blank || current_is_last) {
            return None;
        }
        let changed = current != Some(&desired);
        memory.insert(key.to_string(), desired.clone());
        return changed.then_some(desired);
    }

    if current_is_last && !current_blank {
        memory.remove(key);
        return Some(Node::empty_text());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::get_str;
    use serde_json::json;

    fn engine() -> AutoSyncEngine {
        AutoSyncEngine::new(vec![AutoSyncRule::mirror("src", "dst").unwrap()])
    }

    #[test]
    fn fills_blank_target_and_remembers() {
        let mut doc = Node::from(json!({"src": "A", "dst": ""}));
        let mut engine = engine();
        let writes = engine.run_pass(&mut doc);
        assert_eq!(writes.len(), 1);
        assert_eq!(get_str(&doc, "dst"), Some(&Node::text("A")));
        assert_eq!(engine.last_auto("dst"), Some(&Node::text("A")));
    }

    #[test]
    fn second_pass_is_noop() {
        let mut doc = Node::from(json!({"src": "A"}));
        let mut engine = engine();
        engine.run_pass(&mut doc);
        let snapshot = doc.clone();
        assert!(engine.run_pass(&mut doc).is_empty());
        assert_eq!(doc, snapshot);
    }

    #[test]
    fn blank_source_with_blank_target_writes_nothing() {
        let mut doc = Node::from(json!({"src": ""}));
        assert!(engine().run_pass(&mut doc).is_empty());
        assert_eq!(get_str(&doc, "dst"), None);
    }

    #[test]
    fn prime_adopts_matching_targets_only() {
        let doc = Node::from(json!({"src": "A", "dst": "A"}));
        let mut engine = engine();
        engine.prime(&doc);
        assert_eq!(engine.last_auto("dst"), Some(&Node::text("A")));

        let typed = Node::from(json!({"src": "A", "dst": "B"}));
        let mut other = self::engine();
        other.prime(&typed);
        assert_eq!(other.last_auto("dst"), None);
    }

    #[test]
    fn mismatched_target_is_skipped() {
        let mut doc = Node::from(json!({"src": "A", "dst": ["not", "text"]}));
        let mut engine = AutoSyncEngine::new(vec![AutoSyncRule::mirror("src", "dst.name").unwrap()]);
        assert!(engine.run_pass(&mut doc).is_empty());
    }
}
