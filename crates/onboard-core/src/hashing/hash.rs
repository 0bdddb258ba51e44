//! Fingerprints blake3 en hex. El DraftStore los usa para no reescribir un
//! documento que no cambió; los flows, para su `definition_hash`.

use super::to_canonical_json;
use crate::document::Node;

pub fn hash_str(input: &str) -> String {
    blake3::hash(input.as_bytes()).to_hex().to_string()
}

/// Fingerprint estable de un documento (independiente del orden de claves).
pub fn hash_node(node: &Node) -> String {
    hash_str(&to_canonical_json(&node.to_json()))
}
