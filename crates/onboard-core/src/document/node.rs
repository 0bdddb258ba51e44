//! Nodo del documento: variante etiquetada `Scalar | Object | List`.
//!
//! El documento de un flow es un árbol arbitrariamente profundo. Las hojas
//! son siempre escalares (texto, booleano, número) o `null`; los objetos
//! conservan el orden de inserción de sus claves (`IndexMap`). La
//! serialización pasa por `serde_json::Value`, compilado con
//! `preserve_order`, así que drafts y templates se escriben en ese mismo
//! orden. Los fingerprints no dependen de él (JSON canónico).
//!
//! La conversión con `serde_json::Value` es total en ambos sentidos: el
//! documento viaja como JSON plano (drafts, submission) y se trabaja como
//! `Node` dentro del engine.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Hoja del documento.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

/// Nodo del documento.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Node {
    Scalar(Scalar),
    Object(IndexMap<String, Node>),
    List(Vec<Node>),
}

impl Node {
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::Text(value.into()))
    }

    /// Texto vacío: el valor que escribe el engine cuando "limpia" un campo.
    pub fn empty_text() -> Self {
        Node::text("")
    }

    pub fn bool(value: bool) -> Self {
        Node::Scalar(Scalar::Bool(value))
    }

    pub fn object() -> Self {
        Node::Object(IndexMap::new())
    }

    pub fn list() -> Self {
        Node::List(Vec::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Scalar::Null))
    }

    /// `true` para `null` y texto vacío. Un booleano `false` o un `0` son
    /// valores, no vacíos.
    pub fn is_blank(&self) -> bool {
        match self {
            Node::Scalar(Scalar::Null) => true,
            Node::Scalar(Scalar::Text(s)) => s.is_empty(),
            _ => false,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    /// Nombre del tipo, usado en mensajes de `PathError::TypeMismatch`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Scalar(Scalar::Null) => "null",
            Node::Scalar(Scalar::Bool(_)) => "bool",
            Node::Scalar(Scalar::Number(_)) => "number",
            Node::Scalar(Scalar::Text(_)) => "text",
            Node::Object(_) => "object",
            Node::List(_) => "list",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Node::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    /// Copia del nodo como JSON plano.
    pub fn to_json(&self) -> Value {
        Value::from(self.clone())
    }

    /// Representación textual para derivaciones (concatenar nombres, etc.).
    /// Objetos y listas no tienen forma textual.
    pub fn display_text(&self) -> Option<String> {
        match self {
            Node::Scalar(Scalar::Null) => None,
            Node::Scalar(Scalar::Bool(b)) => Some(b.to_string()),
            Node::Scalar(Scalar::Number(n)) => Some(n.to_string()),
            Node::Scalar(Scalar::Text(s)) => Some(s.clone()),
            Node::Object(_) | Node::List(_) => None,
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::null()
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::null(),
            Value::Bool(b) => Node::bool(b),
            Value::Number(n) => Node::Scalar(Scalar::Number(n)),
            Value::String(s) => Node::text(s),
            Value::Array(items) => Node::List(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => Node::Object(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect()),
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        match node {
            Node::Scalar(Scalar::Null) => Value::Null,
            Node::Scalar(Scalar::Bool(b)) => Value::Bool(b),
            Node::Scalar(Scalar::Number(n)) => Value::Number(n),
            Node::Scalar(Scalar::Text(s)) => Value::String(s),
            Node::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Node::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::text(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::text(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::bool(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Scalar(Scalar::Number(Number::from(value)))
    }
}

impl From<f64> for Node {
    /// `NaN`/infinito no son representables en JSON: se degradan a `null`.
    fn from(value: f64) -> Self {
        Number::from_f64(value).map(|n| Node::Scalar(Scalar::Number(n)))
                               .unwrap_or_else(Node::null)
    }
}
