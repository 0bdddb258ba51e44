//! Decodificación de las respuestas de validación del backend a un mapa
//! path → mensaje.
//!
//! Formas aceptadas:
//! - plano: `{"kyc.pep": "required"}`
//! - estilo mongoose: `{"errors": {"kyc.pep": {"message": "required", ...}}}`
//! - lista: `{"errors": [{"path": "kyc.pep", "msg": "required"}]}`
//! - anidado: `{"kyc": {"pep": "required"}}`, que se aplana a paths con punto.
use std::collections::BTreeMap;

use onboard_core::SubmitError;
use reqwest::StatusCode;
use serde_json::{Map, Value};

const MESSAGE_KEYS: [&str; 2] = ["message", "msg"];
const PATH_KEYS: [&str; 3] = ["path", "param", "field"];

pub fn decode_validation_payload(body: &Value) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    let (root, top_level) = match body {
        Value::Object(map) => match map.get("errors") {
            Some(errors) => (errors, false),
            None => (body, true),
        },
        other => (other, false),
    };
    match root {
        Value::Object(map) => {
            for (key, value) in map {
                // Sin sobre `errors`, un `message` de primer nivel describe la
                // respuesta, no un campo.
                if top_level && MESSAGE_KEYS.contains(&key.as_str()) {
                    continue;
                }
                flatten_value(key, value, &mut out);
            }
        }
        Value::Array(items) => {
            for item in items {
                if let Some((path, message)) = entry_from_list_item(item) {
                    out.insert(path, message);
                }
            }
        }
        _ => {}
    }
    out
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn message_of(map: &Map<String, Value>) -> Option<&str> {
    MESSAGE_KEYS.iter().find_map(|k| map.get(*k).and_then(Value::as_str))
}

fn flatten_object(prefix: &str, map: &Map<String, Value>, out: &mut BTreeMap<String, String>) {
    for (key, value) in map {
        flatten_value(&join(prefix, key), value, out);
    }
}

fn flatten_value(path: &str, value: &Value, out: &mut BTreeMap<String, String>) {
    match value {
        Value::String(message) => {
            out.insert(path.to_string(), message.clone());
        }
        Value::Object(map) => match message_of(map) {
            Some(message) => {
                out.insert(path.to_string(), message.to_string());
            }
            None => flatten_object(path, map, out),
        },
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten_value(&join(path, &i.to_string()), item, out);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

fn entry_from_list_item(item: &Value) -> Option<(String, String)> {
    let map = item.as_object()?;
    let path = PATH_KEYS.iter().find_map(|k| map.get(*k).and_then(Value::as_str))?;
    Some((path.to_string(), message_of(map)?.to_string()))
}

/// Traduce una respuesta no exitosa a `SubmitError`. Sólo un 400/422 con al
/// menos un error por campo es `Validation`.
pub fn classify_failure(status: StatusCode, body: &str) -> SubmitError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
        if let Some(value) = &parsed {
            let fields = decode_validation_payload(value);
            if !fields.is_empty() {
                return SubmitError::Validation(fields);
            }
        }
    }
    let detail = parsed.as_ref()
                       .and_then(Value::as_object)
                       .and_then(message_of)
                       .map(str::to_string)
                       .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
    SubmitError::Failure(format!("{} {}", status.as_u16(), detail))
}
