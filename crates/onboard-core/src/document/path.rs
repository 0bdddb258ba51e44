//! PathAccessor: lectura/escritura por path sobre el documento.
//!
//! Un path es una cadena de segmentos separados por `.`; un segmento en forma
//! decimal canónica (`0`, `7`, `12`, sin ceros a la izquierda) direcciona un
//! slot de lista, cualquier otro es una clave de objeto.
//!
//! Reglas:
//! - `get` nunca falla: un intermedio ausente devuelve `None`.
//! - `set` es estructural (no muta la entrada); `set_in` es la variante in
//!   place que usa el controller.
//! - Los intermedios ausentes (o `null`) se crean: lista si el siguiente
//!   segmento es índice, objeto si es clave.
//! - Escribir fuera de rango densifica la lista con `null`.
//! - Un índice aplicado a un objeto existente direcciona la clave con esa
//!   grafía (`"0"`).
//! - Descender por una clave dentro de una lista, o por cualquier segmento
//!   dentro de un escalar no nulo, es `PathError::TypeMismatch`. Nunca se
//!   coacciona.
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use super::Node;
use crate::errors::PathError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    fn parse(raw: &str) -> Option<Segment> {
        if raw.is_empty() {
            return None;
        }
        let canonical_index = raw.bytes().all(|b| b.is_ascii_digit()) && (raw == "0" || !raw.starts_with('0'));
        if canonical_index {
            if let Ok(i) = raw.parse::<usize>() {
                return Some(Segment::Index(i));
            }
        }
        Some(Segment::Key(raw.to_string()))
    }

    /// Clave equivalente cuando el segmento se aplica a un objeto.
    fn as_key(&self) -> String {
        match self {
            Segment::Key(k) => k.clone(),
            Segment::Index(i) => i.to_string(),
        }
    }
}

/// Path parseado. Se recalcula en cada acceso; no se cachea.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    raw: String,
    segments: Vec<Segment>,
}

impl Path {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }
        let segments = raw.split('.')
                          .map(Segment::parse)
                          .collect::<Option<Vec<_>>>()
                          .ok_or_else(|| PathError::EmptySegment(raw.to_string()))?;
        Ok(Self { raw: raw.to_string(),
                  segments })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// `true` si `prefix` coincide con los primeros segmentos de `self`.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Cadena con los primeros `n` segmentos (para mensajes de error).
    fn prefix_str(&self, n: usize) -> String {
        self.raw.split('.').take(n).collect::<Vec<_>>().join(".")
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

/// Lee el nodo en `path`. `None` si algún tramo no existe o no es
/// descendible.
pub fn get<'a>(doc: &'a Node, path: &Path) -> Option<&'a Node> {
    let mut cur = doc;
    for seg in path.segments() {
        cur = match (cur, seg) {
            (Node::Object(map), Segment::Key(k)) => map.get(k)?,
            (Node::Object(map), Segment::Index(i)) => map.get(&i.to_string())?,
            (Node::List(items), Segment::Index(i)) => items.get(*i)?,
            _ => return None,
        };
    }
    Some(cur)
}

/// Igual que `get` pero a partir de la cadena; un path mal formado se trata
/// como ausente.
pub fn get_str<'a>(doc: &'a Node, raw: &str) -> Option<&'a Node> {
    Path::parse(raw).ok().and_then(|p| get(doc, &p))
}

/// Escritura estructural: devuelve un documento nuevo y deja `doc` intacto.
pub fn set(doc: &Node, path: &Path, value: Node) -> Result<Node, PathError> {
    let mut out = doc.clone();
    set_in(&mut out, path, value)?;
    Ok(out)
}

/// Escritura in place.
///
/// Sólo se crean contenedores al atravesar nodos ausentes o `null`; a partir
/// de ahí todo lo que cuelga es nuevo, así que un `TypeMismatch` únicamente
/// puede ocurrir sobre nodos existentes y el documento queda sin cambios.
pub fn set_in(doc: &mut Node, path: &Path, value: Node) -> Result<(), PathError> {
    let segments = path.segments();
    let last = segments.len().saturating_sub(1);
    let mut cur = doc;
    for (depth, seg) in segments.iter().enumerate() {
        if cur.is_null() {
            *cur = match seg {
                Segment::Key(_) => Node::Object(IndexMap::new()),
                Segment::Index(_) => Node::List(Vec::new()),
            };
        }
        let slot = match (cur, seg) {
            (Node::Object(map), seg) => map.entry(seg.as_key()).or_insert_with(Node::null),
            (Node::List(items), Segment::Index(i)) => {
                if *i >= items.len() {
                    items.resize(*i + 1, Node::null());
                }
                &mut items[*i]
            }
            (other, _) => {
                return Err(PathError::TypeMismatch { path: path.prefix_str(depth),
                                                     found: other.kind_name() })
            }
        };
        if depth == last {
            *slot = value;
            return Ok(());
        }
        cur = slot;
    }
    Ok(())
}
