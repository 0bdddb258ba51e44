//! Modelo de documento (Node) y PathAccessor.

pub mod node;
pub mod path;

pub use node::{Node, Scalar};
pub use path::{get, get_str, set, set_in, Path, Segment};
