//! Drafts: almacenamiento falible + store tolerante a fallos.

mod storage;
mod store;

pub use storage::{DraftStorage, InMemoryDraftStorage};
pub use store::DraftStore;
