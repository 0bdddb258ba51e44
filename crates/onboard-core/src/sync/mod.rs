//! Auto-sync: reglas declarativas de espejo entre campos.

mod engine;
mod rule;

pub use engine::{AutoSyncEngine, SyncWrite};
pub use rule::{AutoSyncRule, DeriveFn, EnabledFn};
