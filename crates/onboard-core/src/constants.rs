//! Constantes del engine.

/// Versión lógica del engine. Forma parte del `definition_hash` de cada
/// `Flow`, de modo que un cambio incompatible invalida los hashes previos.
pub const ENGINE_VERSION: &str = "W1.0";

/// Namespace por defecto de las claves de draft
/// (`<namespace>:draft:<region>:<applicantType>`).
pub const DEFAULT_NAMESPACE: &str = "onboard";

/// Máximo de pasadas de auto-sync por `update`. Las reglas encadenadas
/// (A → B → C) convergen en tantas pasadas como eslabones; superar el límite
/// indica reglas que se realimentan.
pub const MAX_SYNC_PASSES: usize = 8;

/// Mensaje por defecto del validador de campos requeridos.
pub const REQUIRED_MESSAGE: &str = "required";
