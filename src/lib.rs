//! Onboard Rust Library
//!
//! Facade del workspace:
//! - `onboard_core`, `onboard_domain`, `onboard_persistence`,
//!   `onboard_adapters`: los crates miembros, re-exportados.
//! - `loopback`: backend en proceso para la demo y los tests.
//! - `error`: `AppError`.

pub mod error;
pub mod loopback;

pub use onboard_adapters;
pub use onboard_core;
pub use onboard_domain;
pub use onboard_persistence;

pub use error::AppError;
pub use loopback::LoopbackApi;
