//! Los cuatro flows de apertura de cuenta.
pub mod common;
pub mod foreign_corporate;
pub mod foreign_individual;
pub mod local_corporate;
pub mod local_individual;
