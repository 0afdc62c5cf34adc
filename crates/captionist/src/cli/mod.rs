//! Command implementations for the `captionist` binary.

pub mod config;
pub mod generate;
pub mod key;
pub mod keystore;
pub mod theme;
