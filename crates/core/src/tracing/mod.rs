//! Tracing setup shared by the client binaries
//!
//! The library crates only emit events through the `tracing` macros; this
//! module installs the subscriber that renders them.

pub mod config;
pub mod init;

pub use config::{InstrumentationConfig, LogFormat};
pub use init::{init_default, init_tracing};
