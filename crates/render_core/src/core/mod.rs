//! # Core Engine Module
//!
//! Shared configuration used by the renderer and the demo applications.

pub mod config;

pub use crate::foundation;

pub use config::{Config, ConfigError, EngineConfig};
