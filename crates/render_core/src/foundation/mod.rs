//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - 2D math types and interpolation helpers
//! - Id-keyed resource pools
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod logging;
