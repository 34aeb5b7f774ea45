//! # Engine Configuration
//!
//! Settings that shape how a [`Renderer`](crate::Renderer) creates and
//! schedules its render targets. Loadable from TOML or RON through the
//! [`Config`] trait.

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

/// Renderer-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Clear colour given to every newly created render target (RGBA)
    pub default_clear_colour: [f32; 4],

    /// Desired frame rate applied to new windows
    ///
    /// `None` leaves new windows unscheduled until
    /// `set_window_desired_fps` is called for them.
    pub default_fps: Option<f32>,

    /// Directory scanned for renderer plugins
    pub plugin_directory: String,

    /// Default `env_logger` filter used by the demo binaries
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_clear_colour: [0.0, 0.0, 0.0, 1.0],
            default_fps: None,
            plugin_directory: "bin/plugins".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Set the clear colour for new targets
    pub fn with_clear_colour(mut self, colour: [f32; 4]) -> Self {
        self.default_clear_colour = colour;
        self
    }

    /// Schedule every new window at `fps` right away
    pub fn with_default_fps(mut self, fps: f32) -> Self {
        self.default_fps = Some(fps);
        self
    }
}

impl Config for EngineConfig {}
