//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how*. They sit between the
//! high-level [`operations`](super::operations) and the
//! [`backend`](super::backend), so a mock backend can stand in for tests
//! without changing operation logic.

use crate::config::ThumbnailsConfig;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Parameters for a thumbnail operation (bounded downscale, aspect preserved).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailParams {
    /// Longer edge bound in pixels.
    pub max_edge: u32,
    pub quality: Quality,
}

impl ThumbnailParams {
    pub fn from_config(config: &ThumbnailsConfig) -> Self {
        Self {
            max_edge: config.max_edge,
            quality: Quality::new(config.quality),
        }
    }
}

impl Default for ThumbnailParams {
    fn default() -> Self {
        Self::from_config(&ThumbnailsConfig::default())
    }
}
