// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine configuration.

use crate::plane::Plane;

/// Default vertex matching tolerance in model units (meters)
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Environment variable overriding the default tolerance
pub const TOLERANCE_ENV: &str = "SURFACE_INTERSECTION_TOLERANCE";

/// Intersection engine configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Distance under which vertices are treated as the same point.
    pub tolerance: f64,
    /// Plane both polygons must lie on, facing along its normal.
    /// `None` accepts any common plane; the first polygon then defines the
    /// forward sense.
    pub reference_plane: Option<Plane>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            reference_plane: Some(Plane::floor()),
        }
    }
}

impl EngineConfig {
    /// Canonical configuration with a custom tolerance.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    /// Replace the reference plane.
    pub fn reference_plane(mut self, plane: Option<Plane>) -> Self {
        self.reference_plane = plane;
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::with_tolerance(
            std::env::var(TOLERANCE_ENV)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOLERANCE),
        )
    }
}
