// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coplanar Surface Intersection
//!
//! Intersection and union of planar building surfaces. Two polygons on a
//! shared plane are aligned into a 2D frame, clipped with i_overlay and
//! lifted back to 3D as an overlap region plus the remaining fragments of
//! each input, or as a single merged boundary.
//!
//! Polygons must be wound in the forward sense relative to the reference
//! plane (clockwise seen from +Z for the default floor plane). Mismatched
//! windings or planes produce no result rather than being corrected.

pub mod assemble;
pub mod clipper;
pub mod config;
pub mod engine;
pub mod error;
pub mod plane;
pub mod polygon;
pub mod vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};

pub use assemble::{FragmentAssembler, IntersectionResult};
pub use clipper::{PolygonClipper, Region, Ring};
pub use config::EngineConfig;
pub use engine::{intersect, join, IntersectionEngine};
pub use error::{Error, Result};
pub use plane::{Alignment, Plane};
pub use polygon::{Polygon, Sense};
pub use vertex::{circular_equal, coincident};
