// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Intersection and join of coplanar polygons
//!
//! Every call runs the same pipeline:
//! 1. Align: fit both planes and pick the shared 2D frame
//! 2. Validate: plane gate, then orientation gate
//! 3. Clip: snap the aligned rings and run the 2D boolean
//! 4. Assemble: classify and lift the rings back to 3D
//!
//! Any failed stage ends the call without a result. Failures are expected
//! outcomes, so the `Option` methods log them at debug level only.

use crate::assemble::{FragmentAssembler, IntersectionResult};
use crate::clipper::{PolygonClipper, Ring};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::plane::{Alignment, Plane};
use crate::polygon::{Polygon, Sense};
use crate::vertex::circular_equal;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Aligned inputs ready for clipping
struct Prepared {
    a2: Ring,
    b2: Ring,
    assembler: FragmentAssembler,
}

/// Stateless intersection engine
#[derive(Debug, Clone, Copy, Default)]
pub struct IntersectionEngine {
    config: EngineConfig,
}

impl IntersectionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Overlap of `a` and `b` with the remainders of both
    pub fn try_intersect(&self, a: &Polygon, b: &Polygon) -> Result<IntersectionResult> {
        let prepared = self.prepare(a, b)?;

        if circular_equal(a.vertices(), b.vertices(), self.config.tolerance) {
            debug!("identical polygons, full overlap");
            return Ok(IntersectionResult::new(a.clone(), b.clone(), Vec::new(), Vec::new()));
        }

        prepared
            .assembler
            .assemble_intersection(a, b, &prepared.a2, &prepared.b2)
    }

    /// Merged boundary of `a` and `b`
    pub fn try_join(&self, a: &Polygon, b: &Polygon) -> Result<Polygon> {
        let prepared = self.prepare(a, b)?;

        if circular_equal(a.vertices(), b.vertices(), self.config.tolerance) {
            debug!("identical polygons, join is the input");
            return Ok(a.clone());
        }

        prepared
            .assembler
            .assemble_union(a, b, &prepared.a2, &prepared.b2)
    }

    /// Like [`try_intersect`](Self::try_intersect), `None` for every rejection
    pub fn intersect(&self, a: &Polygon, b: &Polygon) -> Option<IntersectionResult> {
        self.try_intersect(a, b)
            .map_err(|err| report("intersect", &err))
            .ok()
    }

    /// Like [`try_join`](Self::try_join), `None` for every rejection
    pub fn join(&self, a: &Polygon, b: &Polygon) -> Option<Polygon> {
        self.try_join(a, b).map_err(|err| report("join", &err)).ok()
    }

    /// Intersect many independent pairs in parallel
    pub fn intersect_all(&self, pairs: &[(Polygon, Polygon)]) -> Vec<Option<IntersectionResult>> {
        pairs
            .par_iter()
            .map(|(a, b)| self.intersect(a, b))
            .collect()
    }

    /// Join many independent pairs in parallel
    pub fn join_all(&self, pairs: &[(Polygon, Polygon)]) -> Vec<Option<Polygon>> {
        pairs.par_iter().map(|(a, b)| self.join(a, b)).collect()
    }

    fn prepare(&self, a: &Polygon, b: &Polygon) -> Result<Prepared> {
        let tolerance = self.config.tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(Error::InvalidTolerance(tolerance));
        }

        // Align
        let plane_a = Plane::from_polygon(a, tolerance)?;
        let plane_b = Plane::from_polygon(b, tolerance)?;

        // Plane gate
        if !plane_a.contains(b, tolerance) || !plane_b.contains(a, tolerance) {
            return Err(Error::NotCoplanar(
                "polygons lie on different planes".to_string(),
            ));
        }
        let frame = match self.config.reference_plane {
            Some(reference) => {
                if !reference.contains(a, tolerance) || !reference.contains(b, tolerance) {
                    return Err(Error::NotCoplanar(
                        "polygons are off the reference plane".to_string(),
                    ));
                }
                reference
            }
            None => plane_a,
        };

        // Orientation gate
        let alignment = Alignment::new(&frame);
        let a2 = alignment.to_2d_ring(a);
        let b2 = alignment.to_2d_ring(b);
        for (name, ring) in [("first", &a2), ("second", &b2)] {
            if Sense::of_ring(ring) != Some(Sense::Forward) {
                return Err(Error::OrientationMismatch(format!(
                    "{} polygon is not wound in the forward sense",
                    name
                )));
            }
        }
        debug!(
            vertices_a = a2.len(),
            vertices_b = b2.len(),
            "aligned polygons"
        );

        let clipper = PolygonClipper::new(tolerance);
        let (a2, b2) = clipper.snap_pair(&a2, &b2);

        Ok(Prepared {
            a2,
            b2,
            assembler: FragmentAssembler::new(clipper, alignment),
        })
    }
}

fn report(operation: &str, err: &Error) {
    if err.is_contract_violation() {
        warn!(operation, error = %err, "invalid input");
    } else {
        debug!(operation, reason = %err, "no result");
    }
}

/// Intersect two polygons on the canonical floor plane
pub fn intersect(a: &Polygon, b: &Polygon, tolerance: f64) -> Option<IntersectionResult> {
    IntersectionEngine::new(EngineConfig::with_tolerance(tolerance)).intersect(a, b)
}

/// Join two polygons on the canonical floor plane
pub fn join(a: &Polygon, b: &Polygon, tolerance: f64) -> Option<Polygon> {
    IntersectionEngine::new(EngineConfig::with_tolerance(tolerance)).join(a, b)
}
