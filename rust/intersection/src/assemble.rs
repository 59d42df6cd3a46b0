// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reconstruction of 3D polygons from clipper output
//!
//! Aligned 2D rings are classified into the overlap and the remainders of
//! each input, lifted back onto the shared plane and snapped to the input
//! vertices so unchanged corners keep their exact coordinates.

use crate::clipper::{signed_area, PolygonClipper, Ring};
use crate::error::{Error, Result};
use crate::plane::Alignment;
use crate::polygon::Polygon;
use crate::vertex::{find_coincident, snap_to};
use nalgebra::{Point2, Point3};
use tracing::debug;

/// Overlap of two polygons and what remains of each
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionResult {
    polygon1: Polygon,
    polygon2: Polygon,
    new_polygons1: Vec<Polygon>,
    new_polygons2: Vec<Polygon>,
}

impl IntersectionResult {
    pub fn new(
        polygon1: Polygon,
        polygon2: Polygon,
        new_polygons1: Vec<Polygon>,
        new_polygons2: Vec<Polygon>,
    ) -> Self {
        Self {
            polygon1,
            polygon2,
            new_polygons1,
            new_polygons2,
        }
    }

    /// The overlap expressed with the first input's vertices
    pub fn polygon1(&self) -> &Polygon {
        &self.polygon1
    }

    /// The overlap expressed with the second input's vertices
    pub fn polygon2(&self) -> &Polygon {
        &self.polygon2
    }

    /// First input minus the overlap, largest first
    pub fn new_polygons1(&self) -> &[Polygon] {
        &self.new_polygons1
    }

    /// Second input minus the overlap, largest first
    pub fn new_polygons2(&self) -> &[Polygon] {
        &self.new_polygons2
    }

    /// The same result with the roles of the inputs exchanged
    pub fn swapped(self) -> Self {
        Self {
            polygon1: self.polygon2,
            polygon2: self.polygon1,
            new_polygons1: self.new_polygons2,
            new_polygons2: self.new_polygons1,
        }
    }
}

/// Turns clipper rings into 3D polygons on the aligned plane
#[derive(Debug, Clone, Copy)]
pub struct FragmentAssembler {
    clipper: PolygonClipper,
    alignment: Alignment,
}

impl FragmentAssembler {
    pub fn new(clipper: PolygonClipper, alignment: Alignment) -> Self {
        Self { clipper, alignment }
    }

    fn tolerance(&self) -> f64 {
        self.clipper.tolerance
    }

    /// Build the overlap and remainders of `a` and `b`
    ///
    /// `a2` and `b2` are the aligned, snapped rings of the inputs. When
    /// concave inputs overlap in several pieces, the largest piece is the
    /// overlap and the others stay part of both remainders.
    pub fn assemble_intersection(
        &self,
        a: &Polygon,
        b: &Polygon,
        a2: &[Point2<f64>],
        b2: &[Point2<f64>],
    ) -> Result<IntersectionResult> {
        let overlaps = self.clipper.intersection(a2, b2);
        let Some(overlap) = overlaps.first() else {
            return Err(self.classify_separated(a2, b2));
        };
        if overlaps.len() > 1 {
            debug!(pieces = overlaps.len(), "keeping largest overlap piece");
        }

        let polygon1 = self.lift(overlap, a, b)?;
        let polygon2 = self.lift(overlap, b, a)?;
        let new_polygons1 = self.remainder(a2, overlap, a, b)?;
        let new_polygons2 = self.remainder(b2, overlap, b, a)?;

        debug!(
            overlap_vertices = polygon1.len(),
            remainders1 = new_polygons1.len(),
            remainders2 = new_polygons2.len(),
            "assembled intersection"
        );

        Ok(IntersectionResult::new(
            polygon1,
            polygon2,
            new_polygons1,
            new_polygons2,
        ))
    }

    /// Build the merged boundary of `a` and `b`
    pub fn assemble_union(
        &self,
        a: &Polygon,
        b: &Polygon,
        a2: &[Point2<f64>],
        b2: &[Point2<f64>],
    ) -> Result<Polygon> {
        if self.clipper.intersection(a2, b2).is_empty() {
            let err = self.classify_separated(a2, b2);
            if err != Error::AdjacentOnly {
                return Err(err);
            }
        }

        let mut regions = self.clipper.union(a2, b2);
        if regions.len() != 1 {
            debug!(regions = regions.len(), "union is not a single region");
            return Err(Error::Disjoint);
        }
        let region = regions.remove(0);
        if !region.holes.is_empty() {
            return Err(Error::EnclosedVoid(region.holes.len()));
        }

        let merged = self.lift(&region.outer, a, b)?;
        debug!(vertices = merged.len(), "assembled union");
        Ok(merged)
    }

    /// Rejection for rings whose overlap has no area
    fn classify_separated(&self, a2: &[Point2<f64>], b2: &[Point2<f64>]) -> Error {
        let shared = self.clipper.shared_boundary_length(a2, b2);
        if shared > self.tolerance() {
            Error::AdjacentOnly
        } else {
            Error::Disjoint
        }
    }

    fn remainder(
        &self,
        ring: &[Point2<f64>],
        overlap: &[Point2<f64>],
        own: &Polygon,
        other: &Polygon,
    ) -> Result<Vec<Polygon>> {
        let mut pieces: Vec<Ring> = self
            .clipper
            .difference(ring, overlap)
            .into_iter()
            .flat_map(|region| self.clipper.decompose(region))
            .collect();
        pieces.sort_by(|a, b| signed_area(b).abs().total_cmp(&signed_area(a).abs()));

        pieces
            .iter()
            .map(|piece| self.lift(piece, own, other))
            .collect()
    }

    /// Lift a ring to 3D, snapping to `own` then `other` vertices
    ///
    /// The loop starts at the vertex matching the earliest possible vertex
    /// of `own`.
    fn lift(&self, ring: &[Point2<f64>], own: &Polygon, other: &Polygon) -> Result<Polygon> {
        let tolerance = self.tolerance();
        let mut vertices: Vec<Point3<f64>> = self
            .alignment
            .to_3d_ring(ring)
            .iter()
            .map(|p| match find_coincident(p, own.vertices(), tolerance) {
                Some(idx) => own.vertices()[idx],
                None => snap_to(p, other.vertices(), tolerance),
            })
            .collect();

        let start = own
            .vertices()
            .iter()
            .find_map(|q| find_coincident(q, &vertices, tolerance))
            .unwrap_or(0);
        vertices.rotate_left(start);

        Polygon::new(vertices)
    }
}
