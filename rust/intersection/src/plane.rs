// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plane fitting and alignment into the canonical 2D frame
//!
//! An [`Alignment`] is a rigid transform taking a plane onto z = 0 with its
//! normal mapped to -Z. Loops wound along the plane normal therefore come out
//! clockwise in 2D, which is the winding the clipper treats as `Forward`.

use crate::error::{Error, Result};
use crate::polygon::Polygon;
use nalgebra::{Point2, Point3, Rotation3, Vector3};
use std::f64::consts::PI;

/// Floor for distance checks when the caller passes a zero tolerance
const PLANE_EPSILON: f64 = 1e-9;

/// Plane definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Point on the plane
    pub point: Point3<f64>,
    /// Normal vector (normalized)
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Create a new plane, normalizing `normal`
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// The canonical reference plane: z = 0, facing -Z
    pub fn floor() -> Self {
        Self::new(Point3::origin(), -Vector3::z())
    }

    /// Fit the plane of a polygon
    ///
    /// The normal follows the winding (Newell's method) and the plane passes
    /// through the vertex centroid. Fails when the vertices are collinear or
    /// any vertex lies further than `tolerance` from the fitted plane.
    pub fn from_polygon(polygon: &Polygon, tolerance: f64) -> Result<Self> {
        let newell = polygon.newell_vector();
        let min_norm = (tolerance * tolerance).max(f64::EPSILON);
        if newell.norm() <= min_norm {
            return Err(Error::DegeneratePlane(format!(
                "{} vertices enclose no area",
                polygon.len()
            )));
        }

        let plane = Self::new(polygon.centroid(), newell);
        let limit = tolerance.max(PLANE_EPSILON);
        if let Some(offset) = polygon
            .vertices()
            .iter()
            .map(|p| plane.signed_distance(p).abs())
            .find(|d| *d > limit)
        {
            return Err(Error::DegeneratePlane(format!(
                "vertex lies {:.6} off the polygon plane",
                offset
            )));
        }

        Ok(plane)
    }

    /// Calculate signed distance from point to plane
    /// Positive = in front, Negative = behind
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.point).dot(&self.normal)
    }

    /// Check that every vertex of `polygon` lies within `tolerance` of the plane
    pub fn contains(&self, polygon: &Polygon, tolerance: f64) -> bool {
        let limit = tolerance.max(PLANE_EPSILON);
        polygon
            .vertices()
            .iter()
            .all(|p| self.signed_distance(p).abs() <= limit)
    }
}

/// Rigid transform between a plane and the canonical z = 0 frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    rotation: Rotation3<f64>,
    /// z of the plane after rotation
    elevation: f64,
}

impl Alignment {
    pub fn new(plane: &Plane) -> Self {
        let target = -Vector3::z();
        // rotation_between has no answer for antiparallel vectors
        let rotation = Rotation3::rotation_between(&plane.normal, &target)
            .unwrap_or_else(|| Rotation3::from_axis_angle(&Vector3::x_axis(), PI));
        let elevation = rotation.transform_point(&plane.point).z;

        Self {
            rotation,
            elevation,
        }
    }

    /// Plane normal expressed in world coordinates
    pub fn normal(&self) -> Vector3<f64> {
        self.rotation.inverse_transform_vector(&-Vector3::z())
    }

    pub fn to_2d(&self, point: &Point3<f64>) -> Point2<f64> {
        let aligned = self.rotation.transform_point(point);
        Point2::new(aligned.x, aligned.y)
    }

    pub fn to_3d(&self, point: &Point2<f64>) -> Point3<f64> {
        self.rotation
            .inverse_transform_point(&Point3::new(point.x, point.y, self.elevation))
    }

    pub fn to_2d_ring(&self, polygon: &Polygon) -> Vec<Point2<f64>> {
        polygon.vertices().iter().map(|p| self.to_2d(p)).collect()
    }

    pub fn to_3d_ring(&self, ring: &[Point2<f64>]) -> Vec<Point3<f64>> {
        ring.iter().map(|p| self.to_3d(p)).collect()
    }
}
