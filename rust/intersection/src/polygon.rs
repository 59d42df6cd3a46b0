// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar polygon loops and their winding sense

use crate::error::{Error, Result};
use nalgebra::{Point2, Point3, Vector3};
use std::fmt;

/// Winding of a vertex loop relative to a reference normal
///
/// `Forward` loops have a Newell normal pointing along the reference normal.
/// In the aligned 2D frame (reference normal = -Z) they run clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Forward,
    Reverse,
}

impl Sense {
    /// Sense of an aligned 2D ring, `None` when it encloses no area
    pub fn of_ring(ring: &[Point2<f64>]) -> Option<Sense> {
        let area = crate::clipper::signed_area(ring);
        if area < 0.0 {
            Some(Sense::Forward)
        } else if area > 0.0 {
            Some(Sense::Reverse)
        } else {
            None
        }
    }
}

/// Ordered, implicitly closed loop of at least 3 coplanar points
///
/// The first vertex is not repeated at the end. Coplanarity and simplicity
/// are assumed, not checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point3<f64>>,
}

impl Polygon {
    /// Create a polygon from its vertex loop
    pub fn new(vertices: Vec<Point3<f64>>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(Error::InvalidPolygon(format!(
                "Polygon must have at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        Ok(Self { vertices })
    }

    /// Build a polygon from `(x, y, z)` tuples
    pub fn from_coords(coords: &[(f64, f64, f64)]) -> Result<Self> {
        Self::new(
            coords
                .iter()
                .map(|&(x, y, z)| Point3::new(x, y, z))
                .collect(),
        )
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Point3<f64>> {
        self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false, a polygon holds at least 3 vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Unnormalized Newell normal; its length is twice the enclosed area
    pub fn newell_vector(&self) -> Vector3<f64> {
        let n = self.vertices.len();
        let mut normal = Vector3::<f64>::zeros();

        for i in 0..n {
            let current = &self.vertices[i];
            let next = &self.vertices[(i + 1) % n];

            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
        }

        normal
    }

    /// Unit outward normal following the right-hand rule, `None` if degenerate
    pub fn normal(&self) -> Option<Vector3<f64>> {
        self.newell_vector().try_normalize(f64::EPSILON)
    }

    pub fn area(&self) -> f64 {
        self.newell_vector().norm() * 0.5
    }

    /// Sense of this loop viewed along `reference`
    pub fn sense_about(&self, reference: &Vector3<f64>) -> Option<Sense> {
        let d = self.newell_vector().dot(reference);
        if d > 0.0 {
            Some(Sense::Forward)
        } else if d < 0.0 {
            Some(Sense::Reverse)
        } else {
            None
        }
    }

    /// Same loop with the opposite winding
    pub fn reversed(&self) -> Polygon {
        Polygon {
            vertices: self.vertices.iter().rev().cloned().collect(),
        }
    }

    pub fn centroid(&self) -> Point3<f64> {
        let sum = self
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / self.vertices.len() as f64)
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, p) in self.vertices.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}, {}, {})", p.x, p.y, p.z)?;
        }
        write!(f, "]")
    }
}
