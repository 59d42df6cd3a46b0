// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tolerance-based vertex matching
//!
//! Two points are coincident when they are strictly closer than the
//! tolerance. Loops are compared up to rotation of the starting vertex, never
//! up to reflection, so winding always matters.

use nalgebra::{Point2, Point3};

/// Check if two points are closer than `tolerance`
#[inline]
pub fn coincident(p: &Point3<f64>, q: &Point3<f64>, tolerance: f64) -> bool {
    (p - q).norm() < tolerance
}

/// 2D variant of [`coincident`]
#[inline]
pub fn coincident_2d(p: &Point2<f64>, q: &Point2<f64>, tolerance: f64) -> bool {
    (p - q).norm() < tolerance
}

/// Index of the first candidate coincident with `p`
pub fn find_coincident(p: &Point3<f64>, candidates: &[Point3<f64>], tolerance: f64) -> Option<usize> {
    candidates.iter().position(|q| coincident(p, q, tolerance))
}

/// Replace `p` by the first coincident candidate, if any
pub fn snap_to(p: &Point3<f64>, candidates: &[Point3<f64>], tolerance: f64) -> Point3<f64> {
    match find_coincident(p, candidates, tolerance) {
        Some(idx) => candidates[idx],
        None => *p,
    }
}

/// 2D variant of [`snap_to`]
pub fn snap_to_2d(p: &Point2<f64>, candidates: &[Point2<f64>], tolerance: f64) -> Point2<f64> {
    candidates
        .iter()
        .find(|q| coincident_2d(p, q, tolerance))
        .copied()
        .unwrap_or(*p)
}

/// Check if `b` is a rotation of `a` with all corresponding points coincident
pub fn circular_equal(a: &[Point3<f64>], b: &[Point3<f64>], tolerance: f64) -> bool {
    if a.len() != b.len() {
        return false;
    }
    if a.is_empty() {
        return true;
    }

    let n = a.len();
    (0..n).any(|offset| {
        coincident(&a[0], &b[offset], tolerance)
            && (1..n).all(|i| coincident(&a[i], &b[(offset + i) % n], tolerance))
    })
}
