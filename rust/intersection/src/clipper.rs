// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Boolean Operations on Aligned Rings
//!
//! Intersection, union and difference of two simple rings using the i_overlay
//! crate. Inputs are snapped against each other before the overlay and the
//! output is snapped back onto input vertices, so rings that agree within
//! tolerance produce clean results without floating-point slivers.
//!
//! Every ring returned here is `Forward` (clockwise); holes are wound the
//! other way.

use crate::polygon::Sense;
use crate::vertex::{coincident_2d, snap_to_2d};
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;
use tracing::{trace, warn};

/// Epsilon for floating point comparisons in 2D operations
const EPSILON_2D: f64 = 1e-9;

/// Minimum area threshold - rings smaller than this are considered degenerate
const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// Upper bound on recursive hole cuts in [`PolygonClipper::decompose`]
const MAX_DECOMPOSE_DEPTH: usize = 64;

/// Closed loop of 2D points without a repeated first vertex
pub type Ring = Vec<Point2<f64>>;

/// Outer boundary with optional holes
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Outer boundary (clockwise)
    pub outer: Ring,
    /// Holes (counter-clockwise)
    pub holes: Vec<Ring>,
}

impl Region {
    /// Enclosed area, holes excluded
    pub fn area(&self) -> f64 {
        signed_area(&self.outer).abs()
            - self
                .holes
                .iter()
                .map(|h| signed_area(h).abs())
                .sum::<f64>()
    }
}

/// Tolerance-aware boolean operations on 2D rings
#[derive(Debug, Clone, Copy)]
pub struct PolygonClipper {
    /// Distance under which points, edges and lines are merged
    pub tolerance: f64,
}

impl PolygonClipper {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    fn epsilon(&self) -> f64 {
        self.tolerance.max(EPSILON_2D)
    }

    fn min_area(&self) -> f64 {
        (self.tolerance * self.tolerance).max(MIN_AREA_THRESHOLD)
    }

    /// Snap two rings onto each other
    ///
    /// Vertices of `b` move onto coincident vertices of `a`, or onto the
    /// closest edge of `a` within tolerance. `a` is then snapped against the
    /// result the same way.
    pub fn snap_pair(&self, a: &[Point2<f64>], b: &[Point2<f64>]) -> (Ring, Ring) {
        let b = self.snap_ring(b, a);
        let a = self.snap_ring(a, &b);
        (a, b)
    }

    fn snap_ring(&self, ring: &[Point2<f64>], target: &[Point2<f64>]) -> Ring {
        ring.iter().map(|p| self.snap_point(p, target)).collect()
    }

    fn snap_point(&self, p: &Point2<f64>, target: &[Point2<f64>]) -> Point2<f64> {
        if let Some(q) = target.iter().find(|q| coincident_2d(p, q, self.tolerance)) {
            return *q;
        }

        let n = target.len();
        let mut best: Option<(f64, Point2<f64>)> = None;
        for i in 0..n {
            let (q, d) = closest_on_segment(p, &target[i], &target[(i + 1) % n]);
            if d < self.tolerance && best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, q));
            }
        }

        match best {
            Some((d, q)) => {
                trace!(x = p.x, y = p.y, distance = d, "snapped vertex onto edge");
                q
            }
            None => *p,
        }
    }

    /// Rings covering the area common to `a` and `b`, largest first
    ///
    /// The intersection of two simple rings never has holes.
    pub fn intersection(&self, a: &[Point2<f64>], b: &[Point2<f64>]) -> Vec<Ring> {
        self.overlay(a, b, OverlayRule::Intersect)
            .into_iter()
            .map(|region| region.outer)
            .collect()
    }

    /// Regions covering the area of either ring, largest first
    pub fn union(&self, a: &[Point2<f64>], b: &[Point2<f64>]) -> Vec<Region> {
        self.overlay(a, b, OverlayRule::Union)
    }

    /// Regions covering `a` minus `b`, largest first
    pub fn difference(&self, a: &[Point2<f64>], b: &[Point2<f64>]) -> Vec<Region> {
        self.overlay(a, b, OverlayRule::Difference)
    }

    fn overlay(&self, a: &[Point2<f64>], b: &[Point2<f64>], rule: OverlayRule) -> Vec<Region> {
        let anchors: Vec<Point2<f64>> = a.iter().chain(b).copied().collect();
        self.overlay_paths(
            vec![contour_to_path(a)],
            vec![contour_to_path(b)],
            rule,
            &anchors,
        )
    }

    fn overlay_paths(
        &self,
        subject: Vec<Vec<[f64; 2]>>,
        clip: Vec<Vec<[f64; 2]>>,
        rule: OverlayRule,
        anchors: &[Point2<f64>],
    ) -> Vec<Region> {
        let shapes = subject.overlay(&clip, rule, FillRule::EvenOdd);
        self.shapes_to_regions(shapes, anchors)
    }

    /// Convert i_overlay result shapes back to cleaned regions
    ///
    /// i_overlay returns Vec<Vec<Vec<[f64; 2]>>> where:
    /// - Outer Vec: list of shapes
    /// - Middle Vec: list of contours per shape (first is outer, rest are holes)
    /// - Inner Vec: list of points per contour
    fn shapes_to_regions(
        &self,
        shapes: Vec<Vec<Vec<[f64; 2]>>>,
        anchors: &[Point2<f64>],
    ) -> Vec<Region> {
        let mut regions = Vec::with_capacity(shapes.len());

        for shape in shapes {
            let mut contours = shape.into_iter().map(|contour| {
                let ring: Ring = contour
                    .into_iter()
                    .map(|p| snap_to_2d(&Point2::new(p[0], p[1]), anchors, self.tolerance))
                    .collect();
                self.clean_ring(&ring)
            });

            let outer = match contours.next() {
                Some(Some(outer)) => outer,
                _ => continue,
            };
            let holes = contours
                .flatten()
                .map(|hole| orient(&hole, Sense::Reverse))
                .collect();

            regions.push(Region {
                outer: orient(&outer, Sense::Forward),
                holes,
            });
        }

        regions.sort_by(|a, b| b.area().total_cmp(&a.area()));
        regions
    }

    /// Remove duplicate, collinear and spike vertices
    ///
    /// Returns `None` when fewer than 3 vertices survive or the remaining
    /// ring encloses no more than the minimum area.
    pub fn clean_ring(&self, ring: &[Point2<f64>]) -> Option<Ring> {
        let eps = self.epsilon();
        let mut points: Ring = ring.to_vec();

        loop {
            let n = points.len();
            if n < 3 {
                return None;
            }

            let redundant = (0..n).find(|&i| {
                let prev = &points[(i + n - 1) % n];
                let curr = &points[i];
                let next = &points[(i + 1) % n];
                coincident_2d(curr, next, eps)
                    || coincident_2d(prev, next, eps)
                    || distance_to_line(curr, prev, next) < eps
            });

            match redundant {
                Some(i) => {
                    points.remove(i);
                }
                None => break,
            }
        }

        if signed_area(&points).abs() <= self.min_area() {
            return None;
        }
        Some(points)
    }

    /// Total length of boundary shared by two rings
    ///
    /// Sums the overlapping spans of collinear edge pairs. Rings touching in
    /// a single point share no boundary.
    pub fn shared_boundary_length(&self, a: &[Point2<f64>], b: &[Point2<f64>]) -> f64 {
        let eps = self.epsilon();
        let mut total = 0.0;

        for (a0, a1) in edges(a) {
            let dir = a1 - a0;
            let len = dir.norm();
            if len < eps {
                continue;
            }
            let u = dir / len;

            for (b0, b1) in edges(b) {
                if distance_to_line(b0, a0, a1) >= eps || distance_to_line(b1, a0, a1) >= eps {
                    continue;
                }
                let t0 = (b0 - a0).dot(&u);
                let t1 = (b1 - a0).dot(&u);
                let overlap = t0.max(t1).min(len) - t0.min(t1).max(0.0);
                if overlap > 0.0 {
                    total += overlap;
                }
            }
        }

        total
    }

    /// Split a region with holes into simple rings of the same total area
    ///
    /// Each step cuts the region along the vertical line through the middle
    /// of its first hole, which opens that hole into a notch in both halves.
    pub fn decompose(&self, region: Region) -> Vec<Ring> {
        self.decompose_at(region, 0)
    }

    fn decompose_at(&self, region: Region, depth: usize) -> Vec<Ring> {
        let Some(hole) = region.holes.first() else {
            return vec![region.outer];
        };
        if depth >= MAX_DECOMPOSE_DEPTH {
            warn!(holes = region.holes.len(), "hole decomposition depth exceeded");
            return vec![region.outer];
        }

        let (Some((hole_min, hole_max)), Some((outer_min, outer_max))) =
            (ring_bounds(hole), ring_bounds(&region.outer))
        else {
            return vec![region.outer];
        };

        let cut = 0.5 * (hole_min.x + hole_max.x);
        let margin = 1.0 + (outer_max - outer_min).norm();
        let low = outer_min.y - margin;
        let high = outer_max.y + margin;
        let halves = [
            rectangle(outer_min.x - margin, low, cut, high),
            rectangle(cut, low, outer_max.x + margin, high),
        ];
        trace!(cut, holes = region.holes.len(), depth, "cutting region through hole");

        let anchors: Vec<Point2<f64>> = region
            .outer
            .iter()
            .chain(region.holes.iter().flatten())
            .copied()
            .collect();
        let subject = region_to_paths(&region);

        let mut pieces = Vec::new();
        for half in &halves {
            let parts = self.overlay_paths(
                subject.clone(),
                vec![contour_to_path(half)],
                OverlayRule::Intersect,
                &anchors,
            );
            for part in parts {
                pieces.extend(self.decompose_at(part, depth + 1));
            }
        }
        pieces
    }
}

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Return the contour wound with the requested sense
pub fn orient(contour: &[Point2<f64>], sense: Sense) -> Ring {
    match Sense::of_ring(contour) {
        Some(current) if current != sense => contour.iter().rev().cloned().collect(),
        _ => contour.to_vec(),
    }
}

/// Compute bounding box of a contour
pub fn ring_bounds(contour: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    let first = contour.first()?;
    let mut min = *first;
    let mut max = *first;

    for p in contour.iter().skip(1) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    Some((min, max))
}

fn edges(ring: &[Point2<f64>]) -> impl Iterator<Item = (&Point2<f64>, &Point2<f64>)> {
    let n = ring.len();
    (0..n).map(move |i| (&ring[i], &ring[(i + 1) % n]))
}

/// Distance from `p` to the infinite line through `a` and `b`
fn distance_to_line(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    let ab = b - a;
    let len = ab.norm();
    if len < f64::EPSILON {
        return (p - a).norm();
    }
    let ap = p - a;
    (ab.x * ap.y - ab.y * ap.x).abs() / len
}

/// Closest point to `p` on segment `a`-`b`, with its distance
fn closest_on_segment(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> (Point2<f64>, f64) {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    let t = if len_sq < f64::EPSILON {
        0.0
    } else {
        ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0)
    };
    let q = a + ab * t;
    (q, (p - q).norm())
}

/// Clockwise axis-aligned rectangle
fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Ring {
    vec![
        Point2::new(max_x, max_y),
        Point2::new(max_x, min_y),
        Point2::new(min_x, min_y),
        Point2::new(min_x, max_y),
    ]
}

/// Convert a Point2 contour to i_overlay path format
fn contour_to_path(contour: &[Point2<f64>]) -> Vec<[f64; 2]> {
    contour.iter().map(|p| [p.x, p.y]).collect()
}

fn region_to_paths(region: &Region) -> Vec<Vec<[f64; 2]>> {
    let mut paths = Vec::with_capacity(1 + region.holes.len());
    paths.push(contour_to_path(&region.outer));
    for hole in &region.holes {
        paths.push(contour_to_path(hole));
    }
    paths
}
