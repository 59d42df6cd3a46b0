// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use surface_intersection::{
    circular_equal, intersect, join, EngineConfig, IntersectionEngine, Polygon,
};

const TOL: f64 = 0.01;

/// Counter-clockwise seen from +Z
fn rectangle_up(x: f64, y: f64, w: f64, h: f64) -> Polygon {
    Polygon::from_coords(&[
        (x, y, 0.0),
        (x + w, y, 0.0),
        (x + w, y + h, 0.0),
        (x, y + h, 0.0),
    ])
    .unwrap()
}

/// Clockwise seen from +Z, the forward sense on the floor plane
fn rectangle_down(x: f64, y: f64, w: f64, h: f64) -> Polygon {
    Polygon::from_coords(&[
        (x + w, y + h, 0.0),
        (x + w, y, 0.0),
        (x, y, 0.0),
        (x, y + h, 0.0),
    ])
    .unwrap()
}

fn same(expected: &Polygon, actual: &Polygon) -> bool {
    circular_equal(expected.vertices(), actual.vertices(), TOL)
}

fn total_area(polygons: &[Polygon]) -> f64 {
    polygons.iter().map(|p| p.area()).sum()
}

fn assert_no_result_both_orders(a: &Polygon, b: &Polygon) {
    assert!(intersect(a, b, TOL).is_none());
    assert!(intersect(b, a, TOL).is_none());
    assert!(join(a, b, TOL).is_none());
    assert!(join(b, a, TOL).is_none());
}

#[test]
fn disjoint_rectangles_have_no_result() {
    assert_no_result_both_orders(
        &rectangle_down(0.0, 0.0, 1.0, 1.0),
        &rectangle_down(3.0, 0.0, 1.0, 1.0),
    );
    assert_no_result_both_orders(
        &rectangle_up(0.0, 0.0, 1.0, 1.0),
        &rectangle_up(3.0, 0.0, 1.0, 1.0),
    );
}

#[test]
fn identical_loops_off_the_floor_have_no_result() {
    let raised_down = Polygon::from_coords(&[
        (1.0, 1.0, 3.0),
        (1.0, 0.0, 3.0),
        (0.0, 0.0, 3.0),
        (0.0, 1.0, 3.0),
    ])
    .unwrap();
    assert_no_result_both_orders(&raised_down, &raised_down.clone());

    let raised_up = raised_down.reversed();
    assert_no_result_both_orders(&raised_up, &raised_up.clone());

    let vertical = Polygon::from_coords(&[
        (0.0, 0.0, 0.0),
        (0.0, 0.0, 1.0),
        (0.0, 1.0, 1.0),
        (0.0, 1.0, 0.0),
    ])
    .unwrap();
    assert_no_result_both_orders(&vertical, &vertical.clone());
}

#[test]
fn identical_forward_loops_fully_overlap() {
    let points1 = rectangle_down(0.0, 0.0, 1.0, 1.0);
    let points2 = rectangle_down(0.0, 0.0, 1.0, 1.0);

    let test = intersect(&points1, &points2, TOL).expect("identical polygons intersect");
    assert!(same(&points1, test.polygon1()), "{}", test.polygon1());
    assert!(same(&points2, test.polygon2()), "{}", test.polygon2());
    assert!(test.new_polygons1().is_empty());
    assert!(test.new_polygons2().is_empty());

    let test = intersect(&points2, &points1, TOL).expect("identical polygons intersect");
    assert!(same(&points2, test.polygon1()), "{}", test.polygon1());
    assert!(same(&points1, test.polygon2()), "{}", test.polygon2());
    assert!(test.new_polygons1().is_empty());
    assert!(test.new_polygons2().is_empty());

    let merged = join(&points1, &points2, TOL).expect("identical polygons join");
    assert!(same(&points1, &merged), "{}", merged);
    let merged = join(&points2, &points1, TOL).expect("identical polygons join");
    assert!(same(&points1, &merged), "{}", merged);
}

#[test]
fn rotated_start_vertex_still_counts_as_identical() {
    let points1 = rectangle_down(0.0, 0.0, 1.0, 1.0);
    let mut shifted = points1.vertices().to_vec();
    shifted.rotate_left(1);
    let points2 = Polygon::new(shifted).unwrap();

    let test = intersect(&points1, &points2, TOL).expect("rotated copy intersects");
    assert!(same(&points1, test.polygon1()));
    assert!(test.new_polygons1().is_empty());
    assert!(test.new_polygons2().is_empty());
}

#[test]
fn reverse_sense_is_rejected() {
    // Both wound up
    assert_no_result_both_orders(
        &rectangle_up(0.0, 0.0, 1.0, 1.0),
        &rectangle_up(0.0, 0.0, 1.0, 1.0),
    );
    // Opposite senses over the same points
    assert_no_result_both_orders(
        &rectangle_up(0.0, 0.0, 1.0, 1.0),
        &rectangle_down(0.0, 0.0, 1.0, 1.0),
    );
}

#[test]
fn adjacent_squares_join_but_do_not_intersect() {
    let points1 = rectangle_down(0.0, 0.0, 1.0, 1.0);
    let points2 = rectangle_down(1.0, 0.0, 1.0, 1.0);

    assert!(intersect(&points1, &points2, TOL).is_none());
    assert!(intersect(&points2, &points1, TOL).is_none());

    let expected = rectangle_down(0.0, 0.0, 2.0, 1.0);
    let merged = join(&points1, &points2, TOL).expect("adjacent squares join");
    assert!(same(&expected, &merged), "{}", merged);
    let merged = join(&points2, &points1, TOL).expect("adjacent squares join");
    assert!(same(&expected, &merged), "{}", merged);

    // Wound up, the same squares are rejected outright
    assert_no_result_both_orders(
        &rectangle_up(0.0, 0.0, 1.0, 1.0),
        &rectangle_up(1.0, 0.0, 1.0, 1.0),
    );
}

#[test]
fn partial_overlap_splits_both_inputs() {
    let points1 = rectangle_down(0.0, 0.0, 2.0, 1.0);
    let points2 = rectangle_down(1.0, 0.0, 2.0, 1.0);
    let overlap = rectangle_down(1.0, 0.0, 1.0, 1.0);

    let test = intersect(&points1, &points2, TOL).expect("overlapping rectangles intersect");
    assert!(same(&overlap, test.polygon1()), "{}", test.polygon1());
    assert!(same(&overlap, test.polygon2()), "{}", test.polygon2());
    assert_eq!(test.new_polygons1().len(), 1);
    assert!(
        same(&rectangle_down(0.0, 0.0, 1.0, 1.0), &test.new_polygons1()[0]),
        "{}",
        test.new_polygons1()[0]
    );
    assert_eq!(test.new_polygons2().len(), 1);
    assert!(
        same(&rectangle_down(2.0, 0.0, 1.0, 1.0), &test.new_polygons2()[0]),
        "{}",
        test.new_polygons2()[0]
    );

    let test = intersect(&points2, &points1, TOL).expect("overlapping rectangles intersect");
    assert!(same(&overlap, test.polygon1()), "{}", test.polygon1());
    assert!(same(&overlap, test.polygon2()), "{}", test.polygon2());
    assert_eq!(test.new_polygons1().len(), 1);
    assert!(same(&rectangle_down(2.0, 0.0, 1.0, 1.0), &test.new_polygons1()[0]));
    assert_eq!(test.new_polygons2().len(), 1);
    assert!(same(&rectangle_down(0.0, 0.0, 1.0, 1.0), &test.new_polygons2()[0]));
}

#[test]
fn partial_overlap_joins_into_one_rectangle() {
    let points1 = rectangle_down(0.0, 0.0, 2.0, 1.0);
    let points2 = rectangle_down(1.0, 0.0, 2.0, 1.0);
    let expected = rectangle_down(0.0, 0.0, 3.0, 1.0);

    let merged = join(&points1, &points2, TOL).expect("overlapping rectangles join");
    assert!(same(&expected, &merged), "{}", merged);
    let merged = join(&points2, &points1, TOL).expect("overlapping rectangles join");
    assert!(same(&expected, &merged), "{}", merged);
}

#[test]
fn intersect_is_symmetric() {
    let a = rectangle_down(0.0, 0.0, 3.0, 2.0);
    let b = rectangle_down(1.0, 1.0, 3.0, 3.0);

    let ab = intersect(&a, &b, TOL).unwrap();
    let ba = intersect(&b, &a, TOL).unwrap().swapped();

    assert!(same(ab.polygon1(), ba.polygon1()));
    assert!(same(ab.polygon2(), ba.polygon2()));
    assert_eq!(ab.new_polygons1().len(), ba.new_polygons1().len());
    assert_eq!(ab.new_polygons2().len(), ba.new_polygons2().len());
    for (x, y) in ab.new_polygons1().iter().zip(ba.new_polygons1()) {
        assert!(same(x, y), "{} vs {}", x, y);
    }
    assert!(same(ab.polygon1(), ab.polygon2()));
}

#[test]
fn contained_polygon_leaves_holed_remainder_as_simple_pieces() {
    let outer = rectangle_down(0.0, 0.0, 4.0, 4.0);
    let inner = rectangle_down(1.0, 1.0, 1.0, 1.0);

    let test = intersect(&outer, &inner, TOL).expect("contained polygon intersects");
    assert!(same(&inner, test.polygon1()));
    assert!(test.new_polygons2().is_empty());
    assert!(test.new_polygons1().len() >= 2);
    assert_relative_eq!(total_area(test.new_polygons1()), 15.0, epsilon = 1e-6);
    for piece in test.new_polygons1() {
        assert_eq!(piece.normal().map(|n| n.z < 0.0), Some(true));
    }

    // The join swallows the inner polygon
    let merged = join(&outer, &inner, TOL).expect("contained polygon joins");
    assert!(same(&outer, &merged), "{}", merged);
}

#[test]
fn concave_overlap_keeps_area_invariant() {
    // U shape [0, 3] x [0, 2] with the notch [1, 2] x [1, 2], wound clockwise
    let u_shape = Polygon::from_coords(&[
        (0.0, 2.0, 0.0),
        (1.0, 2.0, 0.0),
        (1.0, 1.0, 0.0),
        (2.0, 1.0, 0.0),
        (2.0, 2.0, 0.0),
        (3.0, 2.0, 0.0),
        (3.0, 0.0, 0.0),
        (0.0, 0.0, 0.0),
    ])
    .unwrap();
    // Bar across both prongs, overlapping the left prong more
    let bar = rectangle_down(-1.0, 1.5, 3.5, 0.5);

    let test = intersect(&u_shape, &bar, TOL).expect("bar crosses the prongs");
    assert!(same(&rectangle_down(0.0, 1.5, 1.0, 0.5), test.polygon1()), "{}", test.polygon1());

    let overlap = test.polygon1().area();
    assert_relative_eq!(overlap + total_area(test.new_polygons1()), 5.0, epsilon = 1e-6);
    assert_relative_eq!(overlap + total_area(test.new_polygons2()), 1.75, epsilon = 1e-6);
    assert_eq!(test.new_polygons1().len(), 1);
    assert_eq!(test.new_polygons2().len(), 2);
}

#[test]
fn corner_contact_does_not_join() {
    assert_no_result_both_orders(
        &rectangle_down(0.0, 0.0, 1.0, 1.0),
        &rectangle_down(1.0, 1.0, 1.0, 1.0),
    );
}

#[test]
fn noise_within_tolerance_is_absorbed() {
    let points1 = rectangle_down(0.0, 0.0, 2.0, 1.0);
    let points2 = Polygon::from_coords(&[
        (3.0, 1.003, 0.002),
        (3.0, 0.0, -0.001),
        (1.004, -0.002, 0.0),
        (0.997, 0.998, 0.0),
    ])
    .unwrap();

    let test = intersect(&points1, &points2, TOL).expect("noisy rectangles intersect");
    assert!(same(&rectangle_down(1.0, 0.0, 1.0, 1.0), test.polygon1()), "{}", test.polygon1());
    assert_eq!(test.new_polygons1().len(), 1);
    assert_eq!(test.new_polygons2().len(), 1);

    let merged = join(&points1, &points2, TOL).expect("noisy rectangles join");
    assert!(same(&rectangle_down(0.0, 0.0, 3.0, 1.0), &merged), "{}", merged);
}

#[test]
fn walls_intersect_without_reference_plane() {
    // Two overlapping panels on the plane x = 5, outward normal +X
    let panel = |y0: f64, y1: f64| {
        Polygon::from_coords(&[
            (5.0, y0, 0.0),
            (5.0, y1, 0.0),
            (5.0, y1, 3.0),
            (5.0, y0, 3.0),
        ])
        .unwrap()
    };
    let a = panel(0.0, 2.0);
    let b = panel(1.0, 4.0);

    // Rejected on the canonical floor plane
    assert!(intersect(&a, &b, TOL).is_none());

    let engine = IntersectionEngine::new(EngineConfig::with_tolerance(TOL).reference_plane(None));
    let test = engine.intersect(&a, &b).expect("coplanar walls intersect");
    assert!(same(&panel(1.0, 2.0), test.polygon1()), "{}", test.polygon1());
    assert!(test.polygon1().vertices().iter().all(|p| (p.x - 5.0).abs() < 1e-9));
    assert_eq!(test.new_polygons1().len(), 1);
    assert!(same(&panel(0.0, 1.0), &test.new_polygons1()[0]));
    assert_eq!(test.new_polygons2().len(), 1);
    assert!(same(&panel(2.0, 4.0), &test.new_polygons2()[0]));

    let merged = engine.join(&a, &b).expect("coplanar walls join");
    assert!(same(&panel(0.0, 4.0), &merged), "{}", merged);

    // Opposite windings still fail without a reference plane
    assert!(engine.intersect(&a, &b.reversed()).is_none());
    assert!(engine.join(&a, &b.reversed()).is_none());
}
