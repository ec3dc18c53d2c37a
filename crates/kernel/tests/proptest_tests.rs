//! Property-based tests for Bézier evaluation and extrusion invariants using
//! the `proptest` crate.

use proptest::prelude::*;

use bezier_kernel::geometry::bernstein::{evaluate_curve_bernstein, evaluate_surface_bernstein};
use bezier_kernel::geometry::point::Point3d;
use bezier_kernel::geometry::vector::Vec3;
use bezier_kernel::operations::sampling::detect_lattice;
use bezier_kernel::{
    BezierSurface, ControlGrid, EvalConfig, ExtrusionSpec, MeshOptions, SampleGrid, SurfaceQuery,
    Tolerance, evaluate_curve, extrude, extrude_grid,
};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Arbitrary 3D coordinate tuple in a reasonable floating-point range.
fn arb_point() -> impl Strategy<Value = Point3d> {
    (-100.0f64..100.0, -100.0f64..100.0, -100.0f64..100.0)
        .prop_map(|(x, y, z)| Point3d::new(x, y, z))
}

/// Control polygon with between 2 and 8 points.
fn arb_polygon() -> impl Strategy<Value = Vec<Point3d>> {
    prop::collection::vec(arb_point(), 2..8)
}

/// Control grid with 2 to 5 rows and columns.
fn arb_grid() -> impl Strategy<Value = ControlGrid> {
    (2usize..6, 2usize..6).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(arb_point(), rows * cols).prop_map(move |points| {
            ControlGrid::new(rows, cols, points).expect("strategy builds well-formed grids")
        })
    })
}

/// Direction that is safely away from zero length.
fn arb_direction() -> impl Strategy<Value = Vec3> {
    (-10.0f64..10.0, -10.0f64..10.0, -10.0f64..10.0)
        .prop_map(|(x, y, z)| Vec3::new(x, y, z))
        .prop_filter("direction must not be degenerate", |d| d.length() > 1e-3)
}

fn arb_param() -> impl Strategy<Value = f64> {
    0.0f64..=1.0
}

const TOL: f64 = 1e-9;

// ---------------------------------------------------------------------------
// 1. Curve endpoints: C(0) == P0 and C(1) == Pn exactly
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn curve_interpolates_endpoints(points in arb_polygon()) {
        let first = points[0];
        let last = points[points.len() - 1];
        prop_assert_eq!(evaluate_curve(&points, 0.0).unwrap(), first);
        prop_assert_eq!(evaluate_curve(&points, 1.0).unwrap(), last);
    }
}

// ---------------------------------------------------------------------------
// 2. Surface corners: S(0,0), S(1,0), S(0,1), S(1,1) are the corner controls
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn surface_interpolates_corners(grid in arb_grid()) {
        let corners = grid.corners();
        let surface = BezierSurface::new(grid);
        let params = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
        for ((u, v), expected) in params.into_iter().zip(corners) {
            let p = surface.evaluate(SurfaceQuery::new(u, v)).unwrap();
            prop_assert_eq!(p.point, expected, "corner ({}, {})", u, v);
        }
    }
}

// ---------------------------------------------------------------------------
// 3. Reduction order: rows-first and columns-first agree
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn reduction_order_is_irrelevant(grid in arb_grid(), u in arb_param(), v in arb_param()) {
        let surface = BezierSurface::new(grid);
        let q = SurfaceQuery::new(u, v);
        let a = surface.evaluate(q).unwrap().point;
        let b = surface.evaluate_columns_first(q).unwrap().point;
        prop_assert!(a.distance_to(&b) < TOL, "rows-first {:?} vs columns-first {:?}", a, b);
    }
}

// ---------------------------------------------------------------------------
// 4. De Casteljau matches the Bernstein form
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn de_casteljau_matches_bernstein_curve(points in arb_polygon(), t in arb_param()) {
        let a = evaluate_curve(&points, t).unwrap();
        let b = evaluate_curve_bernstein(&points, t).unwrap();
        prop_assert!(a.distance_to(&b) < TOL, "{:?} vs {:?}", a, b);
    }

    #[test]
    fn de_casteljau_matches_bernstein_surface(
        grid in arb_grid(),
        u in arb_param(),
        v in arb_param(),
    ) {
        let b = evaluate_surface_bernstein(&grid, u, v);
        let a = BezierSurface::new(grid).evaluate(SurfaceQuery::new(u, v)).unwrap().point;
        prop_assert!(a.distance_to(&b) < TOL, "{:?} vs {:?}", a, b);
    }
}

// ---------------------------------------------------------------------------
// 5. Convex hull: every surface point lies in the control points' bounding box
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn surface_stays_in_control_hull(grid in arb_grid(), u in arb_param(), v in arb_param()) {
        let (mut lo, mut hi) = ([f64::INFINITY; 3], [f64::NEG_INFINITY; 3]);
        for p in grid.points() {
            for (axis, c) in p.to_array().into_iter().enumerate() {
                lo[axis] = lo[axis].min(c);
                hi[axis] = hi[axis].max(c);
            }
        }
        let p = BezierSurface::new(grid).evaluate(SurfaceQuery::new(u, v)).unwrap().point;
        for (axis, c) in p.to_array().into_iter().enumerate() {
            prop_assert!(c >= lo[axis] - TOL && c <= hi[axis] + TOL,
                "axis {} value {} outside [{}, {}]", axis, c, lo[axis], hi[axis]);
        }
    }
}

// ---------------------------------------------------------------------------
// 6. Extrusion rib equals normalize(direction) * distance
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn extrusion_rib_matches_spec(
        grid in arb_grid(),
        u in arb_param(),
        v in arb_param(),
        direction in arb_direction(),
        distance in -50.0f64..50.0,
    ) {
        let surface = BezierSurface::new(grid);
        let base = surface.evaluate(SurfaceQuery::new(u, v)).unwrap();
        let pair = extrude(base, &ExtrusionSpec::new(direction, distance)).unwrap();
        let expected = direction.normalized().unwrap() * distance;
        prop_assert!((pair.rib() - expected).length() < 1e-6,
            "rib {:?} expected {:?}", pair.rib(), expected);
        prop_assert!((pair.rib().length() - distance.abs()).abs() < 1e-6);
        prop_assert_eq!(pair.base, base);
        prop_assert_eq!((pair.offset.u, pair.offset.v), (base.u, base.v));
    }
}

// ---------------------------------------------------------------------------
// 7. Zero distance leaves the point where it is
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn zero_distance_is_identity(
        grid in arb_grid(),
        u in arb_param(),
        v in arb_param(),
        direction in arb_direction(),
    ) {
        let surface = BezierSurface::new(grid);
        let base = surface.evaluate(SurfaceQuery::new(u, v)).unwrap();
        let pair = extrude(base, &ExtrusionSpec::new(direction, 0.0)).unwrap();
        prop_assert_eq!(pair.offset.point, base.point);
    }
}

// ---------------------------------------------------------------------------
// 8. Parameter policies: clamp folds onto the boundary, reject refuses
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn clamp_matches_boundary_evaluation(
        grid in arb_grid(),
        u in -3.0f64..4.0,
        v in -3.0f64..4.0,
    ) {
        let surface = BezierSurface::with_config(grid, EvalConfig::clamping());
        let p = surface.evaluate(SurfaceQuery::new(u, v)).unwrap();
        prop_assert!((0.0..=1.0).contains(&p.u) && (0.0..=1.0).contains(&p.v));
        let q = surface
            .evaluate(SurfaceQuery::new(u.clamp(0.0, 1.0), v.clamp(0.0, 1.0)))
            .unwrap();
        prop_assert_eq!(p, q);
    }

    #[test]
    fn reject_refuses_out_of_range(grid in arb_grid(), u in 1.0001f64..10.0, v in arb_param()) {
        let surface = BezierSurface::with_config(grid, EvalConfig::strict());
        let err = surface.evaluate(SurfaceQuery::new(u, v)).unwrap_err();
        prop_assert!(err.is_out_of_range());
        let err = surface.evaluate(SurfaceQuery::new(v, -u)).unwrap_err();
        prop_assert!(err.is_out_of_range());
    }
}

// ---------------------------------------------------------------------------
// 9. Lattice detection recognizes every generated sample grid
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn sample_grids_are_lattices(nu in 2usize..12, nv in 2usize..12) {
        let grid = SampleGrid::new(nu, nv).unwrap();
        let lattice = detect_lattice(&grid.queries(), &Tolerance::default());
        prop_assert_eq!(lattice, Some(grid.lattice()));
    }
}

// ---------------------------------------------------------------------------
// 10. Closed shells are watertight with consistent winding
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn closed_shell_edges_pair_up(
        grid in arb_grid(),
        nu in 2usize..6,
        nv in 2usize..6,
        direction in arb_direction(),
        distance in 0.1f64..20.0,
    ) {
        let surface = BezierSurface::new(grid);
        let samples = SampleGrid::new(nu, nv).unwrap();
        let shell = extrude_grid(
            &surface,
            samples,
            &ExtrusionSpec::new(direction, distance),
            MeshOptions::closed(),
        )
        .unwrap();

        let mut edges = std::collections::HashMap::new();
        for face in &shell.faces {
            for k in 0..4 {
                let e = (face.vertices[k], face.vertices[(k + 1) % 4]);
                *edges.entry(e).or_insert(0usize) += 1;
            }
        }
        for (&(a, b), &count) in &edges {
            prop_assert_eq!(count, 1, "directed edge {}->{} repeated", a, b);
            prop_assert_eq!(edges.get(&(b, a)), Some(&1), "edge {}->{} has no twin", a, b);
        }
    }
}
