//! Property-based tests for contour extraction.
//!
//! Random weight fields are laid over a triangulated grid and the extraction,
//! segment building, curve assembly and split invariants are checked.
//!
//! Run with: cargo test --test proptest_contour

#![allow(clippy::unwrap_used, clippy::cast_precision_loss)]

use std::collections::HashSet;

use facemask_contour::field::{FieldNames, MeshFields, ReadFields, WeightField};
use facemask_contour::math::Point3;
use facemask_contour::operations::contour::{
    find_curves, BuildSegments, DisplaceParams, ExtractCrossings, Segment,
};
use facemask_contour::operations::creation::MakeMesh;
use facemask_contour::operations::modification::{SplitAtIso, SplitOutcome};
use facemask_contour::operations::query::IsValid;
use facemask_contour::topology::Mesh;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

const GRID: usize = 4;
const GRID_VERTICES: usize = (GRID + 1) * (GRID + 1);

fn grid_mesh(weights: &[f64]) -> Mesh {
    let row = GRID + 1;
    let mut points = Vec::new();
    for j in 0..row {
        for i in 0..row {
            points.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }
    let mut polygons = Vec::new();
    for j in 0..GRID {
        for i in 0..GRID {
            let v = j * row + i;
            polygons.push(vec![v, v + 1, v + row + 1]);
            polygons.push(vec![v, v + row + 1, v + row]);
        }
    }
    let mut mesh = Mesh::new();
    let ids = MakeMesh::new(points, polygons).execute(&mut mesh).unwrap();
    mesh.add_weight_group("contour", WeightField::from_values(&ids, weights).unwrap());
    mesh
}

fn fields_of(mesh: &Mesh) -> MeshFields {
    ReadFields::new(&FieldNames::default()).execute(mesh).unwrap()
}

fn arb_weights() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0..1.0f64, GRID_VERTICES)
}

fn arb_iso() -> impl Strategy<Value = f64> {
    0.05..0.95f64
}

fn arb_segments() -> impl Strategy<Value = (usize, Vec<Segment>)> {
    (2usize..20).prop_flat_map(|n| {
        let segment = (0..n, 0..n)
            .prop_filter("no self-loops", |(a, b)| a != b)
            .prop_map(|(a, b)| Segment::new(a, b));
        (Just(n), prop::collection::vec(segment, 0..30))
    })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn crossings_lie_on_their_edges(weights in arb_weights(), iso in arb_iso()) {
        let fields = fields_of(&grid_mesh(&weights));
        let Some(set) = ExtractCrossings::new(iso, 0)
            .with_displace(DisplaceParams::none())
            .execute(&fields)
            .unwrap()
            .crossed()
        else {
            return Ok(());
        };

        for c in set.crossings() {
            prop_assert!((0.0..=1.0).contains(&c.t));
            let (wa, wb) = (fields.contour[c.a], fields.contour[c.b]);
            prop_assert_ne!(wa < iso, wb < iso);

            let pa = fields.positions[c.a];
            let pb = fields.positions[c.b];
            let expected = pa + (pb - pa) * c.t;
            prop_assert!((c.position - expected).norm() < 1e-9);
        }
    }

    #[test]
    fn every_sign_change_is_crossed_once(weights in arb_weights(), iso in arb_iso()) {
        let fields = fields_of(&grid_mesh(&weights));
        let expected = fields
            .edges
            .iter()
            .filter(|e| (fields.contour[e.a] < iso) != (fields.contour[e.b] < iso))
            .count();
        let extraction = ExtractCrossings::new(iso, 0).execute(&fields).unwrap();
        let found = extraction.crossed().map_or(0, |set| set.len());
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn one_segment_per_face_with_two_crossings(weights in arb_weights(), iso in arb_iso()) {
        let fields = fields_of(&grid_mesh(&weights));
        if let Some(set) = ExtractCrossings::new(iso, 0).execute(&fields).unwrap().crossed() {
            let segments = BuildSegments::new(&set).execute(&fields);
            prop_assert!(segments.len() <= fields.faces.len());

            let mut two_crossings = 0usize;
            for face in &fields.faces {
                let hits = face.edges.iter().filter(|&&e| set.index_of(e).is_some()).count();
                // a triangle changes side an even number of times
                prop_assert!(hits == 0 || hits == 2, "face with {} crossings", hits);
                if hits == 2 {
                    two_crossings += 1;
                }
            }
            prop_assert_eq!(segments.len(), two_crossings);

            for s in &segments {
                prop_assert!(s.start < set.len() && s.end < set.len());
                prop_assert_ne!(s.start, s.end);
            }
        }
    }

    #[test]
    fn curves_partition_segment_endpoints((n, segments) in arb_segments()) {
        let endpoints: HashSet<usize> = segments.iter().flat_map(|s| [s.start, s.end]).collect();
        let mut seen = HashSet::new();
        for curve in find_curves(&segments, n) {
            prop_assert!(!curve.points().is_empty());
            if curve.is_closed() {
                prop_assert_eq!(curve.first(), curve.last());
                prop_assert!(curve.point_count() >= 3);
            }
            for &p in curve.points() {
                prop_assert!(p < n);
                prop_assert!(seen.insert(p), "point {} appears in two curves", p);
            }
        }
        prop_assert_eq!(seen, endpoints);
    }

    #[test]
    fn assembly_is_deterministic((n, segments) in arb_segments()) {
        let a: Vec<_> = find_curves(&segments, n).collect();
        let b: Vec<_> = find_curves(&segments, n).collect();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn split_keeps_the_mesh_valid(weights in arb_weights(), iso in arb_iso()) {
        let mut mesh = grid_mesh(&weights);
        let faces_before = mesh.num_faces();
        let outcome = SplitAtIso::new("contour", iso).execute(&mut mesh).unwrap();

        prop_assert!(IsValid::new().execute(&mesh));
        if let SplitOutcome::Split(report) = outcome {
            prop_assert!(report.missed_faces.is_empty());
            prop_assert_eq!(
                mesh.num_faces(),
                faces_before - report.removed_faces + report.added_faces.len()
            );
            let group = mesh.weight_group("contour").unwrap();
            for &v in &report.new_vertices {
                prop_assert!((group.weight(v) - iso).abs() < 1e-12);
            }
        } else {
            prop_assert_eq!(mesh.num_faces(), faces_before);
        }
    }
}
