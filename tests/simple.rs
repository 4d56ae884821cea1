use footprint_earcut::{deviation, Config, IndexedMesh, Projection, Triangulator};

const SQUARE: [[f64; 2]; 4] = [[0., 0.], [10., 0.], [10., 10.], [0., 10.]];
const SQUARE_HOLE: [[f64; 2]; 4] = [[3., 3.], [7., 3.], [7., 7.], [3., 7.]];
const L_SHAPE: [[f64; 2]; 6] = [[0., 0.], [10., 0.], [10., 5.], [5., 5.], [5., 10.], [0., 10.]];

fn flat<R: AsRef<[[f64; D]]>, const D: usize>(rings: &[R]) -> Vec<[f64; D]> {
    let mut out = Vec::new();
    Triangulator::new().triangulate_flat(rings, &mut out);
    out
}

fn doubled_area(t: &[[f64; 2]]) -> f64 {
    (t[1][0] - t[0][0]) * (t[2][1] - t[0][1]) - (t[2][0] - t[0][0]) * (t[1][1] - t[0][1])
}

#[test]
fn empty() {
    let none: &[[f64; 2]] = &[];
    let empty: &[&[[f64; 2]]] = &[];
    assert!(flat(empty).is_empty());
    assert!(flat(&[none]).is_empty());
    assert!(flat(&[none, &SQUARE_HOLE[..]]).is_empty());
}

#[test]
fn too_few_points() {
    assert!(flat(&[&[[1., 1.]]]).is_empty());
    assert!(flat(&[&[[1., 1.], [2., 2.]]]).is_empty());
    // collinear
    let line = [[0., 0.], [1., 1.], [2., 2.], [3., 3.]];
    assert!(flat(&[line]).is_empty());
}

#[test]
fn square() {
    let triangles = flat(&[&SQUARE[..]]);
    assert_eq!(triangles.len(), 2 * 3);
    assert_eq!(deviation(&[SQUARE], &triangles), 0.0);
}

#[test]
fn square_with_hole() {
    let triangles = flat(&[&SQUARE[..], &SQUARE_HOLE[..]]);
    assert_eq!(triangles.len(), 8 * 3);
    assert_eq!(deviation(&[&SQUARE[..], &SQUARE_HOLE[..]], &triangles), 0.0);
    // hole points are emitted as given
    assert!(triangles.contains(&[7., 7.]));
}

#[test]
fn l_shape() {
    let triangles = flat(&[&L_SHAPE[..]]);
    assert_eq!(triangles.len(), 4 * 3);
    assert_eq!(deviation(&[L_SHAPE], &triangles), 0.0);
}

#[test]
fn winding_does_not_matter() {
    let mut outer = SQUARE;
    outer.reverse();
    let mut hole = SQUARE_HOLE;
    hole.reverse();
    for rings in [
        [&SQUARE[..], &hole[..]],
        [&outer[..], &SQUARE_HOLE[..]],
        [&outer[..], &hole[..]],
    ] {
        let triangles = flat(&rings);
        assert_eq!(triangles.len(), 8 * 3);
        assert_eq!(deviation(&rings, &triangles), 0.0);
    }
}

#[test]
fn collinear_and_repeated_points_are_ignored() {
    let outer = [[0., 0.], [5., 0.], [10., 0.], [10., 0.], [10., 10.], [0., 10.], [0., 10.]];
    let triangles = flat(&[&outer[..]]);
    assert_eq!(triangles.len(), 2 * 3);
    assert_eq!(deviation(&[outer], &triangles), 0.0);
}

#[test]
fn degenerate_holes_are_dropped() {
    let point_hole = [[5., 5.]];
    let line_hole = [[2., 2.], [4., 4.]];
    let none: &[[f64; 2]] = &[];
    let triangles = flat(&[&SQUARE[..], &point_hole[..], &line_hole[..], none]);
    assert_eq!(triangles.len(), 2 * 3);
}

#[test]
fn convex_polygon() {
    let n = 24;
    let ring: Vec<[f64; 2]> = (0..n)
        .map(|i| {
            let a = std::f64::consts::TAU * i as f64 / n as f64;
            [100. * a.cos(), 100. * a.sin()]
        })
        .collect();
    let triangles = flat(&[&ring[..]]);
    assert_eq!(triangles.len(), (n - 2) * 3);
    assert!(deviation(&[&ring], &triangles) < 1e-12);

    // same orientation for every triangle, none degenerate
    let sign = doubled_area(&triangles[..3]).signum();
    for t in triangles.chunks_exact(3) {
        let a = doubled_area(t);
        assert!(a != 0.0);
        assert_eq!(a.signum(), sign);
    }
}

#[test]
fn self_intersecting_input_terminates() {
    let bowtie = [[0., 0.], [10., 10.], [10., 0.], [0., 10.]];
    let config = Config::default().with_max_operations(1000);
    let mut triangulator = Triangulator::with_config(config).unwrap();
    let mut out = Vec::new();
    triangulator.triangulate_flat(&[bowtie], &mut out);
    // one ear survives; the crossing is cured away without a split
    assert_eq!(out, [[0., 10.], [10., 0.], [10., 10.]]);
    let stats = triangulator.stats();
    assert_eq!(stats.refilter_passes, 1);
    assert_eq!(stats.cure_passes, 1);
    assert_eq!(stats.splits, 0);
    assert!(!stats.exhausted);
}

#[test]
fn stalled_ring_is_split() {
    let ring = [
        [53., 95.],
        [13., -13.],
        [49., -17.],
        [-7., -48.],
        [-68., 41.],
        [-14., 88.],
        [29., -24.],
        [67., -98.],
    ];
    let mut triangulator = Triangulator::new();
    let mut out = Vec::new();
    triangulator.triangulate_flat(&[ring], &mut out);
    let stats = triangulator.stats().clone();
    assert_eq!(stats.splits, 1);
    assert!(stats.cure_passes >= 1);
    assert!(!stats.exhausted);
    assert_eq!(out.len(), 5 * 3);
    for p in &out {
        assert!(ring.contains(p));
    }

    let mut mesh = IndexedMesh::<f64, u32>::new();
    triangulator.triangulate_indexed(&[ring], &mut mesh);
    assert_eq!(triangulator.stats(), &stats);
    assert_eq!(mesh.to_flat::<2>(), out);
}

#[test]
fn non_finite_points_are_dropped() {
    let ring = [
        [0., 0.],
        [f64::NAN, 5.],
        [10., 0.],
        [10., 10.],
        [0., 10.],
        [f64::INFINITY, 3.],
    ];
    let triangles = flat(&[ring]);
    assert_eq!(triangles.len(), 2 * 3);
    assert!(triangles.iter().flatten().all(|c| c.is_finite()));
    assert_eq!(deviation(&[ring], &triangles), 0.0);

    let mut mesh = IndexedMesh::<f64, u32>::new();
    Triangulator::new().triangulate_indexed(&[ring], &mut mesh);
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.to_flat::<2>(), triangles);
}

#[test]
fn budget_stops_the_work() {
    let config = Config::default().with_max_operations(1);
    let mut triangulator = Triangulator::with_config(config).unwrap();
    let mut out = Vec::new();
    triangulator.triangulate_flat(&[L_SHAPE], &mut out);
    let stats = triangulator.stats();
    assert!(stats.exhausted);
    assert_eq!(stats.operations(), 1);
    assert!(out.len() <= 3);
}

#[test]
fn reuse_gives_same_result() {
    let mut triangulator = Triangulator::new();
    let (mut first, mut second) = (Vec::new(), Vec::new());
    triangulator.triangulate_flat(&[&SQUARE[..], &SQUARE_HOLE[..]], &mut first);
    triangulator.triangulate_flat(&[L_SHAPE], &mut second);
    triangulator.triangulate_flat(&[&SQUARE[..], &SQUARE_HOLE[..]], &mut second);
    assert_eq!(first, second);
}

#[test]
fn indexed_matches_flat() {
    let rings = [&SQUARE[..], &SQUARE_HOLE[..]];
    let mut triangulator = Triangulator::new();
    let mut triangles = Vec::new();
    triangulator.triangulate_flat(&rings, &mut triangles);

    let mut mesh = IndexedMesh::<f64, u32>::new();
    triangulator.triangulate_indexed(&rings, &mut mesh);
    assert_eq!(mesh.dimension, 2);
    assert_eq!(mesh.triangle_count(), 8);
    // bridge duplicates share the input vertex
    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(mesh.to_flat::<2>(), triangles);
}

#[test]
fn indexed_vertices_in_first_use_order() {
    let mut mesh = IndexedMesh::<f64, u16>::new();
    Triangulator::new().triangulate_indexed(&[L_SHAPE], &mut mesh);
    assert_eq!(mesh.vertex_count(), 6);
    let mut seen = 0;
    for &i in &mesh.indices {
        assert!(i as usize <= seen);
        if i as usize == seen {
            seen += 1;
        }
    }
    assert_eq!(seen, 6);
}

#[test]
fn index_types() {
    let mut triangulator = Triangulator::new();
    let mut small = IndexedMesh::<f64, u16>::new();
    let mut wide = IndexedMesh::<f64, usize>::new();
    triangulator.triangulate_indexed(&[&SQUARE[..], &SQUARE_HOLE[..]], &mut small);
    triangulator.triangulate_indexed(&[&SQUARE[..], &SQUARE_HOLE[..]], &mut wide);
    assert_eq!(small.vertices, wide.vertices);
    let widened: Vec<usize> = small.indices.iter().map(|&i| i as usize).collect();
    assert_eq!(widened, wide.indices);
}

#[test]
fn indexed_mesh_is_cleared() {
    let mut triangulator = Triangulator::new();
    let mut mesh = IndexedMesh::<f64, u32>::new();
    triangulator.triangulate_indexed(&[L_SHAPE], &mut mesh);
    triangulator.triangulate_indexed(&[SQUARE], &mut mesh);
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangle_count(), 2);
}

#[test]
fn extra_coordinates_pass_through() {
    let ring = [[0., 0., 5., 1.], [10., 0., 5., 2.], [10., 10., 5., 3.], [0., 10., 5., 4.]];
    let triangles = flat(&[&ring[..]]);
    assert_eq!(triangles.len(), 2 * 3);
    for p in &triangles {
        assert!(ring.contains(p));
    }

    let mut mesh = IndexedMesh::<f64, u32>::new();
    Triangulator::new().triangulate_indexed(&[ring], &mut mesh);
    assert_eq!(mesh.dimension, 4);
    assert_eq!(mesh.vertices.len(), 4 * 4);
}

#[test]
fn best_fit_triangulates_walls() {
    let wall = [[0., 0., 0.], [4., 0., 0.], [4., 0., 3.], [0., 0., 3.]];
    let window = [[1., 0., 1.], [1., 0., 2.], [3., 0., 2.], [3., 0., 1.]];

    // seen from above the wall is a line
    assert!(flat(&[&wall[..]]).is_empty());

    let config = Config::default().with_projection(Projection::BestFit);
    let mut triangulator = Triangulator::with_config(config).unwrap();
    let mut out = Vec::new();
    triangulator.triangulate_flat(&[&wall[..], &window[..]], &mut out);
    assert_eq!(out.len(), 8 * 3);
    for p in &out {
        assert_eq!(p[1], 0.0);
    }
}

#[test]
fn best_fit_without_third_coordinate_uses_xy() {
    let config = Config::default().with_projection(Projection::BestFit);
    let mut triangulator = Triangulator::with_config(config).unwrap();
    let mut out = Vec::new();
    triangulator.triangulate_flat(&[L_SHAPE], &mut out);
    assert_eq!(out.len(), 4 * 3);
}

#[test]
fn f32_coordinates() {
    let ring: [[f32; 2]; 4] = [[0., 0.], [1., 0.], [1., 1.], [0., 1.]];
    let mut out = Vec::new();
    Triangulator::<f32>::new().triangulate_flat(&[ring], &mut out);
    assert_eq!(out.len(), 2 * 3);
}
