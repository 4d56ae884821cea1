use alloc::vec::Vec;

use num_traits::float::Float;

use crate::node::{origin, Node, NodeIndex};
use crate::ring::{is_finite, signed_area};
use crate::Index;

/// A deduplicated vertex buffer plus a triangle index list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexedMesh<T, N> {
    /// `dimension` consecutive values per vertex
    pub vertices: Vec<T>,
    /// three entries per triangle, each a vertex position in `vertices`
    pub indices: Vec<N>,
    /// number of values per vertex
    pub dimension: usize,
}

impl<T: Float, N: Index> IndexedMesh<T, N> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            dimension: 0,
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn vertex_count(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.vertices.len() / self.dimension
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Coordinates of vertex `i`.
    pub fn vertex(&self, i: N) -> &[T] {
        let start = i.into_usize() * self.dimension;
        &self.vertices[start..start + self.dimension]
    }

    /// Expands the mesh back into three points per triangle.
    pub fn to_flat<const D: usize>(&self) -> Vec<[T; D]> {
        self.indices
            .iter()
            .map(|&i| {
                let v = self.vertex(i);
                core::array::from_fn(|d| v.get(d).copied().unwrap_or_else(T::zero))
            })
            .collect()
    }
}

/// Appends three input points per triangle; `point` fetches an input vertex by position.
pub(crate) fn assemble_flat<T: Float, const D: usize>(
    nodes: &[Node<T>],
    triangles: &[[NodeIndex; 3]],
    point: impl Fn(usize) -> [T; D],
    out: &mut Vec<[T; D]>,
) {
    out.reserve(triangles.len() * 3);
    out.extend(
        triangles
            .iter()
            .flatten()
            .map(|&i| point(node!(nodes, i).vertex as usize)),
    );
}

/// Appends each input vertex to the mesh the first time a triangle uses it.
///
/// `slots` memoizes the vertex-buffer position per input vertex; bridge and
/// split duplicates resolve through their source node first.
pub(crate) fn assemble_indexed<T: Float, N: Index, const D: usize>(
    nodes: &[Node<T>],
    triangles: &[[NodeIndex; 3]],
    point: impl Fn(usize) -> [T; D],
    vertex_count: usize,
    slots: &mut Vec<Option<usize>>,
    mesh: &mut IndexedMesh<T, N>,
) {
    slots.clear();
    slots.resize(vertex_count, None);
    mesh.dimension = D;
    mesh.indices.reserve(triangles.len() * 3);

    for &i in triangles.iter().flatten() {
        let vertex = node!(nodes, origin(nodes, i)).vertex as usize;
        let slot = match slots[vertex] {
            Some(slot) => slot,
            None => {
                let slot = mesh.vertices.len() / D;
                mesh.vertices.extend_from_slice(&point(vertex));
                slots[vertex] = Some(slot);
                slot
            }
        };
        mesh.indices.push(N::from_usize(slot));
    }
}

/// Returns the relative difference between the polygon's area (outer ring minus
/// holes) and the area covered by `triangles`, three points each; used to verify
/// a triangulation.
pub fn deviation<T: Float, R: AsRef<[[T; D]]>, const D: usize>(
    rings: &[R],
    triangles: &[[T; D]],
) -> T {
    let mut plane = Vec::new();
    let mut polygon_area = T::zero();
    for (i, ring) in rings.iter().enumerate() {
        let ring = ring.as_ref();
        if ring.len() < 3 {
            continue;
        }
        plane.clear();
        plane.extend(ring.iter().map(|p| [p[0], p[1]]).filter(is_finite));
        let ring_area = signed_area(&plane).abs();
        polygon_area = if i == 0 {
            ring_area
        } else {
            polygon_area - ring_area
        };
    }

    let triangles_area = triangles
        .chunks_exact(3)
        .map(|t| {
            let ([ax, ay], [bx, by], [cx, cy]) =
                ([t[0][0], t[0][1]], [t[1][0], t[1][1]], [t[2][0], t[2][1]]);
            ((ax - cx) * (by - ay) - (ax - bx) * (cy - ay)).abs()
        })
        .fold(T::zero(), |acc, a| acc + a);

    if polygon_area == T::zero() && triangles_area == T::zero() {
        T::zero()
    } else {
        ((polygon_area - triangles_area) / polygon_area).abs()
    }
}
