//! Ear-clipping triangulation of building footprints, roof faces and walls,
//! after [Earcut](https://github.com/mapbox/earcut).
//!
//! A polygon is a slice of rings: the first ring is the outer boundary, every
//! following ring is a hole. Rings are open (the last point is not repeated) and
//! may be wound either way.
//!
//! ```
//! use footprint_earcut::{IndexedMesh, Triangulator};
//!
//! let square = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
//! let mut triangulator = Triangulator::new();
//!
//! let mut triangles = Vec::new();
//! triangulator.triangulate_flat(&[square], &mut triangles);
//! assert_eq!(triangles.len(), 2 * 3);
//!
//! let mut mesh = IndexedMesh::<f64, u32>::new();
//! triangulator.triangulate_indexed(&[square], &mut mesh);
//! assert_eq!(mesh.vertex_count(), 4);
//! assert_eq!(mesh.indices.len(), 2 * 3);
//! ```

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

macro_rules! node {
    ($nodes:expr, $index:expr) => {
        &$nodes[$index.get() as usize]
    };
}

macro_rules! node_mut {
    ($nodes:expr, $index:expr) => {
        &mut $nodes[$index.get() as usize]
    };
}

mod config;
mod earcut;
mod error;
mod geom;
mod holes;
mod node;
mod output;
mod ring;
pub mod utils3d;
mod zorder;

pub use config::{Config, Projection, DEFAULT_CURVE_INDEX_THRESHOLD, DEFAULT_CURVE_RESOLUTION};
pub use earcut::TriangulationStats;
pub use error::ConfigError;
pub use output::{deviation, IndexedMesh};

use alloc::vec::Vec;
use num_traits::float::Float;

use earcut::{Clipper, Pass};
use node::{Node, NodeIndex};
use ring::{filter_points, linked_list};
use zorder::Curve;

/// Index of a vertex
///
/// `from_usize` truncates values that do not fit the type (checked only in
/// debug builds); pick a type wide enough for the number of input points.
pub trait Index: Copy {
    fn into_usize(self) -> usize;
    fn from_usize(v: usize) -> Self;
}

macro_rules! impl_index {
    ($($ty:ty),*) => {
        $(impl Index for $ty {
            fn into_usize(self) -> usize {
                self as usize
            }
            fn from_usize(v: usize) -> Self {
                debug_assert!(
                    v <= <$ty>::MAX as usize,
                    "vertex index {v} does not fit in {}",
                    stringify!($ty)
                );
                v as Self
            }
        })*
    };
}

impl_index!(u16, u32, usize);

/// Resolves a position in the concatenated input to its point.
struct Rings<'a, R> {
    rings: &'a [R],
    /// exclusive end position of every ring
    ends: &'a [usize],
}

impl<R> Rings<'_, R> {
    fn point<T: Copy, const D: usize>(&self, vertex: usize) -> [T; D]
    where
        R: AsRef<[[T; D]]>,
    {
        let ring = self.ends.partition_point(|&end| end <= vertex);
        let start = match ring {
            0 => 0,
            _ => self.ends[ring - 1],
        };
        self.rings[ring].as_ref()[vertex - start]
    }
}

/// Reusable triangulation state.
///
/// A single instance can be reused for many polygons to avoid repeated
/// allocations. Instances are independent; run one per thread.
pub struct Triangulator<T: Float> {
    config: Config,
    ring_ends: Vec<usize>,
    /// working 2D coordinates of every input point
    plane: Vec<[T; 2]>,
    nodes: Vec<Node<T>>,
    queue: Vec<NodeIndex>,
    work: Vec<(NodeIndex, Pass)>,
    triangles: Vec<[NodeIndex; 3]>,
    slots: Vec<Option<usize>>,
    stats: TriangulationStats,
}

impl<T: Float> Default for Triangulator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> Triangulator<T> {
    /// Creates a triangulator with the default [`Config`].
    pub fn new() -> Self {
        Self::from_valid_config(Config::default())
    }

    pub fn with_config(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: Config) -> Self {
        Self {
            config,
            ring_ends: Vec::new(),
            plane: Vec::new(),
            nodes: Vec::new(),
            queue: Vec::new(),
            work: Vec::new(),
            triangles: Vec::new(),
            slots: Vec::new(),
            stats: TriangulationStats::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Counters of the most recent call.
    pub fn stats(&self) -> &TriangulationStats {
        &self.stats
    }

    /// Triangulates a polygon, writing three input points per triangle to
    /// `triangles_out` (which is cleared first).
    ///
    /// Vertices shared by several triangles are repeated. Points may carry any
    /// number `D >= 2` of coordinates; only the working plane (see
    /// [`Projection`]) is used for the geometry, the points are copied as given.
    pub fn triangulate_flat<R, const D: usize>(
        &mut self,
        rings: &[R],
        triangles_out: &mut Vec<[T; D]>,
    ) where
        R: AsRef<[[T; D]]>,
    {
        triangles_out.clear();
        self.triangulate_impl(rings);
        let input = Rings {
            rings,
            ends: &self.ring_ends,
        };
        output::assemble_flat(
            &self.nodes,
            &self.triangles,
            |v| input.point(v),
            triangles_out,
        );
    }

    /// Triangulates a polygon into `mesh` (which is cleared first).
    ///
    /// Every input vertex used by a triangle is stored once, in order of first
    /// use, and triangles refer to it through `N`. `N` must be wide enough for
    /// the number of input points.
    pub fn triangulate_indexed<R, N: Index, const D: usize>(
        &mut self,
        rings: &[R],
        mesh: &mut IndexedMesh<T, N>,
    ) where
        R: AsRef<[[T; D]]>,
    {
        mesh.clear();
        self.triangulate_impl(rings);
        let input = Rings {
            rings,
            ends: &self.ring_ends,
        };
        output::assemble_indexed(
            &self.nodes,
            &self.triangles,
            |v| input.point(v),
            self.plane.len(),
            &mut self.slots,
            mesh,
        );
    }

    fn triangulate_impl<R, const D: usize>(&mut self, rings: &[R])
    where
        R: AsRef<[[T; D]]>,
    {
        const { assert!(D >= 2, "points need at least two coordinates") };

        self.stats = TriangulationStats::default();
        self.triangles.clear();
        self.ring_ends.clear();
        self.plane.clear();

        let mut total = 0;
        for ring in rings {
            total += ring.as_ref().len();
            self.ring_ends.push(total);
        }
        let Some(&outer_len) = self.ring_ends.first() else {
            return;
        };
        if outer_len < 3 {
            log::trace!("outer ring has {outer_len} points; nothing to triangulate");
            return;
        }

        self.fill_plane(rings);
        node::reset(&mut self.nodes, total + 2 * rings.len());

        let Some(outer_i) = linked_list(&mut self.nodes, &self.plane, 0, outer_len, true) else {
            return;
        };
        let Some(mut outer_i) = filter_points(&mut self.nodes, outer_i, None) else {
            log::trace!("outer ring degenerates to a point");
            return;
        };

        // the index only pays off on larger inputs
        let curve = if total > self.config.curve_index_threshold {
            Curve::fit(&self.nodes, outer_i, self.config.curve_resolution)
        } else {
            None
        };
        self.stats.curve_indexed = curve.is_some();
        if curve.is_some() {
            log::debug!("{total} points; using the z-order curve index");
        }

        if rings.len() > 1 {
            let holes = self.ring_ends.windows(2).map(|w| (w[0], w[1]));
            let merged = holes::eliminate_holes(
                &mut self.nodes,
                &mut self.queue,
                &self.plane,
                holes,
                outer_i,
            );
            match merged {
                Some(merged_i) => outer_i = merged_i,
                None => return,
            }
        }

        Clipper {
            nodes: &mut self.nodes,
            triangles: &mut self.triangles,
            work: &mut self.work,
            stats: &mut self.stats,
            curve,
            budget: self.config.max_operations,
        }
        .run(outer_i);

        log::trace!(
            "{} points in {} rings -> {} triangles ({} operations)",
            total,
            rings.len(),
            self.triangles.len(),
            self.stats.operations()
        );
    }

    /// Derives the working 2D coordinates of every input point.
    fn fill_plane<R, const D: usize>(&mut self, rings: &[R])
    where
        R: AsRef<[[T; D]]>,
    {
        let points = || rings.iter().flat_map(|ring| ring.as_ref().iter().copied());
        if self.config.projection == Projection::BestFit && D >= 3 {
            if let Some(outer) = rings.first() {
                if utils3d::project3d_to_2d(outer.as_ref(), points(), &mut self.plane) {
                    return;
                }
            }
            log::debug!("outer ring has no usable normal; using x and y as given");
        }
        self.plane.extend(points().map(|p| [p[0], p[1]]));
    }
}
