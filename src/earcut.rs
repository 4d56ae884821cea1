//! The ear slicing loop and its fallback passes.

use alloc::vec::Vec;

use num_traits::float::Float;

use crate::geom::{
    area, blocks_ear, equals, intersects, intersects_polygon, locally_inside, middle_inside,
};
use crate::node::{origin, remove_node, same_vertex, split_polygon, Node, NodeIndex};
use crate::ring::filter_points;
use crate::zorder::{index_curve, Curve};

/// Escalation level of a ring that is being clipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Pass {
    /// plain ear slicing (rebuilds the curve index if there is one)
    Initial,
    /// after re-filtering degenerate points
    Refiltered,
    /// after curing local self-intersections; stalling here splits the ring
    Cured,
}

/// Counters describing the work done by the last triangulation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriangulationStats {
    /// candidate ears tested
    pub ear_tests: usize,
    /// candidate diagonals tested while looking for a split
    pub diagonal_tests: usize,
    /// rings that stalled in the initial pass and were re-filtered
    pub refilter_passes: usize,
    /// rings that needed local self-intersection curing
    pub cure_passes: usize,
    /// rings split in two along a diagonal
    pub splits: usize,
    /// whether the z-order curve index was used
    pub curve_indexed: bool,
    /// whether the operation budget ran out before the ring was consumed
    pub exhausted: bool,
}

impl TriangulationStats {
    /// Ear tests plus diagonal tests; this is what `max_operations` caps.
    pub fn operations(&self) -> usize {
        self.ear_tests + self.diagonal_tests
    }
}

enum Clip {
    Done,
    Stalled(NodeIndex),
    OutOfBudget,
}

/// Consumes rings from a work stack, emitting node triangles.
pub(crate) struct Clipper<'a, T: Float> {
    pub nodes: &'a mut Vec<Node<T>>,
    pub triangles: &'a mut Vec<[NodeIndex; 3]>,
    pub work: &'a mut Vec<(NodeIndex, Pass)>,
    pub stats: &'a mut TriangulationStats,
    pub curve: Option<Curve<T>>,
    pub budget: Option<usize>,
}

impl<T: Float> Clipper<'_, T> {
    /// Triangulates the ring containing `start` and every ring split off it.
    pub fn run(&mut self, start: NodeIndex) {
        self.work.clear();
        self.work.push((start, Pass::Initial));

        while let Some((ear_i, pass)) = self.work.pop() {
            match self.clip(ear_i, pass) {
                Clip::Done => {}
                Clip::Stalled(ear_i) => self.escalate(ear_i, pass),
                Clip::OutOfBudget => {
                    log::warn!(
                        "operation budget exhausted after {} operations; {} triangles kept",
                        self.stats.operations(),
                        self.triangles.len()
                    );
                    self.work.clear();
                    return;
                }
            }
        }
    }

    /// Slices ears off the ring until it is consumed or no ear is left.
    fn clip(&mut self, mut ear_i: NodeIndex, pass: Pass) -> Clip {
        if pass == Pass::Initial {
            if let Some(curve) = self.curve {
                index_curve(self.nodes, ear_i, &curve);
            }
        }

        let mut stop_i = ear_i;
        loop {
            let ear = node!(self.nodes, ear_i);
            if ear.prev_i == ear.next_i {
                return Clip::Done;
            }
            let (prev_i, next_i) = (ear.prev_i, ear.next_i);

            if !self.spend() {
                return Clip::OutOfBudget;
            }
            self.stats.ear_tests += 1;

            let is_ear = match self.curve {
                Some(curve) => is_ear_hashed(self.nodes, ear_i, &curve),
                None => is_ear(self.nodes, ear_i),
            };
            if is_ear {
                self.triangles.push([prev_i, ear_i, next_i]);
                remove_node(self.nodes, ear_i);

                // skipping the next vertex leads to less sliver triangles
                ear_i = node!(self.nodes, next_i).next_i;
                stop_i = ear_i;
                continue;
            }

            ear_i = next_i;
            // looped through the whole remaining ring without finding an ear
            if ear_i == stop_i {
                return Clip::Stalled(ear_i);
            }
        }
    }

    fn escalate(&mut self, ear_i: NodeIndex, pass: Pass) {
        match pass {
            Pass::Initial => {
                self.stats.refilter_passes += 1;
                if let Some(ear_i) = filter_points(self.nodes, ear_i, None) {
                    self.work.push((ear_i, Pass::Refiltered));
                }
            }
            Pass::Refiltered => {
                self.stats.cure_passes += 1;
                log::debug!("no ear after re-filtering; curing local self-intersections");
                let cured = filter_points(self.nodes, ear_i, None).and_then(|ear_i| {
                    cure_local_intersections(self.nodes, ear_i, self.triangles)
                });
                if let Some(ear_i) = cured {
                    self.work.push((ear_i, Pass::Cured));
                }
            }
            Pass::Cured => {
                if let Some((a_i, c_i)) = self.split(ear_i) {
                    // `a` half first
                    self.work.extend(c_i.map(|c_i| (c_i, Pass::Initial)));
                    self.work.extend(a_i.map(|a_i| (a_i, Pass::Initial)));
                }
            }
        }
    }

    /// Looks for a valid diagonal and splits the ring along it.
    ///
    /// Returns the filtered halves, either of which may have collapsed.
    fn split(&mut self, start_i: NodeIndex) -> Option<(Option<NodeIndex>, Option<NodeIndex>)> {
        let mut a_i = start_i;
        loop {
            let a = node!(self.nodes, a_i);
            let (a_prev_i, a_next_i) = (a.prev_i, a.next_i);

            let mut b_i = node!(self.nodes, a_next_i).next_i;
            while b_i != a_prev_i {
                if !self.spend() {
                    log::warn!("operation budget exhausted while searching for a split");
                    return None;
                }
                self.stats.diagonal_tests += 1;

                if !same_vertex(self.nodes, a_i, b_i) && is_valid_diagonal(self.nodes, a_i, b_i) {
                    self.stats.splits += 1;
                    log::debug!(
                        "splitting ring along diagonal {} - {}",
                        node!(self.nodes, a_i).vertex,
                        node!(self.nodes, b_i).vertex
                    );
                    let c_i = split_polygon(self.nodes, a_i, b_i);

                    // filter collinear points around the cuts
                    let end_i = node!(self.nodes, a_i).next_i;
                    let a_half = filter_points(self.nodes, a_i, Some(end_i));
                    let end_i = node!(self.nodes, c_i).next_i;
                    let c_half = filter_points(self.nodes, c_i, Some(end_i));
                    return Some((a_half, c_half));
                }
                b_i = node!(self.nodes, b_i).next_i;
            }

            a_i = a_next_i;
            if a_i == start_i {
                log::debug!("no valid diagonal found; remaining ring dropped");
                return None;
            }
        }
    }

    fn spend(&mut self) -> bool {
        match self.budget {
            Some(max) if self.stats.operations() >= max => {
                self.stats.exhausted = true;
                false
            }
            _ => true,
        }
    }
}

/// check whether a ring node forms a valid ear with its neighbours
fn is_ear<T: Float>(nodes: &[Node<T>], ear_i: NodeIndex) -> bool {
    let b = node!(nodes, ear_i);
    let a = node!(nodes, b.prev_i);
    let c = node!(nodes, b.next_i);

    if area(a, b, c) >= T::zero() {
        // reflex, can't be an ear
        return false;
    }

    let (x0, y0) = (a.x.min(b.x.min(c.x)), a.y.min(b.y.min(c.y)));
    let (x1, y1) = (a.x.max(b.x.max(c.x)), a.y.max(b.y.max(c.y)));

    // every other vertex of the ring must stay out of the triangle
    let mut p_i = c.next_i;
    while p_i != b.prev_i {
        let p = node!(nodes, p_i);
        if p.x >= x0 && p.x <= x1 && p.y >= y0 && p.y <= y1 && blocks_ear(a, b, c, p) {
            return false;
        }
        p_i = p.next_i;
    }
    true
}

/// same as [`is_ear`], but only scans nodes whose curve key falls within the
/// triangle's bounding box
fn is_ear_hashed<T: Float>(nodes: &[Node<T>], ear_i: NodeIndex, curve: &Curve<T>) -> bool {
    let b = node!(nodes, ear_i);
    let a = node!(nodes, b.prev_i);
    let c = node!(nodes, b.next_i);

    if area(a, b, c) >= T::zero() {
        return false;
    }

    let (x0, y0) = (a.x.min(b.x.min(c.x)), a.y.min(b.y.min(c.y)));
    let (x1, y1) = (a.x.max(b.x.max(c.x)), a.y.max(b.y.max(c.y)));
    let min_z = curve.key(x0, y0);
    let max_z = curve.key(x1, y1);

    let a_src = origin(nodes, b.prev_i);
    let c_src = origin(nodes, b.next_i);
    let blocks = |p_i: NodeIndex| {
        let p = node!(nodes, p_i);
        let src = origin(nodes, p_i);
        src != a_src
            && src != c_src
            && p.x >= x0
            && p.x <= x1
            && p.y >= y0
            && p.y <= y1
            && blocks_ear(a, b, c, p)
    };

    // increasing z-order first
    let mut n = b.next_z_i;
    while let Some(n_i) = n {
        let node = node!(nodes, n_i);
        if node.z.unwrap_or(0) > max_z {
            break;
        }
        if blocks(n_i) {
            return false;
        }
        n = node.next_z_i;
    }

    // then decreasing
    let mut p = b.prev_z_i;
    while let Some(p_i) = p {
        let node = node!(nodes, p_i);
        if node.z.unwrap_or(0) < min_z {
            break;
        }
        if blocks(p_i) {
            return false;
        }
        p = node.prev_z_i;
    }
    true
}

/// Cures small local self-intersections: wherever edge `(a, p)` crosses
/// `(p.next, b)`, emit `(a, p, b)` and drop the two middle nodes.
fn cure_local_intersections<T: Float>(
    nodes: &mut [Node<T>],
    mut start_i: NodeIndex,
    triangles: &mut Vec<[NodeIndex; 3]>,
) -> Option<NodeIndex> {
    let mut p_i = start_i;
    loop {
        let p = node!(nodes, p_i);
        if p.prev_i == p.next_i {
            return filter_points(nodes, p_i, None);
        }
        let a_i = p.prev_i;
        let p_next_i = p.next_i;
        let p_next = node!(nodes, p_next_i);
        let b_i = p_next.next_i;
        let a = node!(nodes, a_i);
        let b = node!(nodes, b_i);

        if !equals(a, b)
            && intersects(a, p, p_next, b)
            && locally_inside(nodes, a, b)
            && locally_inside(nodes, b, a)
        {
            triangles.push([a_i, p_i, b_i]);
            remove_node(nodes, p_i);
            remove_node(nodes, p_next_i);
            p_i = b_i;
            start_i = b_i;
        }

        p_i = node!(nodes, p_i).next_i;
        if p_i == start_i {
            return filter_points(nodes, p_i, None);
        }
    }
}

/// check if a diagonal between two ring nodes is valid (lies in the ring's interior)
fn is_valid_diagonal<T: Float>(nodes: &[Node<T>], a_i: NodeIndex, b_i: NodeIndex) -> bool {
    let a = node!(nodes, a_i);
    let b = node!(nodes, b_i);
    let (a_prev, a_next) = (node!(nodes, a.prev_i), node!(nodes, a.next_i));
    let (b_prev, b_next) = (node!(nodes, b.prev_i), node!(nodes, b.next_i));

    // not adjacent, and crossing no edge
    if a_next.vertex == b.vertex
        || a_prev.vertex == b.vertex
        || intersects_polygon(nodes, a_i, b_i)
    {
        return false;
    }

    let visible = locally_inside(nodes, a, b)
        && locally_inside(nodes, b, a)
        && middle_inside(nodes, a_i, b_i);
    // does not create opposite-facing sectors
    let no_opposite = area(a_prev, a, b_prev) != T::zero() || area(a, b_prev, b) != T::zero();
    // zero-length diagonal between two convex corners at the same position
    let zero_length = equals(a, b)
        && area(a_prev, a, a_next) > T::zero()
        && area(b_prev, b, b_next) > T::zero();

    (visible && no_opposite) || zero_length
}
