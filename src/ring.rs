use alloc::vec::Vec;

use num_traits::float::Float;

use crate::geom::{area, equals};
use crate::node::{insert_node, remove_node, Node, NodeIndex};

/// Twice the signed area of a ring (shoelace sum), positive for counter-clockwise
/// rings in a y-up frame.
pub(crate) fn signed_area<'a, T: Float + 'a>(ring: impl IntoIterator<Item = &'a [T; 2]>) -> T {
    let mut ring = ring.into_iter();
    let Some(&first) = ring.next() else {
        return T::zero();
    };
    let (sum, [bx, by]) = ring.fold((T::zero(), first), |(sum, [bx, by]), &[ax, ay]| {
        (sum + (bx - ax) * (ay + by), [ax, ay])
    });
    let [ax, ay] = first;
    sum + (bx - ax) * (ay + by)
}

#[inline]
pub(crate) fn is_finite<T: Float>(p: &[T; 2]) -> bool {
    p[0].is_finite() && p[1].is_finite()
}

/// Links the finite points of `plane[start..end]` into a circular doubly
/// linked list. Points with a NaN or infinite coordinate are skipped.
///
/// With `clockwise` set the ring ends up with a positive [`signed_area`]
/// (the outer-ring sense); otherwise negative (the hole sense). Returns the
/// last inserted node, or `None` if no point was linked.
pub(crate) fn linked_list<T: Float>(
    nodes: &mut Vec<Node<T>>,
    plane: &[[T; 2]],
    start: usize,
    end: usize,
    clockwise: bool,
) -> Option<NodeIndex> {
    let finite = || plane[start..end].iter().enumerate().filter(|(_, p)| is_finite(p));
    let mut last_i = None;
    if clockwise == (signed_area(finite().map(|(_, p)| p)) > T::zero()) {
        for (i, &p) in finite() {
            last_i = Some(insert_node(nodes, (start + i) as u32, p, last_i));
        }
    } else {
        for (i, &p) in finite().rev() {
            last_i = Some(insert_node(nodes, (start + i) as u32, p, last_i));
        }
    }
    last_i
}

/// Eliminates duplicate and collinear points, walking from `start` until a full
/// pass up to `end` (default: `start`) removes nothing.
///
/// Returns a surviving node, or `None` once the ring collapses to a single node.
pub(crate) fn filter_points<T: Float>(
    nodes: &mut [Node<T>],
    start_i: NodeIndex,
    end_i: Option<NodeIndex>,
) -> Option<NodeIndex> {
    let mut end_i = end_i.unwrap_or(start_i);
    let mut p_i = start_i;
    loop {
        let p = node!(nodes, p_i);
        let p_next = node!(nodes, p.next_i);
        if equals(p, p_next) || area(node!(nodes, p.prev_i), p, p_next) == T::zero() {
            let (prev_i, next_i) = remove_node(nodes, p_i);
            if prev_i == next_i {
                return None;
            }
            p_i = prev_i;
            end_i = prev_i;
        } else {
            p_i = p.next_i;
            if p_i == end_i {
                return Some(end_i);
            }
        }
    }
}

/// find the leftmost node of a ring, lowest y first on ties
pub(crate) fn get_leftmost<T: Float>(nodes: &[Node<T>], start_i: NodeIndex) -> NodeIndex {
    let mut p_i = start_i;
    let mut leftmost_i = start_i;
    loop {
        let p = node!(nodes, p_i);
        let leftmost = node!(nodes, leftmost_i);
        if p.x < leftmost.x || (p.x == leftmost.x && p.y < leftmost.y) {
            leftmost_i = p_i;
        }
        p_i = p.next_i;
        if p_i == start_i {
            return leftmost_i;
        }
    }
}
