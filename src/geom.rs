//! Orientation and containment predicates over ring nodes.
//!
//! Rings are linked so that a convex corner `(prev, p, next)` has a negative
//! [`area`]; every predicate here is written against that convention.

use num_traits::float::Float;

use crate::node::{Node, NodeIndex};

/// signed area of a triangle (negative when `p, q, r` turn like a convex corner)
#[inline]
pub(crate) fn area<T: Float>(p: &Node<T>, q: &Node<T>, r: &Node<T>) -> T {
    (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y)
}

/// check if two points are equal
#[inline]
pub(crate) fn equals<T: Float>(p1: &Node<T>, p2: &Node<T>) -> bool {
    p1.x == p2.x && p1.y == p2.y
}

fn sign<T: Float>(v: T) -> i8 {
    (v > T::zero()) as i8 - (v < T::zero()) as i8
}

/// for collinear points p, q, r, check if point q lies on segment pr
fn on_segment<T: Float>(p: &Node<T>, q: &Node<T>, r: &Node<T>) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// check if segments p1q1 and p2q2 intersect, touching included
pub(crate) fn intersects<T: Float>(p1: &Node<T>, q1: &Node<T>, p2: &Node<T>, q2: &Node<T>) -> bool {
    let o1 = sign(area(p1, q1, p2));
    let o2 = sign(area(p1, q1, q2));
    let o3 = sign(area(p2, q2, p1));
    let o4 = sign(area(p2, q2, q1));

    (o1 != o2 && o3 != o4)
        || (o3 == 0 && on_segment(p2, p1, q2))
        || (o4 == 0 && on_segment(p2, q1, q2))
        || (o2 == 0 && on_segment(p1, q2, q1))
        || (o1 == 0 && on_segment(p1, p2, q1))
}

/// Whether `p` lies inside the convex corner triangle `a, b, c` for the purpose
/// of the ear test.
///
/// Each of the three edge quantities must be non-positive (the point is on the
/// inner side of every edge) and at least two must be strictly negative, so a
/// point coinciding with a corner does not block the ear while a point on an
/// edge does.
#[inline]
pub(crate) fn blocks_ear<T: Float>(a: &Node<T>, b: &Node<T>, c: &Node<T>, p: &Node<T>) -> bool {
    let zero = T::zero();
    let s = area(a, b, p);
    let t = area(b, c, p);
    let k = area(c, a, p);
    if !(s <= zero && t <= zero && k <= zero) {
        // also rejects NaN
        return false;
    }
    (s < zero && t < zero) || (s < zero && k < zero) || (t < zero && k < zero)
}

/// check if a point lies within a convex triangle, boundary included
#[allow(clippy::too_many_arguments)]
pub(crate) fn point_in_triangle<T: Float>(
    ax: T,
    ay: T,
    bx: T,
    by: T,
    cx: T,
    cy: T,
    px: T,
    py: T,
) -> bool {
    (cx - px) * (ay - py) >= (ax - px) * (cy - py)
        && (ax - px) * (by - py) >= (bx - px) * (ay - py)
        && (bx - px) * (cy - py) >= (cx - px) * (by - py)
}

/// check if a diagonal from `a` towards `b` starts inside the polygon at `a`
pub(crate) fn locally_inside<T: Float>(nodes: &[Node<T>], a: &Node<T>, b: &Node<T>) -> bool {
    let a_prev = node!(nodes, a.prev_i);
    let a_next = node!(nodes, a.next_i);
    if area(a_prev, a, a_next) < T::zero() {
        area(a, b, a_next) >= T::zero() && area(a, a_prev, b) >= T::zero()
    } else {
        area(a, b, a_prev) < T::zero() || area(a, a_next, b) < T::zero()
    }
}

/// check if a diagonal between `a_i` and `b_i` crosses any edge of their ring
pub(crate) fn intersects_polygon<T: Float>(
    nodes: &[Node<T>],
    a_i: NodeIndex,
    b_i: NodeIndex,
) -> bool {
    let a = node!(nodes, a_i);
    let b = node!(nodes, b_i);
    let mut p_i = a_i;
    loop {
        let p = node!(nodes, p_i);
        let p_next = node!(nodes, p.next_i);
        if p.vertex != a.vertex
            && p.vertex != b.vertex
            && p_next.vertex != a.vertex
            && p_next.vertex != b.vertex
            && intersects(p, p_next, a, b)
        {
            return true;
        }
        p_i = p.next_i;
        if p_i == a_i {
            return false;
        }
    }
}

/// check if the middle point of a diagonal lies inside the ring (ray-crossing parity)
pub(crate) fn middle_inside<T: Float>(nodes: &[Node<T>], a_i: NodeIndex, b_i: NodeIndex) -> bool {
    let a = node!(nodes, a_i);
    let b = node!(nodes, b_i);
    let two = T::one() + T::one();
    let (px, py) = ((a.x + b.x) / two, (a.y + b.y) / two);

    let mut inside = false;
    let mut p_i = a_i;
    loop {
        let p = node!(nodes, p_i);
        let p_next = node!(nodes, p.next_i);
        if (p.y > py) != (p_next.y > py) && p_next.y != p.y {
            let x = (p_next.x - p.x) * (py - p.y) / (p_next.y - p.y) + p.x;
            if px < x {
                inside = !inside;
            }
        }
        p_i = p.next_i;
        if p_i == a_i {
            return inside;
        }
    }
}

/// whether the sector at `m` contains the sector at `p` when both share a position
pub(crate) fn sector_contains_sector<T: Float>(
    nodes: &[Node<T>],
    m: &Node<T>,
    p: &Node<T>,
) -> bool {
    area(node!(nodes, m.prev_i), m, node!(nodes, p.prev_i)) < T::zero()
        && area(node!(nodes, p.next_i), m, node!(nodes, m.next_i)) < T::zero()
}
