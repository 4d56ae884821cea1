use alloc::vec::Vec;
use core::cmp::Ordering;

use num_traits::float::Float;

use crate::geom::{locally_inside, point_in_triangle, sector_contains_sector};
use crate::node::{split_polygon, Node, NodeIndex};
use crate::ring::{filter_points, get_leftmost, linked_list};

/// Links every hole into the outer ring, producing a single ring.
///
/// `hole_ranges` are the `start..end` spans of the hole rings in `plane`.
/// Returns `None` if the merged ring degenerates completely.
pub(crate) fn eliminate_holes<T: Float>(
    nodes: &mut Vec<Node<T>>,
    queue: &mut Vec<NodeIndex>,
    plane: &[[T; 2]],
    hole_ranges: impl Iterator<Item = (usize, usize)>,
    mut outer_i: NodeIndex,
) -> Option<NodeIndex> {
    queue.clear();
    for (start, end) in hole_ranges {
        let Some(list_i) = linked_list(nodes, plane, start, end, false) else {
            continue;
        };
        match filter_points(nodes, list_i, None) {
            Some(list_i) => queue.push(get_leftmost(nodes, list_i)),
            None => log::debug!("hole at vertex {start} collapsed during filtering; skipped"),
        }
    }

    queue.sort_by(|&a, &b| {
        let (a, b) = (node!(nodes, a), node!(nodes, b));
        a.x.partial_cmp(&b.x)
            .unwrap_or(Ordering::Equal)
            .then(a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
    });

    // left to right, so a merged hole never hides behind a later one
    for &hole_i in queue.iter() {
        outer_i = eliminate_hole(nodes, hole_i, outer_i)?;
    }
    Some(outer_i)
}

/// find a bridge from the hole to the outer ring and splice the hole in
fn eliminate_hole<T: Float>(
    nodes: &mut Vec<Node<T>>,
    hole_i: NodeIndex,
    outer_i: NodeIndex,
) -> Option<NodeIndex> {
    let Some(bridge_i) = find_hole_bridge(nodes, hole_i, outer_i) else {
        log::debug!(
            "no bridge for hole at vertex {}; hole dropped",
            node!(nodes, hole_i).vertex
        );
        return Some(outer_i);
    };
    let bridge_reverse_i = split_polygon(nodes, bridge_i, hole_i);

    // clean up collinear points around both pinch points
    let end_i = node!(nodes, bridge_reverse_i).next_i;
    filter_points(nodes, bridge_reverse_i, Some(end_i));
    let end_i = node!(nodes, bridge_i).next_i;
    filter_points(nodes, bridge_i, Some(end_i))
}

/// David Eberly's algorithm for finding a bridge between a hole and the outer ring
fn find_hole_bridge<T: Float>(
    nodes: &[Node<T>],
    hole_i: NodeIndex,
    outer_i: NodeIndex,
) -> Option<NodeIndex> {
    let hole = node!(nodes, hole_i);
    let mut qx = T::neg_infinity();
    let mut m_i: Option<NodeIndex> = None;

    // cast a ray from the hole's leftmost point to the left; of the edges it
    // crosses, the closest one's endpoint with lesser x is the first candidate
    let mut p_i = outer_i;
    loop {
        let p = node!(nodes, p_i);
        let p_next = node!(nodes, p.next_i);
        if hole.y <= p.y && hole.y >= p_next.y && p_next.y != p.y {
            let x = p.x + (hole.y - p.y) * (p_next.x - p.x) / (p_next.y - p.y);
            if x <= hole.x && x > qx {
                qx = x;
                m_i = Some(if p.x < p_next.x { p_i } else { p.next_i });
                if x == hole.x {
                    // the hole touches this edge
                    return m_i;
                }
            }
        }
        p_i = p.next_i;
        if p_i == outer_i {
            break;
        }
    }

    let stop_i = m_i?;
    let mut m_i = stop_i;
    let m0 = node!(nodes, stop_i);
    let (mx, my) = (m0.x, m0.y);

    // any vertex inside the triangle (hole, ray hit, candidate) would hide the
    // candidate; among those pick the one with the smallest angle to the ray
    let (ax, cx) = if hole.y < my { (hole.x, qx) } else { (qx, hole.x) };
    let mut tan_min = T::infinity();
    let mut p_i = stop_i;
    loop {
        let p = node!(nodes, p_i);
        if hole.x >= p.x
            && p.x >= mx
            && hole.x != p.x
            && point_in_triangle(ax, hole.y, mx, my, cx, hole.y, p.x, p.y)
        {
            let tan = (hole.y - p.y).abs() / (hole.x - p.x);
            let m = node!(nodes, m_i);
            if locally_inside(nodes, p, hole)
                && (tan < tan_min
                    || (tan == tan_min
                        && (p.x > m.x || (p.x == m.x && sector_contains_sector(nodes, m, p)))))
            {
                m_i = p_i;
                tan_min = tan;
            }
        }

        p_i = p.next_i;
        if p_i == stop_i {
            return Some(m_i);
        }
    }
}
