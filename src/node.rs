use alloc::vec::Vec;
use core::num::NonZeroU32;

use num_traits::float::Float;

/// Position of a node in the arena. Slot 0 holds a sentinel so every live node
/// has a non-zero index.
pub(crate) type NodeIndex = NonZeroU32;

pub(crate) struct Node<T: Float> {
    /// position of the vertex in the flattened input
    pub vertex: u32,
    /// working x coordinate
    pub x: T,
    /// working y coordinate
    pub y: T,
    /// z-order curve key, computed lazily when the curve index is built
    pub z: Option<u32>,
    /// previous node in the ring
    pub prev_i: NodeIndex,
    /// next node in the ring
    pub next_i: NodeIndex,
    /// previous node in z-order
    pub prev_z_i: Option<NodeIndex>,
    /// next node in z-order
    pub next_z_i: Option<NodeIndex>,
    /// original node this one duplicates (set by `split_polygon`)
    pub source: Option<NodeIndex>,
}

impl<T: Float> Node<T> {
    pub fn new(vertex: u32, x: T, y: T) -> Self {
        Self {
            vertex,
            x,
            y,
            z: None,
            prev_i: NodeIndex::MIN,
            next_i: NodeIndex::MIN,
            prev_z_i: None,
            next_z_i: None,
            source: None,
        }
    }

    fn sentinel() -> Self {
        Self::new(u32::MAX, T::infinity(), T::infinity())
    }
}

/// Clears the arena and pushes the sentinel.
pub(crate) fn reset<T: Float>(nodes: &mut Vec<Node<T>>, capacity: usize) {
    nodes.clear();
    nodes.reserve(capacity + 1);
    nodes.push(Node::sentinel());
}

fn next_slot<T: Float>(nodes: &[Node<T>]) -> NodeIndex {
    NodeIndex::new(nodes.len() as u32).unwrap_or(NodeIndex::MIN)
}

/// The original node behind `i`, following its `source` link if it is a duplicate.
#[inline]
pub(crate) fn origin<T: Float>(nodes: &[Node<T>], i: NodeIndex) -> NodeIndex {
    node!(nodes, i).source.unwrap_or(i)
}

/// Whether two nodes stand for the same input vertex.
#[inline]
pub(crate) fn same_vertex<T: Float>(nodes: &[Node<T>], a: NodeIndex, b: NodeIndex) -> bool {
    origin(nodes, a) == origin(nodes, b)
}

/// create a node and optionally link it after `last` (in a circular doubly linked list)
pub(crate) fn insert_node<T: Float>(
    nodes: &mut Vec<Node<T>>,
    vertex: u32,
    [x, y]: [T; 2],
    last: Option<NodeIndex>,
) -> NodeIndex {
    let mut p = Node::new(vertex, x, y);
    let p_i = next_slot(nodes);
    match last {
        Some(last_i) => {
            let last = node_mut!(nodes, last_i);
            let last_next_i = last.next_i;
            last.next_i = p_i;
            p.prev_i = last_i;
            p.next_i = last_next_i;
            node_mut!(nodes, last_next_i).prev_i = p_i;
        }
        None => {
            p.prev_i = p_i;
            p.next_i = p_i;
        }
    }
    nodes.push(p);
    p_i
}

/// unlink a node from both the ring and the z-order list; returns its former neighbours
pub(crate) fn remove_node<T: Float>(
    nodes: &mut [Node<T>],
    p_i: NodeIndex,
) -> (NodeIndex, NodeIndex) {
    let p = node!(nodes, p_i);
    let (prev_i, next_i) = (p.prev_i, p.next_i);
    let (prev_z_i, next_z_i) = (p.prev_z_i, p.next_z_i);

    node_mut!(nodes, next_i).prev_i = prev_i;
    node_mut!(nodes, prev_i).next_i = next_i;

    if let Some(z_i) = prev_z_i {
        node_mut!(nodes, z_i).next_z_i = next_z_i;
    }
    if let Some(z_i) = next_z_i {
        node_mut!(nodes, z_i).prev_z_i = prev_z_i;
    }
    (prev_i, next_i)
}

/// Links `a` and `b` with a bridge.
///
/// Both endpoints are duplicated: `a` keeps its predecessor and jumps to `b`,
/// while the copies `b2 -> a2` close the other half. If the nodes are on the
/// same ring this splits it in two; if `b` is on a hole, the hole is spliced
/// into `a`'s ring. Returns `b2`.
///
/// `b` must not directly follow `a`.
pub(crate) fn split_polygon<T: Float>(
    nodes: &mut Vec<Node<T>>,
    a_i: NodeIndex,
    b_i: NodeIndex,
) -> NodeIndex {
    debug_assert_ne!(node!(nodes, a_i).next_i, b_i, "adjacent bridge endpoints");
    let a2_i = next_slot(nodes);
    let b2_i = a2_i.saturating_add(1);

    let a_source = origin(nodes, a_i);
    let b_source = origin(nodes, b_i);

    let a = node_mut!(nodes, a_i);
    let mut a2 = Node::new(a.vertex, a.x, a.y);
    a2.source = Some(a_source);
    let an_i = a.next_i;
    a.next_i = b_i;
    a2.prev_i = b2_i;
    a2.next_i = an_i;
    node_mut!(nodes, an_i).prev_i = a2_i;

    let b = node_mut!(nodes, b_i);
    let mut b2 = Node::new(b.vertex, b.x, b.y);
    b2.source = Some(b_source);
    let bp_i = b.prev_i;
    b.prev_i = a_i;
    b2.next_i = a2_i;
    b2.prev_i = bp_i;
    node_mut!(nodes, bp_i).next_i = b2_i;

    nodes.extend([a2, b2]);
    b2_i
}

/// Number of nodes in the ring containing `start`.
#[cfg(test)]
pub(crate) fn ring_len<T: Float>(nodes: &[Node<T>], start: NodeIndex) -> usize {
    let mut len = 0;
    let mut p_i = start;
    loop {
        len += 1;
        p_i = node!(nodes, p_i).next_i;
        if p_i == start {
            return len;
        }
    }
}
