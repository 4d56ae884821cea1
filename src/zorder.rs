//! Z-order (Morton) curve index over ring nodes.

use num_traits::float::Float;

use crate::node::{Node, NodeIndex};

/// Maps working coordinates onto the integer grid the Morton keys are built from.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Curve<T> {
    min_x: T,
    min_y: T,
    /// grid resolution divided by the longer side of the bounding box
    inv_size: T,
    resolution: u32,
}

impl<T: Float> Curve<T> {
    /// Fits the grid to the bounding box of the ring containing `start`.
    ///
    /// Returns `None` when the box has no extent.
    pub fn fit(nodes: &[Node<T>], start: NodeIndex, resolution: u32) -> Option<Self> {
        let first = node!(nodes, start);
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        let mut p_i = first.next_i;
        while p_i != start {
            let p = node!(nodes, p_i);
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
            p_i = p.next_i;
        }

        let size = (max_x - min_x).max(max_y - min_y);
        if !(size > T::zero()) || !size.is_finite() {
            return None;
        }
        Some(Self {
            min_x,
            min_y,
            inv_size: T::from(resolution)? / size,
            resolution,
        })
    }

    fn cell(&self, v: T, min: T) -> u32 {
        // NaN and negatives land on 0
        ((v - min) * self.inv_size)
            .to_u32()
            .unwrap_or(0)
            .min(self.resolution)
    }

    /// z-order of a point
    pub fn key(&self, x: T, y: T) -> u32 {
        spread(self.cell(x, self.min_x)) | (spread(self.cell(y, self.min_y)) << 1)
    }
}

/// dilate the low 16 bits of `v` so they occupy the even bit positions
fn spread(v: u32) -> u32 {
    let mut v = v & 0x0000_ffff;
    v = (v | (v << 8)) & 0x00ff_00ff;
    v = (v | (v << 4)) & 0x0f0f_0f0f;
    v = (v | (v << 2)) & 0x3333_3333;
    v = (v | (v << 1)) & 0x5555_5555;
    v
}

/// interlink ring nodes in z-order
pub(crate) fn index_curve<T: Float>(nodes: &mut [Node<T>], start_i: NodeIndex, curve: &Curve<T>) {
    let mut p_i = start_i;
    loop {
        let p = node_mut!(nodes, p_i);
        if p.z.is_none() {
            p.z = Some(curve.key(p.x, p.y));
        }
        p.prev_z_i = Some(p.prev_i);
        p.next_z_i = Some(p.next_i);
        p_i = p.next_i;
        if p_i == start_i {
            break;
        }
    }

    // open the cycle at `start`
    let start = node_mut!(nodes, start_i);
    if let Some(tail_i) = start.prev_z_i.take() {
        node_mut!(nodes, tail_i).next_z_i = None;
    }
    sort_linked(nodes, start_i);
}

/// Bottom-up merge sort of the z-order list starting at `list_i`
/// (Simon Tatham's linked list merge sort). Stable; returns the new head.
pub(crate) fn sort_linked<T: Float>(nodes: &mut [Node<T>], list_i: NodeIndex) -> NodeIndex {
    fn key<T: Float>(nodes: &[Node<T>], i: NodeIndex) -> u32 {
        node!(nodes, i).z.unwrap_or(0)
    }

    let mut head = list_i;
    let mut in_size: usize = 1;

    loop {
        let mut p = Some(head);
        let mut new_head: Option<NodeIndex> = None;
        let mut tail: Option<NodeIndex> = None;
        let mut num_merges = 0;

        while let Some(p_start) = p {
            num_merges += 1;

            // step `q` at most `in_size` places past `p`
            let mut q = Some(p_start);
            let mut p_size = 0;
            while p_size < in_size {
                let Some(q_i) = q else { break };
                p_size += 1;
                q = node!(nodes, q_i).next_z_i;
            }
            let mut q_size = in_size;

            // merge the two runs
            loop {
                let q_live = q.filter(|_| q_size > 0);
                let take_p = match (p_size > 0, q_live) {
                    (false, None) => break,
                    (true, None) => true,
                    (false, Some(_)) => false,
                    (true, Some(q_i)) => p.is_some_and(|p_i| key(nodes, p_i) <= key(nodes, q_i)),
                };
                let Some(e_i) = (if take_p { p } else { q }) else {
                    break;
                };
                let e = node_mut!(nodes, e_i);
                if take_p {
                    p = e.next_z_i;
                    p_size -= 1;
                } else {
                    q = e.next_z_i;
                    q_size -= 1;
                }
                e.prev_z_i = tail;

                match tail {
                    Some(t_i) => node_mut!(nodes, t_i).next_z_i = Some(e_i),
                    None => new_head = Some(e_i),
                }
                tail = Some(e_i);
            }

            p = q;
        }

        if let Some(t_i) = tail {
            node_mut!(nodes, t_i).next_z_i = None;
        }
        head = new_head.unwrap_or(head);
        if num_merges <= 1 {
            return head;
        }
        in_size *= 2;
    }
}
