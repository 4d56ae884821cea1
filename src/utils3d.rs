//! Projection of planar 3D polygons (sloped roof faces, walls) onto 2D.

use alloc::vec::Vec;
use num_traits::float::Float;

#[inline]
fn third<T: Float, const D: usize>(p: &[T; D]) -> T {
    p.get(2).copied().unwrap_or_else(T::zero)
}

/// Newell's normal of a ring, normalized. `None` for fewer than three finite
/// points or a ring with no enclosed area.
fn normal<T: Float, const D: usize>(ring: &[[T; D]]) -> Option<[T; 3]> {
    let finite = || ring.iter().filter(|p| p.iter().all(|c| c.is_finite()));
    if D < 3 || finite().count() < 3 {
        return None;
    }
    let mut n = [T::zero(); 3];
    let mut prev = *finite().last()?;
    for &cur in finite() {
        let (pz, cz) = (third(&prev), third(&cur));
        n[0] = n[0] + (prev[1] - cur[1]) * (pz + cz);
        n[1] = n[1] + (pz - cz) * (prev[0] + cur[0]);
        n[2] = n[2] + (prev[0] - cur[0]) * (prev[1] + cur[1]);
        prev = cur;
    }
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if !(len >= T::from(1e-30)?) {
        return None;
    }
    Some([n[0] / len, n[1] / len, n[2] / len])
}

/// Rotates `points` so that the normal of `outer` lines up with +Z, writing the
/// resulting x/y pairs to `out`.
///
/// Returns `false` (leaving `out` untouched) if the points carry no third
/// coordinate or the outer ring has no usable normal.
pub fn project3d_to_2d<T: Float, const D: usize>(
    outer: &[[T; D]],
    points: impl IntoIterator<Item = [T; D]>,
    out: &mut Vec<[T; 2]>,
) -> bool {
    let Some([nx, ny, nz]) = normal(outer) else {
        return false;
    };
    let Some(eps) = T::from(1e-15) else {
        return false;
    };
    out.clear();
    let points = points.into_iter();

    // sin of the angle between the normal and +Z
    let sin = (nx * nx + ny * ny).sqrt();
    if sin < eps {
        if nz > T::zero() {
            out.extend(points.map(|p| [p[0], p[1]]));
        } else {
            // facing down; mirror so the ring keeps its winding
            out.extend(points.map(|p| [p[1], p[0]]));
        }
        return true;
    }

    // Rodrigues rotation about k = n x Z, keeping only x and y
    let cos = nz;
    let (kx, ky) = (ny / sin, -nx / sin);
    let one_minus_cos = T::one() - cos;
    out.extend(points.map(|p| {
        let (x, y, z) = (p[0], p[1], third(&p));
        let k_dot = kx * x + ky * y;
        [
            x * cos + ky * z * sin + kx * k_dot * one_minus_cos,
            y * cos - kx * z * sin + ky * k_dot * one_minus_cos,
        ]
    }));
    true
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ring::signed_area;
    use approx::assert_relative_eq;

    #[test]
    fn horizontal_ring_is_kept() {
        let mut buf = Vec::new();
        let points = [[0.0, 0.0, 3.0], [2.0, 0.0, 3.0], [2.0, 2.0, 3.0]];
        assert!(project3d_to_2d(&points, points, &mut buf));
        assert_eq!(buf, [[0., 0.], [2., 0.], [2., 2.]]);
    }

    #[test]
    fn downward_ring_is_mirrored() {
        let mut buf = Vec::new();
        let points = [[0.0, 0.0, 0.0], [2.0, 2.0, 0.0], [2.0, 0.0, 0.0]];
        assert!(project3d_to_2d(&points, points, &mut buf));
        assert_eq!(buf, [[0., 0.], [2., 2.], [0., 2.]]);
        assert!(signed_area(&buf) > 0.0);
    }

    #[test]
    fn wall_keeps_its_area() {
        // a 4 x 3 wall standing in the x = 5 plane; signed_area is doubled
        let mut buf = Vec::new();
        let points = [[5.0, 0.0, 0.0], [5.0, 4.0, 0.0], [5.0, 4.0, 3.0], [5.0, 0.0, 3.0]];
        assert!(project3d_to_2d(&points, points, &mut buf));
        assert_relative_eq!(signed_area(&buf).abs(), 24.0, epsilon = 1e-9);
    }

    #[test]
    fn normal_ignores_non_finite_points() {
        let mut buf = Vec::new();
        let points = [
            [5.0, 0.0, 0.0],
            [5.0, 4.0, 0.0],
            [f64::NAN, 2.0, 1.0],
            [5.0, 4.0, 3.0],
            [5.0, 0.0, 3.0],
        ];
        assert!(project3d_to_2d(&points, points, &mut buf));
        let finite = [buf[0], buf[1], buf[3], buf[4]];
        assert_relative_eq!(signed_area(&finite).abs(), 24.0, epsilon = 1e-9);
    }

    #[test]
    fn sloped_roof_keeps_its_area() {
        // unit square tilted 45 degrees around the x axis (doubled area 2)
        let h = core::f64::consts::FRAC_1_SQRT_2;
        let mut buf = Vec::new();
        let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, h, h], [0.0, h, h]];
        assert!(project3d_to_2d(&points, points, &mut buf));
        assert_relative_eq!(signed_area(&buf), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_input_is_rejected() {
        let mut buf = Vec::new();
        assert!(!project3d_to_2d::<f64, 3>(&[], [], &mut buf));
        let flat = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];
        assert!(!project3d_to_2d(&flat, flat, &mut buf));
        assert!(buf.is_empty());
        let collinear = [[0., 0., 0.], [0., 1., 0.], [0., 0., 0.], [0., 0., 1.], [0., 0., 0.]];
        assert!(normal(&collinear).is_none());
    }
}
