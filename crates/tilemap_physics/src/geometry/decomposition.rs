//! Convex decomposition of simple polygons
//!
//! Level editors allow arbitrary (possibly concave) polygons, while the SAT
//! narrow phase only handles convex shapes. A [`ConvexDecomposer`] bridges
//! the two; it is injected wherever level geometry is built so tests and
//! hosts can swap the algorithm.

use std::cmp::Ordering;

use crate::foundation::math::{Vec2, VectorExt};

/// Splits an ordered vertex loop into convex vertex loops whose union
/// reconstructs the input polygon
pub trait ConvexDecomposer: Send + Sync {
    /// Decompose a simple polygon into convex pieces
    fn decompose(&self, vertices: &[Vec2]) -> Vec<Vec<Vec2>>;
}

/// Returns the input loop unchanged
///
/// Suitable when the level only contains convex polygons, and as a fake in
/// tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughDecomposer;

impl ConvexDecomposer for PassthroughDecomposer {
    fn decompose(&self, vertices: &[Vec2]) -> Vec<Vec<Vec2>> {
        vec![vertices.to_vec()]
    }
}

/// Ear-clipping triangulation followed by Hertel-Mehlhorn merging
///
/// Convex input is returned as-is. Otherwise the polygon is triangulated and
/// adjacent pieces are merged across their shared diagonal for as long as the
/// union stays convex. Output loops keep the winding of the input.
#[derive(Debug, Clone, Copy)]
pub struct EarClipDecomposer {
    /// Tolerance for orientation tests (cross products of edge vectors)
    pub epsilon: f32,
}

impl Default for EarClipDecomposer {
    fn default() -> Self {
        Self { epsilon: 1e-5 }
    }
}

impl ConvexDecomposer for EarClipDecomposer {
    fn decompose(&self, vertices: &[Vec2]) -> Vec<Vec<Vec2>> {
        if vertices.len() < 4 || self.is_convex(vertices) {
            return vec![vertices.to_vec()];
        }

        // Work on a positively oriented ring so convex corners turn left
        let reversed = signed_area(vertices) < 0.0;
        let mut ring: Vec<usize> = (0..vertices.len()).collect();
        if reversed {
            ring.reverse();
        }

        let triangles = self.triangulate(vertices, ring);
        let pieces = self.merge(vertices, triangles);

        pieces
            .into_iter()
            .map(|mut piece| {
                if reversed {
                    piece.reverse();
                }
                piece.into_iter().map(|index| vertices[index]).collect()
            })
            .collect()
    }
}

impl EarClipDecomposer {
    fn is_convex(&self, vertices: &[Vec2]) -> bool {
        let count = vertices.len();
        let mut sign = 0.0_f32;
        for i in 0..count {
            let t = turn(&vertices[i], &vertices[(i + 1) % count], &vertices[(i + 2) % count]);
            if t.abs() <= self.epsilon {
                continue;
            }
            if sign * t < 0.0 {
                return false;
            }
            sign = t;
        }
        true
    }

    fn triangulate(&self, points: &[Vec2], mut ring: Vec<usize>) -> Vec<Vec<usize>> {
        let mut triangles = Vec::with_capacity(ring.len().saturating_sub(2));

        while ring.len() > 3 {
            let count = ring.len();
            let corner = |i: usize| {
                turn(
                    &points[ring[(i + count - 1) % count]],
                    &points[ring[i]],
                    &points[ring[(i + 1) % count]],
                )
            };

            if let Some(i) = (0..count).find(|&i| self.is_ear(points, &ring, i)) {
                triangles.push(vec![ring[(i + count - 1) % count], ring[i], ring[(i + 1) % count]]);
                ring.remove(i);
            } else {
                // Degenerate input (collinear runs or touching edges): drop the
                // flattest corner, which removes the least area
                let flattest = (0..count)
                    .min_by(|&a, &b| {
                        corner(a)
                            .abs()
                            .partial_cmp(&corner(b).abs())
                            .unwrap_or(Ordering::Equal)
                    })
                    .unwrap_or(0);
                log::warn!("no ear found while decomposing polygon, dropping vertex {}", ring[flattest]);
                ring.remove(flattest);
            }
        }

        if ring.len() == 3 && turn(&points[ring[0]], &points[ring[1]], &points[ring[2]]) > self.epsilon {
            triangles.push(ring);
        }
        triangles
    }

    fn is_ear(&self, points: &[Vec2], ring: &[usize], i: usize) -> bool {
        let count = ring.len();
        let (ia, ib, ic) = (ring[(i + count - 1) % count], ring[i], ring[(i + 1) % count]);
        let (a, b, c) = (&points[ia], &points[ib], &points[ic]);
        if turn(a, b, c) <= self.epsilon {
            return false;
        }
        ring.iter()
            .filter(|&&index| index != ia && index != ib && index != ic)
            .map(|&index| &points[index])
            .filter(|&p| p != a && p != b && p != c)
            .all(|p| !self.in_triangle(p, a, b, c))
    }

    fn in_triangle(&self, p: &Vec2, a: &Vec2, b: &Vec2, c: &Vec2) -> bool {
        (b - a).perp_dot(&(p - a)) >= -self.epsilon
            && (c - b).perp_dot(&(p - b)) >= -self.epsilon
            && (a - c).perp_dot(&(p - c)) >= -self.epsilon
    }

    fn merge(&self, points: &[Vec2], mut pieces: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
        loop {
            let mut merged_any = false;
            'search: for i in 0..pieces.len() {
                for j in (i + 1)..pieces.len() {
                    if let Some(merged) = self.try_merge(points, &pieces[i], &pieces[j]) {
                        pieces[i] = merged;
                        pieces.swap_remove(j);
                        merged_any = true;
                        break 'search;
                    }
                }
            }
            if !merged_any {
                return pieces;
            }
        }
    }

    /// Join two pieces across a shared edge `a -> b` / `b -> a`, if the
    /// result is convex
    fn try_merge(&self, points: &[Vec2], p: &[usize], q: &[usize]) -> Option<Vec<usize>> {
        let (pn, qn) = (p.len(), q.len());
        for i in 0..pn {
            let (a, b) = (p[i], p[(i + 1) % pn]);
            let Some(j) = (0..qn).find(|&j| q[j] == b && q[(j + 1) % qn] == a) else {
                continue;
            };

            let mut merged = Vec::with_capacity(pn + qn - 2);
            merged.extend((0..pn).map(|k| p[(i + 1 + k) % pn]));
            merged.extend((2..qn).map(|k| q[(j + k) % qn]));

            let count = merged.len();
            let convex = (0..count).all(|k| {
                turn(
                    &points[merged[k]],
                    &points[merged[(k + 1) % count]],
                    &points[merged[(k + 2) % count]],
                ) >= -self.epsilon
            });
            if convex {
                return Some(merged);
            }
        }
        None
    }
}

/// Cross product of the two edges meeting at `b`; positive for a left turn
fn turn(a: &Vec2, b: &Vec2, c: &Vec2) -> f32 {
    (b - a).perp_dot(&(c - b))
}

fn signed_area(vertices: &[Vec2]) -> f32 {
    let count = vertices.len();
    (0..count)
        .map(|i| vertices[i].perp_dot(&vertices[(i + 1) % count]))
        .sum::<f32>()
        * 0.5
}
