//! Convex polygon representation and Separating Axis Theorem primitives

use std::f32::consts::PI;

use super::{Aabb, ConvexDecomposer, GeometryError, Range};
use crate::foundation::math::{Vec2, VectorExt};

/// Convex polygon with derived edges, outward normals, centroid and bounds
///
/// Vertices are taken as given; neither convexity nor winding is validated on
/// construction (see [`ConvexPolygon::is_valid`]). Normals are unit length and
/// point away from the centroid regardless of winding.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolygon {
    vertices: Vec<Vec2>,
    edges: Vec<Vec2>,
    normals: Vec<Vec2>,
    centroid: Vec2,
    aabb: Aabb,
}

impl ConvexPolygon {
    /// Build a polygon from an ordered vertex loop
    pub fn new(vertices: Vec<Vec2>) -> Self {
        let count = vertices.len();
        let centroid = if count == 0 {
            Vec2::zeros()
        } else {
            vertices.iter().fold(Vec2::zeros(), |sum, vertex| sum + vertex) / count as f32
        };

        let mut edges = Vec::with_capacity(count);
        let mut normals = Vec::with_capacity(count);
        if count > 1 {
            for (i, vertex) in vertices.iter().enumerate() {
                let edge = vertices[(i + 1) % count] - vertex;
                let mut normal = edge.normalized_or_zero().perpendicular();
                if (vertex - centroid).dot(&normal) < 0.0 {
                    normal = -normal;
                }
                edges.push(edge);
                normals.push(normal);
            }
        }

        let aabb = Aabb::from_points(&vertices);
        Self {
            vertices,
            edges,
            normals,
            centroid,
            aabb,
        }
    }

    /// Axis-aligned rectangle polygon
    ///
    /// Fails with [`GeometryError::InvalidBounds`] if `left > right` or
    /// `top > bottom`.
    pub fn from_rectangle(left: f32, top: f32, right: f32, bottom: f32) -> Result<Self, GeometryError> {
        validate_bounds(left, top, right, bottom)?;
        Ok(Self::rectangle_unchecked(left, top, right, bottom))
    }

    /// Rectangle polygon without bounds validation, for callers that already
    /// hold well-formed bounds (e.g. a body's own box)
    pub(crate) fn rectangle_unchecked(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(vec![
            Vec2::new(left, top),
            Vec2::new(right, top),
            Vec2::new(right, bottom),
            Vec2::new(left, bottom),
        ])
    }

    /// Stadium shape approximated by two `cap_segments`-vertex semicircular
    /// caps joined by straight sides
    ///
    /// The cap radius is half the width, so the capsule must be at least as
    /// tall as it is wide. The result has `2 + 2 * cap_segments` edges.
    pub fn from_capsule(
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        cap_segments: usize,
    ) -> Result<Self, GeometryError> {
        if cap_segments < 3 {
            return Err(GeometryError::InvalidArgument(format!(
                "capsule needs at least 3 cap segments, got {cap_segments}"
            )));
        }
        validate_bounds(left, top, right, bottom)?;
        let width = right - left;
        let height = bottom - top;
        if height < width {
            return Err(GeometryError::InvalidShape(format!(
                "capsule height {height} must not be smaller than its width {width}"
            )));
        }

        let radius = width * 0.5;
        let centre_x = (left + right) * 0.5;
        // Angles 0 .. -PI sweep the upper half circle (y grows down)
        let cap: Vec<Vec2> = (0..cap_segments)
            .map(|index| {
                let angle = -(index as f32) * PI / cap_segments as f32;
                Vec2::new(angle.cos(), angle.sin()) * radius
            })
            .collect();

        let top_focus = Vec2::new(centre_x, top + radius);
        let bottom_focus = Vec2::new(centre_x, bottom - radius);

        let mut vertices = Vec::with_capacity(2 * cap_segments + 2);
        vertices.extend(cap.iter().map(|offset| top_focus + offset));
        vertices.push(Vec2::new(left, top_focus.y));
        vertices.extend(cap.iter().map(|offset| bottom_focus - offset));
        vertices.push(Vec2::new(right, bottom_focus.y));

        Ok(Self::new(vertices))
    }

    /// Split an arbitrary simple polygon into convex polygons
    pub fn generate_convex_polygons(vertices: &[Vec2], decomposer: &dyn ConvexDecomposer) -> Vec<Self> {
        decomposer
            .decompose(vertices)
            .into_iter()
            .map(Self::new)
            .collect()
    }

    /// Ordered vertex loop
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// `edges[i] = vertices[i + 1] - vertices[i]` (wrapping)
    pub fn edges(&self) -> &[Vec2] {
        &self.edges
    }

    /// Outward unit normal of each edge
    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    /// Arithmetic mean of the vertices
    pub fn centroid(&self) -> Vec2 {
        self.centroid
    }

    /// Tight bounding box of the vertices
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Absolute area (shoelace formula)
    pub fn area(&self) -> f32 {
        let count = self.vertices.len();
        let twice_area: f32 = (0..count)
            .map(|i| self.vertices[i].perp_dot(&self.vertices[(i + 1) % count]))
            .sum();
        twice_area.abs() * 0.5
    }

    /// Convexity check: the turn direction between consecutive edges never
    /// flips sign
    ///
    /// Polygons with fewer than four vertices are always convex. This is a
    /// diagnostic; construction never calls it.
    pub fn is_valid(&self) -> bool {
        let count = self.edges.len();
        if count < 4 {
            return true;
        }
        let mut previous = 0.0;
        for i in 0..count {
            let turn = self.edges[i].perp_dot(&self.edges[(i + 1) % count]);
            if turn * previous < 0.0 {
                return false;
            }
            // Collinear edges carry no orientation information
            if turn != 0.0 {
                previous = turn;
            }
        }
        true
    }

    /// Project every vertex onto `axis`, the SAT projection primitive
    pub fn project_onto_axis(&self, axis: &Vec2) -> Range {
        let mut range = Range::empty();
        for vertex in &self.vertices {
            range.extend_to(vertex.dot(axis));
        }
        range
    }

    /// Polygon rotated about its centroid by `angle` radians
    pub fn rotated(&self, angle: f32) -> Self {
        let centroid = self.centroid;
        Self::new(
            self.vertices
                .iter()
                .map(|vertex| centroid + (vertex - centroid).rotated(angle))
                .collect(),
        )
    }

    /// Polygon shifted by `offset`
    pub fn translated(&self, offset: &Vec2) -> Self {
        Self::new(self.vertices.iter().map(|vertex| vertex + offset).collect())
    }
}

fn validate_bounds(left: f32, top: f32, right: f32, bottom: f32) -> Result<(), GeometryError> {
    if left > right || top > bottom {
        return Err(GeometryError::InvalidBounds { left, top, right, bottom });
    }
    Ok(())
}
