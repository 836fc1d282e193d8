//! Static collision shapes and the SAT narrow phase

use crate::foundation::math::Vec2;
use crate::geometry::{Aabb, ConvexPolygon, Range, ShapeId};
use crate::level::ShapeProperties;

use super::body::DynamicBody;

/// Penetration of a dynamic body into a static shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// Unit axis of least penetration, pointing from the shape toward the body
    pub normal: Vec2,
    /// Offset that moves the shape out of the body; subtract from the body
    /// position to separate it
    pub penetration: Vec2,
}

/// A convex piece of level geometry with the properties of its source object
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: ShapeId,
    polygon: ConvexPolygon,
    properties: ShapeProperties,
}

impl Shape {
    pub(crate) fn new(id: ShapeId, polygon: ConvexPolygon, properties: ShapeProperties) -> Self {
        Self { id, polygon, properties }
    }

    /// Index within the owning layer
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Convex outline in world coordinates
    pub fn polygon(&self) -> &ConvexPolygon {
        &self.polygon
    }

    /// Properties copied from the source map object
    pub fn properties(&self) -> &ShapeProperties {
        &self.properties
    }

    /// World-space bounds
    pub fn aabb(&self) -> &Aabb {
        self.polygon.aabb()
    }

    /// Separating Axis Theorem test against a body
    ///
    /// Tests the body's axes first, then this shape's normals, and stops at
    /// the first separating axis. Zero-length axes from degenerate edges are
    /// skipped.
    pub fn collide(&self, body: &BodyShape) -> Option<Collision> {
        let mut min_penetration = f32::INFINITY;
        let mut axis = Vec2::zeros();

        for candidate in body.axes().iter().chain(self.polygon.normals()) {
            if candidate.x == 0.0 && candidate.y == 0.0 {
                continue;
            }
            let static_range = self.polygon.project_onto_axis(candidate);
            let dynamic_range = body.polygon().project_onto_axis(candidate);
            let overlap = Range::intersection(&static_range, &dynamic_range);
            if overlap.is_empty() {
                return None;
            }

            let penetration = penetration_depth(&static_range, &dynamic_range);
            if penetration < min_penetration {
                min_penetration = penetration;
                axis = *candidate;
            }
        }

        if !min_penetration.is_finite() {
            return None;
        }

        let offset = body.polygon().centroid() - self.polygon.centroid();
        let normal = if offset.dot(&axis) < 0.0 { -axis } else { axis };
        Some(Collision {
            normal,
            penetration: normal * -min_penetration,
        })
    }
}

/// Shortest distance that separates two overlapping projections
fn penetration_depth(static_range: &Range, dynamic_range: &Range) -> f32 {
    let through_max = (static_range.max - dynamic_range.min).abs();
    let through_min = (dynamic_range.max - static_range.min).abs();
    through_max.min(through_min)
}

/// World-space collision proxy of a dynamic body
///
/// Without a custom shape the body is its axis-aligned box, tested on the
/// two coordinate axes. A custom shape is translated by the body position
/// and tested on its own normals.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyShape {
    polygon: ConvexPolygon,
    axes: Vec<Vec2>,
}

impl BodyShape {
    /// Snapshot the body's current collision outline
    pub fn of(body: &dyn DynamicBody) -> Self {
        let position = body.position();
        match body.custom_shape() {
            Some(shape) => {
                let polygon = shape.translated(&position);
                let axes = polygon.normals().to_vec();
                Self { polygon, axes }
            }
            None => {
                let size = body.size();
                let polygon =
                    ConvexPolygon::rectangle_unchecked(position.x, position.y, position.x + size.x, position.y + size.y);
                Self {
                    polygon,
                    axes: vec![Vec2::x(), Vec2::y()],
                }
            }
        }
    }

    /// Outline in world coordinates
    pub fn polygon(&self) -> &ConvexPolygon {
        &self.polygon
    }

    /// Candidate separating axes contributed by the body
    pub fn axes(&self) -> &[Vec2] {
        &self.axes
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::physics::Body;

    fn ground() -> Shape {
        Shape::new(
            ShapeId(0),
            ConvexPolygon::rectangle_unchecked(0.0, 100.0, 100.0, 110.0),
            ShapeProperties::default(),
        )
    }

    #[test]
    fn test_collide_from_above() {
        let body = Body::new(40.0, 92.5, 10.0, 10.0);
        let collision = ground().collide(&BodyShape::of(&body)).unwrap();
        assert_relative_eq!(collision.normal, Vec2::new(0.0, -1.0));
        assert_relative_eq!(collision.penetration, Vec2::new(0.0, 2.5));
    }

    #[test]
    fn test_collide_from_side() {
        let body = Body::new(97.0, 100.0, 10.0, 6.0);
        let collision = ground().collide(&BodyShape::of(&body)).unwrap();
        assert_relative_eq!(collision.normal, Vec2::new(1.0, 0.0));
        assert_relative_eq!(collision.penetration, Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn test_separated_on_body_axis() {
        let body = Body::new(40.0, 80.0, 10.0, 10.0);
        assert!(ground().collide(&BodyShape::of(&body)).is_none());
    }

    #[test]
    fn test_separated_on_shape_normal() {
        // Triangle hypotenuse separates; the body box overlaps its bounds
        let triangle = Shape::new(
            ShapeId(0),
            ConvexPolygon::new(vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)]),
            ShapeProperties::default(),
        );
        let body = Body::new(7.0, 7.0, 2.0, 2.0);
        assert!(triangle.aabb().intersects(&body.aabb()));
        assert!(triangle.collide(&BodyShape::of(&body)).is_none());
    }

    #[test]
    fn test_touching_edges_collide_with_zero_depth() {
        let body = Body::new(40.0, 90.0, 10.0, 10.0);
        let collision = ground().collide(&BodyShape::of(&body)).unwrap();
        assert_relative_eq!(collision.penetration.norm(), 0.0);
    }

    #[test]
    fn test_degenerate_edges_are_skipped() {
        let with_duplicate = Shape::new(
            ShapeId(0),
            ConvexPolygon::new(vec![
                Vec2::new(0.0, 100.0),
                Vec2::new(100.0, 100.0),
                Vec2::new(100.0, 100.0),
                Vec2::new(100.0, 110.0),
                Vec2::new(0.0, 110.0),
            ]),
            ShapeProperties::default(),
        );
        let body = Body::new(40.0, 92.5, 10.0, 10.0);
        let collision = with_duplicate.collide(&BodyShape::of(&body)).unwrap();
        assert_relative_eq!(collision.penetration, Vec2::new(0.0, 2.5));
    }

    #[test]
    fn test_custom_shape_uses_its_normals() {
        let diamond = ConvexPolygon::new(vec![
            Vec2::new(5.0, 0.0),
            Vec2::new(10.0, 5.0),
            Vec2::new(5.0, 10.0),
            Vec2::new(0.0, 5.0),
        ]);
        // Only the lower tip of the diamond reaches into the ground
        let body = Body::new(0.0, 92.0, 10.0, 10.0).with_custom_shape(diamond);
        let proxy = BodyShape::of(&body);
        assert_eq!(proxy.axes().len(), 4);
        let collision = ground().collide(&proxy).unwrap();
        assert_relative_eq!(collision.normal, Vec2::new(0.0, -1.0), epsilon = 1e-5);
        assert_relative_eq!(collision.penetration, Vec2::new(0.0, 2.0), epsilon = 1e-4);
    }
}
