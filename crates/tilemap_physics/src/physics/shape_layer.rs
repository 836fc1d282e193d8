//! Collision geometry built from one object layer of a map

use crate::foundation::math::{Vec2, VectorExt};
use crate::geometry::{Aabb, ConvexDecomposer, ConvexPolygon, ShapeId};
use crate::level::{MapLayer, MapObject, ObjectKind, ShapeProperties};
use crate::spatial::{QuadTree, QuadTreeConfig, QuadTreeEntry};

use super::body::DynamicBody;
use super::shape::{BodyShape, Collision, Shape};

/// Convex shapes of an object layer indexed by a quadtree
///
/// Polygon objects are decomposed into convex pieces; rectangle objects
/// become (possibly rotated) quads. Every piece keeps the properties of its
/// source object. Other object kinds are not collidable and are skipped.
#[derive(Debug, Clone)]
pub struct ShapeLayer {
    name: String,
    shapes: Vec<Shape>,
    quad_tree: QuadTree,
}

impl ShapeLayer {
    /// Build the shapes of `layer` and index them
    pub fn new(layer: &MapLayer, config: &QuadTreeConfig, decomposer: &dyn ConvexDecomposer) -> Self {
        let mut builder = ShapeBuilder {
            decomposer,
            shapes: Vec::new(),
        };

        for object in &layer.objects {
            match object.kind() {
                ObjectKind::Polygon(points) => {
                    let origin = Vec2::new(object.x, object.y);
                    let vertices: Vec<Vec2> = points.iter().map(|&point| origin + Vec2::from(point)).collect();
                    builder.add_polygon(object, &vertices);
                }
                ObjectKind::Rectangle => builder.add_rectangle(object),
                kind => log::trace!("layer '{}': skipping non-collidable {:?} object {}", layer.name, kind, object.id),
            }
        }

        let entries = builder
            .shapes
            .iter()
            .map(|shape| QuadTreeEntry {
                id: shape.id(),
                aabb: *shape.aabb(),
            })
            .collect();
        let quad_tree = QuadTree::new(entries, *config);

        log::debug!(
            "built shape layer '{}': {} shapes from {} objects, quadtree depth {}",
            layer.name,
            builder.shapes.len(),
            layer.objects.len(),
            quad_tree.depth()
        );

        Self {
            name: layer.name.clone(),
            shapes: builder.shapes,
            quad_tree,
        }
    }

    /// Name of the source object layer
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All shapes, indexed by [`ShapeId`]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Shape by id
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.0)
    }

    /// Number of shapes
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// True if the layer produced no shapes
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Broad-phase index
    pub fn quad_tree(&self) -> &QuadTree {
        &self.quad_tree
    }

    /// Shapes whose bounds may intersect `aabb`, in shape-list order
    pub fn candidate_shapes(&self, aabb: &Aabb) -> Vec<&Shape> {
        let mut ids = self.quad_tree.candidate_shapes(aabb);
        ids.sort_unstable();
        ids.into_iter().filter_map(|id| self.shape(id)).collect()
    }

    /// Narrow-phase test of one shape against a body
    pub fn collide_with(&self, shape: &Shape, body: &dyn DynamicBody) -> Option<Collision> {
        shape.collide(&BodyShape::of(body))
    }

    /// Broad and narrow phase: every shape the body overlaps
    ///
    /// The body bounds are grown by `margin` before the broad-phase query so
    /// that touching shapes are reported too.
    pub fn collisions(&self, body: &dyn DynamicBody, margin: f32) -> Vec<(&Shape, Collision)> {
        let proxy = BodyShape::of(body);
        self.candidate_shapes(&body.aabb().expanded(margin))
            .into_iter()
            .filter_map(|shape| shape.collide(&proxy).map(|collision| (shape, collision)))
            .collect()
    }
}

struct ShapeBuilder<'a> {
    decomposer: &'a dyn ConvexDecomposer,
    shapes: Vec<Shape>,
}

impl ShapeBuilder<'_> {
    fn add_rectangle(&mut self, object: &MapObject) {
        let mut width = Vec2::new(object.width, 0.0);
        let mut height = Vec2::new(0.0, object.height);
        // Tiled rotates clockwise about the top-left corner
        let angle = -object.rotation.to_radians();
        if angle != 0.0 {
            width = width.rotated(angle);
            height = height.rotated(angle);
        }

        let origin = Vec2::new(object.x, object.y);
        let vertices = [origin, origin + width, origin + width + height, origin + height];
        self.add_polygon(object, &vertices);
    }

    fn add_polygon(&mut self, object: &MapObject, vertices: &[Vec2]) {
        if vertices.len() < 3 {
            log::warn!("object {} has {} vertices, need at least 3", object.id, vertices.len());
            return;
        }
        for polygon in ConvexPolygon::generate_convex_polygons(vertices, self.decomposer) {
            self.push(polygon, object.properties.clone());
        }
    }

    fn push(&mut self, polygon: ConvexPolygon, properties: ShapeProperties) {
        let id = ShapeId(self.shapes.len());
        self.shapes.push(Shape::new(id, polygon, properties));
    }
}
