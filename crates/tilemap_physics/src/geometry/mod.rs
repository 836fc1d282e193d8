//! Planar geometry primitives
//!
//! Value types used by the collision engine:
//! - [`Range`] - 1D interval, the result of projecting a shape onto an axis
//! - [`Aabb`] - axis-aligned bounding box with closed-interval semantics
//! - [`ConvexPolygon`] - convex shape with derived edges, outward normals and centroid
//! - [`ConvexDecomposer`] - splits arbitrary simple polygons into convex pieces

mod aabb;
mod convex_polygon;
mod decomposition;
mod range;

pub use aabb::Aabb;
pub use convex_polygon::ConvexPolygon;
pub use decomposition::{ConvexDecomposer, EarClipDecomposer, PassthroughDecomposer};
pub use range::Range;

use thiserror::Error;

/// Index of a shape within the collection that owns it, such as a
/// [`ShapeLayer`](crate::physics::ShapeLayer) or a
/// [`QuadTree`](crate::spatial::QuadTree) built over its bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub usize);

/// Errors raised when constructing shapes from invalid parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Rectangle bounds are inverted (`left > right` or `top > bottom`)
    #[error("invalid bounds: left={left}, top={top}, right={right}, bottom={bottom}")]
    InvalidBounds {
        /// Requested left edge
        left: f32,
        /// Requested top edge
        top: f32,
        /// Requested right edge
        right: f32,
        /// Requested bottom edge
        bottom: f32,
    },

    /// A numeric argument is outside its accepted domain
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested shape cannot be built from the given dimensions
    #[error("invalid shape: {0}")]
    InvalidShape(String),
}
