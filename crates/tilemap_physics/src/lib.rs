//! # Tilemap Physics
//!
//! Static-geometry collision for 2D tile-based levels.
//!
//! ## Features
//!
//! - **Level geometry**: polygon and (rotated) rectangle objects of a Tiled
//!   object layer become convex collision shapes; concave polygons are
//!   decomposed
//! - **Broad phase**: a static quadtree over the shape bounds
//! - **Narrow phase**: Separating Axis Theorem with minimum translation vector
//! - **Response**: position correction, bounce, one-way platforms and
//!   sticky blocked flags
//! - **Events**: contact-begin notifications and enter/leave trigger regions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tilemap_physics::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let map = Arc::new(TileMap::from_json_file("level.json")?);
//!     let mut physics: Physics<u32> = Physics::new(map);
//!     physics.enable_object_layer("collision")?;
//!
//!     let mut player = Body::new(40.0, 80.0, 10.0, 10.0).with_velocity(0.0, 50.0);
//!     player.reset_blocked();
//!     player.advance(1.0 / 60.0);
//!     physics.collide_with(1, &mut player);
//!
//!     if player.blocked.contains(Blocked::DOWN) {
//!         // on the ground
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod events;
pub mod foundation;
pub mod geometry;
pub mod level;
pub mod physics;
pub mod spatial;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, PhysicsConfig},
        events::{CollisionEvent, CollisionEvents, ListenerId, RegionEvent, RegionEvents},
        foundation::math::{Vec2, VectorExt},
        geometry::{Aabb, ConvexDecomposer, ConvexPolygon, EarClipDecomposer, GeometryError, Range},
        level::{LevelError, MapLayer, MapObject, ShapeProperties, Side, TileMap},
        physics::{Blocked, Body, ContactResolver, DynamicBody, Physics, PhysicsError, Shape, ShapeId, ShapeLayer},
    };
}
