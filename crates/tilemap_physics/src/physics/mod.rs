//! Static-geometry collision for dynamic bodies
//!
//! [`Physics`] builds a [`ShapeLayer`] from one object layer of a map and, on
//! every [`Physics::collide_with`] call, pushes a body out of the shapes it
//! entered this step:
//!
//! 1. Broad phase: quadtree query with the body bounds grown by a margin
//! 2. Narrow phase: SAT against each candidate
//! 3. Contact filtering: separating contacts, contacts the body was already
//!    inside of before the step, and one-way shapes approached from the wrong
//!    side are dropped
//! 4. Resolution through the configured [`ContactResolver`]
//! 5. Enter notifications through [`CollisionEvents`]

mod body;
mod resolver;
mod shape;
mod shape_layer;


pub use body::{Blocked, Body, DynamicBody};
pub use resolver::{Contact, ContactResolver, ContactSet, Resolution, SinglePassResolver};
pub use shape::{BodyShape, Collision, Shape};
pub use shape_layer::ShapeLayer;

pub use crate::geometry::ShapeId;
pub use crate::level::{ShapeProperties, Side};

use std::hash::Hash;
use std::sync::Arc;

use thiserror::Error;

use crate::config::PhysicsConfig;
use crate::events::CollisionEvents;
use crate::foundation::math::Vec2;
use crate::geometry::{ConvexDecomposer, EarClipDecomposer};
use crate::level::TileMap;

/// Physics errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    /// The map has no object layer with this name
    #[error("object layer not found: {0}")]
    LayerNotFound(String),
}

/// Why a narrow-phase contact was not resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Separating,
    AlreadyInside,
    OneWay,
}

/// Collision world for one map, keyed by host entity `K`
pub struct Physics<K = u64> {
    map: Arc<TileMap>,
    config: PhysicsConfig,
    decomposer: Box<dyn ConvexDecomposer>,
    resolver: Box<dyn ContactResolver>,
    shape_layer: Option<ShapeLayer>,
    events: CollisionEvents<K>,
}

impl<K: Eq + Hash + Clone> Physics<K> {
    /// Physics over `map` with no layer enabled
    pub fn new(map: Arc<TileMap>) -> Self {
        Self {
            map,
            config: PhysicsConfig::default(),
            decomposer: Box::new(EarClipDecomposer::default()),
            resolver: Box::new(SinglePassResolver),
            shape_layer: None,
            events: CollisionEvents::new(),
        }
    }

    /// Replace the tuning configuration; affects layers enabled afterwards
    pub fn with_config(mut self, config: PhysicsConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the polygon decomposer; affects layers enabled afterwards
    pub fn with_decomposer(mut self, decomposer: impl ConvexDecomposer + 'static) -> Self {
        self.decomposer = Box::new(decomposer);
        self
    }

    /// Replace the collision response
    pub fn with_resolver(mut self, resolver: impl ContactResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Tuning configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Source map
    pub fn map(&self) -> &Arc<TileMap> {
        &self.map
    }

    /// Build collision shapes from the named object layer, replacing any
    /// previously enabled layer
    pub fn enable_object_layer(&mut self, name: &str) -> Result<(), PhysicsError> {
        let layer = self
            .map
            .object_layer(name)
            .ok_or_else(|| PhysicsError::LayerNotFound(name.to_string()))?;
        let shape_layer = ShapeLayer::new(layer, &self.config.quad_tree, self.decomposer.as_ref());
        log::debug!("enabled collision layer '{}' with {} shapes", name, shape_layer.len());
        self.shape_layer = Some(shape_layer);
        self.events.reset_contacts();
        Ok(())
    }

    /// Drop the enabled layer; [`Physics::collide_with`] becomes a no-op
    pub fn disable(&mut self) {
        self.shape_layer = None;
        self.events.reset_contacts();
    }

    /// The enabled layer
    pub fn shape_layer(&self) -> Option<&ShapeLayer> {
        self.shape_layer.as_ref()
    }

    /// Contact listeners
    pub fn collision_events(&self) -> &CollisionEvents<K> {
        &self.events
    }

    /// Contact listeners, for registration and [`CollisionEvents::forget`]
    pub fn collision_events_mut(&mut self) -> &mut CollisionEvents<K> {
        &mut self.events
    }

    /// Resolve one step of `body` against the enabled layer
    ///
    /// Writes position, velocity, contact normal and blocked flags back to
    /// the body, then notifies the enter listeners of `entity`. Returns
    /// `None` when no layer is enabled.
    pub fn collide_with(&mut self, entity: K, body: &mut dyn DynamicBody) -> Option<Resolution> {
        let layer = self.shape_layer.as_ref()?;

        let velocity = body.velocity();
        let delta = body.position() - body.previous_position();
        let mut contacts = ContactSet::new();

        for (shape, collision) in layer.collisions(&*body, self.config.broad_phase_margin) {
            match self.filter(shape, &collision, &velocity, &delta) {
                Ok(()) => {
                    log::trace!("contact with shape {:?}: normal {:?}", shape.id(), collision.normal);
                    contacts.push(Contact {
                        shape: shape.id(),
                        normal: collision.normal,
                        penetration: collision.penetration,
                        bounce: shape.properties().bounce_or_default(),
                    });
                }
                Err(reason) => log::trace!("ignoring shape {:?}: {:?}", shape.id(), reason),
            }
        }

        let resolution = self.resolver.resolve(body, &contacts);
        let shapes: Vec<&Shape> = contacts.shape_ids().filter_map(|id| layer.shape(id)).collect();
        self.events.notify(
            entity,
            &shapes,
            resolution.old_velocity,
            resolution.new_velocity,
            resolution.contact_normal,
        );
        Some(resolution)
    }

    fn filter(&self, shape: &Shape, collision: &Collision, velocity: &Vec2, delta: &Vec2) -> Result<(), Rejection> {
        let normal = &collision.normal;
        if velocity.dot(normal) >= 0.0 {
            return Err(Rejection::Separating);
        }

        // Where the body was relative to the corrected position: a contact is
        // a fresh entry only if the previous position lies outside the shape
        // along the normal, within the tolerance.
        let outside = collision.penetration - delta;
        if outside.dot(normal) < -self.config.entry_tolerance {
            return Err(Rejection::AlreadyInside);
        }

        if !shape.properties().admits(velocity, normal) {
            return Err(Rejection::OneWay);
        }
        Ok(())
    }
}
