//! Dynamic body contract consumed from the host

use bitflags::bitflags;

use crate::foundation::math::Vec2;
use crate::geometry::{Aabb, ConvexPolygon, GeometryError};

bitflags! {
    /// Sides of a body in contact with static geometry
    ///
    /// Flags are OR-accumulated by every resolved step; hosts that want
    /// "this frame only" semantics clear them before stepping (see
    /// [`Body::reset_blocked`]).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Blocked: u8 {
        /// Contact above the body (normal points down)
        const UP = 1 << 0;
        /// Contact below the body (normal points up), i.e. standing on ground
        const DOWN = 1 << 1;
        /// Contact on the left of the body
        const LEFT = 1 << 2;
        /// Contact on the right of the body
        const RIGHT = 1 << 3;
        /// The last combined contact normal was zero
        const NONE = 1 << 4;
    }
}

impl Blocked {
    /// Fold a combined contact normal into the flags
    pub fn accumulate(&mut self, normal: &Vec2) {
        if normal.y > 0.0 {
            self.insert(Blocked::UP);
        }
        if normal.y < 0.0 {
            self.insert(Blocked::DOWN);
        }
        if normal.x > 0.0 {
            self.insert(Blocked::LEFT);
        }
        if normal.x < 0.0 {
            self.insert(Blocked::RIGHT);
        }
        self.set(Blocked::NONE, normal.x == 0.0 && normal.y == 0.0);
    }
}

/// Narrow view of a host body that collision resolution reads and writes
///
/// Physics reads the position, size, velocity, previous position and
/// optional custom shape, and writes back position, velocity, contact normal
/// and blocked flags. Positions are the top-left corner of the body box.
pub trait DynamicBody {
    /// Top-left corner
    fn position(&self) -> Vec2;

    /// Move the body
    fn set_position(&mut self, position: Vec2);

    /// Width and height of the body box
    fn size(&self) -> Vec2;

    /// Current velocity
    fn velocity(&self) -> Vec2;

    /// Replace the velocity
    fn set_velocity(&mut self, velocity: Vec2);

    /// Position at the start of the current step
    fn previous_position(&self) -> Vec2;

    /// Collision polygon in body-local coordinates, used instead of the box
    fn custom_shape(&self) -> Option<&ConvexPolygon> {
        None
    }

    /// Record the combined normal of the last resolved step
    fn set_contact_normal(&mut self, normal: Vec2);

    /// Contact flags, written by collision resolution
    fn blocked_mut(&mut self) -> &mut Blocked;

    /// World-space bounds: the custom shape's bounds if present, else the box
    fn aabb(&self) -> Aabb {
        let position = self.position();
        match self.custom_shape() {
            Some(shape) => shape.aabb().translated(&position),
            None => {
                let size = self.size();
                Aabb::new(position.x, position.y, position.x + size.x, position.y + size.y)
            }
        }
    }
}

/// Plain body value implementing [`DynamicBody`]
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Top-left corner
    pub position: Vec2,
    /// Width and height
    pub size: Vec2,
    /// Velocity in units per second
    pub velocity: Vec2,
    /// Position before the last [`Body::advance`]
    pub previous_position: Vec2,
    /// Optional collision polygon in body-local coordinates
    pub custom_shape: Option<ConvexPolygon>,
    /// Combined normal of the last resolved step
    pub contact_normal: Vec2,
    /// Accumulated contact flags
    pub blocked: Blocked,
}

impl Body {
    /// Body at rest with its top-left corner at `(x, y)`
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        let position = Vec2::new(x, y);
        Self {
            position,
            size: Vec2::new(width, height),
            velocity: Vec2::zeros(),
            previous_position: position,
            custom_shape: None,
            contact_normal: Vec2::zeros(),
            blocked: Blocked::empty(),
        }
    }

    /// Set the velocity
    pub fn with_velocity(mut self, x: f32, y: f32) -> Self {
        self.velocity = Vec2::new(x, y);
        self
    }

    /// Collide with `shape` (body-local coordinates) instead of the box
    pub fn with_custom_shape(mut self, shape: ConvexPolygon) -> Self {
        self.custom_shape = Some(shape);
        self
    }

    /// Collide with a capsule filling the body box
    pub fn with_capsule(self, cap_segments: usize) -> Result<Self, GeometryError> {
        let capsule = ConvexPolygon::from_capsule(0.0, 0.0, self.size.x, self.size.y, cap_segments)?;
        Ok(self.with_custom_shape(capsule))
    }

    /// Remember the current position and integrate velocity over `dt`
    pub fn advance(&mut self, dt: f32) {
        self.previous_position = self.position;
        self.position += self.velocity * dt;
    }

    /// Clear the sticky contact flags
    pub fn reset_blocked(&mut self) {
        self.blocked = Blocked::empty();
    }
}

impl DynamicBody for Body {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn previous_position(&self) -> Vec2 {
        self.previous_position
    }

    fn custom_shape(&self) -> Option<&ConvexPolygon> {
        self.custom_shape.as_ref()
    }

    fn set_contact_normal(&mut self, normal: Vec2) {
        self.contact_normal = normal;
    }

    fn blocked_mut(&mut self) -> &mut Blocked {
        &mut self.blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_accumulates() {
        let mut blocked = Blocked::empty();
        blocked.accumulate(&Vec2::new(0.0, -1.0));
        assert_eq!(blocked, Blocked::DOWN);
        blocked.accumulate(&Vec2::new(0.7, -0.7));
        assert_eq!(blocked, Blocked::DOWN | Blocked::LEFT);
        blocked.accumulate(&Vec2::zeros());
        assert_eq!(blocked, Blocked::DOWN | Blocked::LEFT | Blocked::NONE);
        blocked.accumulate(&Vec2::new(0.0, 1.0));
        assert_eq!(blocked, Blocked::DOWN | Blocked::LEFT | Blocked::UP);
    }

    #[test]
    fn test_advance_tracks_previous_position() {
        let mut body = Body::new(10.0, 20.0, 4.0, 4.0).with_velocity(8.0, -4.0);
        body.advance(0.5);
        assert_eq!(body.previous_position, Vec2::new(10.0, 20.0));
        assert_eq!(body.position, Vec2::new(14.0, 18.0));
    }

    #[test]
    fn test_aabb_uses_custom_shape() {
        let body = Body::new(10.0, 10.0, 4.0, 8.0);
        assert_eq!(body.aabb(), Aabb::new(10.0, 10.0, 14.0, 18.0));

        let shaped = body.with_custom_shape(ConvexPolygon::rectangle_unchecked(-2.0, -2.0, 2.0, 2.0));
        assert_eq!(shaped.aabb(), Aabb::new(8.0, 8.0, 12.0, 12.0));
    }

    #[test]
    fn test_capsule_body() {
        let body = Body::new(0.0, 0.0, 10.0, 20.0).with_capsule(6).unwrap();
        assert_eq!(body.custom_shape().unwrap().edges().len(), 14);
        assert!(Body::new(0.0, 0.0, 20.0, 10.0).with_capsule(6).is_err());
    }
}
