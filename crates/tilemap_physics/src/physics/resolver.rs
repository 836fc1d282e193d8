//! Contact accumulation and velocity/position response

use crate::foundation::math::{Vec2, VectorExt};
use crate::geometry::ShapeId;

use super::body::DynamicBody;

/// An accepted contact between a body and one static shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Shape the body touches
    pub shape: ShapeId,
    /// Unit normal pointing from the shape toward the body
    pub normal: Vec2,
    /// Penetration vector to subtract from the body position
    pub penetration: Vec2,
    /// Bounce factor of the shape
    pub bounce: f32,
}

/// Contacts accepted during one step, in shape-list order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactSet {
    contacts: Vec<Contact>,
}

impl ContactSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an accepted contact
    pub fn push(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    /// Iterate in acceptance order
    pub fn iter(&self) -> std::slice::Iter<'_, Contact> {
        self.contacts.iter()
    }

    /// Number of contacts
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// True if nothing was accepted
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Sum of contact normals (not normalized)
    pub fn normal_sum(&self) -> Vec2 {
        self.contacts.iter().fold(Vec2::zeros(), |sum, contact| sum + contact.normal)
    }

    /// Sum of penetration vectors
    pub fn penetration_sum(&self) -> Vec2 {
        self.contacts
            .iter()
            .fold(Vec2::zeros(), |sum, contact| sum + contact.penetration)
    }

    /// Sum of bounce factors
    pub fn bounce_sum(&self) -> f32 {
        self.contacts.iter().map(|contact| contact.bounce).sum()
    }

    /// Ids of the touched shapes
    pub fn shape_ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.contacts.iter().map(|contact| contact.shape)
    }
}

impl<'a> IntoIterator for &'a ContactSet {
    type Item = &'a Contact;
    type IntoIter = std::slice::Iter<'a, Contact>;

    fn into_iter(self) -> Self::IntoIter {
        self.contacts.iter()
    }
}

/// Outcome of resolving one step, reported to collision listeners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Velocity before resolution
    pub old_velocity: Vec2,
    /// Velocity after resolution
    pub new_velocity: Vec2,
    /// Combined unit normal, zero when there were no contacts
    pub contact_normal: Vec2,
}

/// Collision response strategy
pub trait ContactResolver: Send + Sync {
    /// Apply the accepted contacts to the body and report the result
    fn resolve(&self, body: &mut dyn DynamicBody, contacts: &ContactSet) -> Resolution;
}

/// Resolves all contacts of a step at once
///
/// The body is pushed out by the summed penetration. The velocity component
/// along the combined normal is removed and reflected by the summed bounce
/// factors; the tangential component is kept. Overlapping contacts that
/// share a direction therefore over-correct; that is accepted in exchange
/// for a single pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinglePassResolver;

impl ContactResolver for SinglePassResolver {
    fn resolve(&self, body: &mut dyn DynamicBody, contacts: &ContactSet) -> Resolution {
        let old_velocity = body.velocity();
        if contacts.is_empty() {
            body.set_contact_normal(Vec2::zeros());
            body.blocked_mut().accumulate(&Vec2::zeros());
            return Resolution {
                old_velocity,
                new_velocity: old_velocity,
                contact_normal: Vec2::zeros(),
            };
        }

        body.set_position(body.position() - contacts.penetration_sum());

        let normal = contacts.normal_sum().normalized_or_zero();
        let normal_velocity = normal * old_velocity.dot(&normal);
        let tangent_velocity = old_velocity - normal_velocity;
        let new_velocity = tangent_velocity - normal_velocity * contacts.bounce_sum();

        body.set_velocity(new_velocity);
        body.set_contact_normal(normal);
        body.blocked_mut().accumulate(&normal);

        Resolution {
            old_velocity,
            new_velocity,
            contact_normal: normal,
        }
    }
}
