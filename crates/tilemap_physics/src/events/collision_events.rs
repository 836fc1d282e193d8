//! Contact-begin notifications for bodies resolved by [`Physics`](crate::physics::Physics)

use std::collections::HashMap;
use std::hash::Hash;

use super::{difference, ListenerId, ListenerIds};
use crate::foundation::math::Vec2;
use crate::physics::{Shape, ShapeId};

/// A body started touching a shape
#[derive(Debug, Clone, Copy)]
pub struct CollisionEvent<'a> {
    /// The newly touched shape
    pub shape: &'a Shape,
    /// Body velocity before resolution
    pub old_velocity: Vec2,
    /// Body velocity after resolution
    pub new_velocity: Vec2,
    /// Combined contact normal of the step
    pub contact_normal: Vec2,
}

type CollisionListener = Box<dyn FnMut(&CollisionEvent<'_>)>;

#[derive(Default)]
struct Tracker {
    previous: Vec<ShapeId>,
    listeners: Vec<(ListenerId, CollisionListener)>,
}

/// Per-entity contact tracking with enter listeners
///
/// Each notify compares the shapes touched this step with those of the
/// previous step and fires every listener of the entity once per newly
/// touched shape.
pub struct CollisionEvents<K> {
    trackers: HashMap<K, Tracker>,
    ids: ListenerIds,
}

impl<K> Default for CollisionEvents<K> {
    fn default() -> Self {
        Self {
            trackers: HashMap::new(),
            ids: ListenerIds::default(),
        }
    }
}

impl<K: Eq + Hash + Clone> CollisionEvents<K> {
    /// No tracked entities
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `entity`
    pub fn add<F>(&mut self, entity: K, listener: F) -> ListenerId
    where
        F: FnMut(&CollisionEvent<'_>) + 'static,
    {
        let id = self.ids.allocate();
        self.trackers
            .entry(entity)
            .or_default()
            .listeners
            .push((id, Box::new(listener)));
        id
    }

    /// Unregister a listener; false if it was not registered for `entity`
    pub fn remove(&mut self, entity: &K, id: ListenerId) -> bool {
        let Some(tracker) = self.trackers.get_mut(entity) else {
            return false;
        };
        let before = tracker.listeners.len();
        tracker.listeners.retain(|(listener_id, _)| *listener_id != id);
        tracker.listeners.len() != before
    }

    /// Record the shapes `entity` touches this step and fire enter listeners
    pub fn notify(
        &mut self,
        entity: K,
        shapes: &[&Shape],
        old_velocity: Vec2,
        new_velocity: Vec2,
        contact_normal: Vec2,
    ) {
        let tracker = self.trackers.entry(entity).or_default();
        let current: Vec<ShapeId> = shapes.iter().map(|shape| shape.id()).collect();
        let entered = difference(&current, &tracker.previous);
        for shape in shapes.iter().copied().filter(|shape| entered.contains(&shape.id())) {
            let event = CollisionEvent {
                shape,
                old_velocity,
                new_velocity,
                contact_normal,
            };
            for (_, listener) in &mut tracker.listeners {
                listener(&event);
            }
        }
        tracker.previous = current;
    }

    /// Forget every entity's contacts, keeping listeners
    ///
    /// Shape ids belong to one layer; after the layer is rebuilt or replaced,
    /// the next contact with any shape is a new one.
    pub(crate) fn reset_contacts(&mut self) {
        for tracker in self.trackers.values_mut() {
            tracker.previous.clear();
        }
    }

    /// Drop all state of `entity`; false if it was not tracked
    pub fn forget(&mut self, entity: &K) -> bool {
        self.trackers.remove(entity).is_some()
    }

    /// Number of entities with tracking state
    pub fn tracked_entities(&self) -> usize {
        self.trackers.len()
    }

    /// Shapes `entity` touched in its last notified step
    pub fn current_shapes(&self, entity: &K) -> &[ShapeId] {
        self.trackers
            .get(entity)
            .map_or(&[][..], |tracker| tracker.previous.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::geometry::ConvexPolygon;
    use crate::level::ShapeProperties;

    fn shapes(count: usize) -> Vec<Shape> {
        (0..count)
            .map(|i| {
                let left = i as f32 * 10.0;
                Shape::new(
                    ShapeId(i),
                    ConvexPolygon::rectangle_unchecked(left, 0.0, left + 10.0, 10.0),
                    ShapeProperties::default(),
                )
            })
            .collect()
    }

    fn recorder(events: &mut CollisionEvents<u32>, entity: u32) -> (ListenerId, Rc<RefCell<Vec<ShapeId>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = events.add(entity, move |event| sink.borrow_mut().push(event.shape.id()));
        (id, seen)
    }

    #[test]
    fn test_enter_fires_once_per_new_shape() {
        let shapes = shapes(3);
        let mut events = CollisionEvents::new();
        let (_, seen) = recorder(&mut events, 1);
        let zero = Vec2::zeros();

        events.notify(1, &[&shapes[0], &shapes[2]], zero, zero, zero);
        assert_eq!(*seen.borrow(), vec![ShapeId(0), ShapeId(2)]);

        events.notify(1, &[&shapes[0], &shapes[1], &shapes[2]], zero, zero, zero);
        assert_eq!(*seen.borrow(), vec![ShapeId(0), ShapeId(2), ShapeId(1)]);

        events.notify(1, &[], zero, zero, zero);
        events.notify(1, &[&shapes[2]], zero, zero, zero);
        assert_eq!(seen.borrow().last(), Some(&ShapeId(2)));
        assert_eq!(seen.borrow().len(), 4);
        assert_eq!(events.current_shapes(&1), &[ShapeId(2)]);
    }

    #[test]
    fn test_event_carries_velocities() {
        let shapes = shapes(1);
        let mut events = CollisionEvents::new();
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        events.add("player", move |event: &CollisionEvent<'_>| {
            *sink.borrow_mut() = Some((event.old_velocity, event.new_velocity, event.contact_normal));
        });

        let normal = Vec2::new(0.0, -1.0);
        events.notify("player", &[&shapes[0]], Vec2::new(0.0, 50.0), Vec2::zeros(), normal);
        assert_eq!(*seen.borrow(), Some((Vec2::new(0.0, 50.0), Vec2::zeros(), normal)));
    }

    #[test]
    fn test_listeners_are_per_entity_and_removable() {
        let shapes = shapes(1);
        let mut events = CollisionEvents::new();
        let (first, first_seen) = recorder(&mut events, 1);
        let (_, second_seen) = recorder(&mut events, 1);
        let (_, other_seen) = recorder(&mut events, 2);
        let zero = Vec2::zeros();

        assert!(events.remove(&1, first));
        assert!(!events.remove(&1, first));
        assert!(!events.remove(&3, first));

        events.notify(1, &[&shapes[0]], zero, zero, zero);
        assert!(first_seen.borrow().is_empty());
        assert_eq!(*second_seen.borrow(), vec![ShapeId(0)]);
        assert!(other_seen.borrow().is_empty());
    }

    #[test]
    fn test_forget_releases_state() {
        let shapes = shapes(1);
        let mut events: CollisionEvents<u32> = CollisionEvents::new();
        let zero = Vec2::zeros();

        events.notify(7, &[&shapes[0]], zero, zero, zero);
        events.notify(8, &[], zero, zero, zero);
        assert_eq!(events.tracked_entities(), 2);

        assert!(events.forget(&7));
        assert!(!events.forget(&7));
        assert_eq!(events.tracked_entities(), 1);
        assert!(events.current_shapes(&7).is_empty());
    }
}
