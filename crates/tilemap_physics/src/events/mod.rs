//! Contact and trigger-region notifications
//!
//! Both event layers keep, per entity, the shapes touched in the previous
//! step and report the difference to registered listeners. Per-entity state
//! lives until the host calls `forget`; nothing is dropped automatically.

mod collision_events;
mod region_events;

pub use collision_events::{CollisionEvent, CollisionEvents};
pub use region_events::{RegionEvent, RegionEvents};

use std::collections::HashSet;

use crate::physics::ShapeId;

/// Handle returned when a listener is registered, used to remove it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Source of unique listener handles
#[derive(Debug, Default)]
pub(crate) struct ListenerIds {
    next: u64,
}

impl ListenerIds {
    pub(crate) fn allocate(&mut self) -> ListenerId {
        let id = ListenerId(self.next);
        self.next += 1;
        id
    }
}

/// Ids of `from` that are not in `without`, in `from` order
pub(crate) fn difference(from: &[ShapeId], without: &[ShapeId]) -> Vec<ShapeId> {
    let without: HashSet<ShapeId> = without.iter().copied().collect();
    from.iter().copied().filter(|id| !without.contains(id)).collect()
}
