//! Enter/leave notifications for trigger regions
//!
//! Regions come from their own object layer and are queried independently of
//! [`Physics`](crate::physics::Physics): a region may overlap solid geometry
//! and never affects a body's position or velocity.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use super::{difference, ListenerId, ListenerIds};
use crate::config::PhysicsConfig;
use crate::geometry::{ConvexDecomposer, EarClipDecomposer};
use crate::level::TileMap;
use crate::physics::{DynamicBody, PhysicsError, Shape, ShapeId, ShapeLayer};

/// A body entered or left a region
#[derive(Debug, Clone, Copy)]
pub struct RegionEvent<'a> {
    /// The region shape
    pub shape: &'a Shape,
}

type RegionListener = Box<dyn FnMut(&RegionEvent<'_>)>;

#[derive(Default)]
struct RegionTracker {
    previous: Vec<ShapeId>,
    on_enter: Vec<(ListenerId, RegionListener)>,
    on_leave: Vec<(ListenerId, RegionListener)>,
}

impl RegionTracker {
    fn update(&mut self, layer: &ShapeLayer, current: Vec<ShapeId>) {
        let entered = difference(&current, &self.previous);
        let left = difference(&self.previous, &current);
        Self::fire(&mut self.on_enter, layer, &entered);
        Self::fire(&mut self.on_leave, layer, &left);
        self.previous = current;
    }

    fn fire(listeners: &mut [(ListenerId, RegionListener)], layer: &ShapeLayer, ids: &[ShapeId]) {
        for shape in ids.iter().filter_map(|&id| layer.shape(id)) {
            let event = RegionEvent { shape };
            for (_, listener) in listeners.iter_mut() {
                listener(&event);
            }
        }
    }
}

/// Trigger regions with per-entity enter and leave listeners
pub struct RegionEvents<K> {
    map: Arc<TileMap>,
    config: PhysicsConfig,
    decomposer: Box<dyn ConvexDecomposer>,
    shape_layer: Option<ShapeLayer>,
    trackers: HashMap<K, RegionTracker>,
    ids: ListenerIds,
}

impl<K: Eq + Hash + Clone> RegionEvents<K> {
    /// Region events over `map` with no layer enabled
    pub fn new(map: Arc<TileMap>) -> Self {
        Self {
            map,
            config: PhysicsConfig::default(),
            decomposer: Box::new(EarClipDecomposer::default()),
            shape_layer: None,
            trackers: HashMap::new(),
            ids: ListenerIds::default(),
        }
    }

    /// Replace the tuning configuration
    pub fn with_config(mut self, config: PhysicsConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the polygon decomposer
    pub fn with_decomposer(mut self, decomposer: impl ConvexDecomposer + 'static) -> Self {
        self.decomposer = Box::new(decomposer);
        self
    }

    /// Build the regions of the named object layer
    ///
    /// Entities still inside regions of the previous layer get a leave event
    /// for each of them; listeners are kept.
    pub fn enable_object_layer(&mut self, name: &str) -> Result<(), PhysicsError> {
        let layer = self
            .map
            .object_layer(name)
            .ok_or_else(|| PhysicsError::LayerNotFound(name.to_string()))?;
        let shape_layer = ShapeLayer::new(layer, &self.config.quad_tree, self.decomposer.as_ref());
        log::debug!("enabled region layer '{}' with {} regions", name, shape_layer.len());
        self.leave_all();
        self.shape_layer = Some(shape_layer);
        Ok(())
    }

    /// Stop reporting regions, firing leave events for occupied ones
    pub fn disable(&mut self) {
        self.leave_all();
        self.shape_layer = None;
    }

    /// Report every occupied region of the current layer as left
    fn leave_all(&mut self) {
        for tracker in self.trackers.values_mut() {
            let previous = std::mem::take(&mut tracker.previous);
            if let Some(layer) = &self.shape_layer {
                RegionTracker::fire(&mut tracker.on_leave, layer, &previous);
            }
        }
    }

    /// The enabled region layer
    pub fn shape_layer(&self) -> Option<&ShapeLayer> {
        self.shape_layer.as_ref()
    }

    /// Register an enter listener for `entity`
    pub fn on_enter_add<F>(&mut self, entity: K, listener: F) -> ListenerId
    where
        F: FnMut(&RegionEvent<'_>) + 'static,
    {
        let id = self.ids.allocate();
        self.trackers
            .entry(entity)
            .or_default()
            .on_enter
            .push((id, Box::new(listener)));
        id
    }

    /// Unregister an enter listener
    pub fn on_enter_remove(&mut self, entity: &K, id: ListenerId) -> bool {
        self.trackers
            .get_mut(entity)
            .is_some_and(|tracker| remove_listener(&mut tracker.on_enter, id))
    }

    /// Register a leave listener for `entity`
    pub fn on_leave_add<F>(&mut self, entity: K, listener: F) -> ListenerId
    where
        F: FnMut(&RegionEvent<'_>) + 'static,
    {
        let id = self.ids.allocate();
        self.trackers
            .entry(entity)
            .or_default()
            .on_leave
            .push((id, Box::new(listener)));
        id
    }

    /// Unregister a leave listener
    pub fn on_leave_remove(&mut self, entity: &K, id: ListenerId) -> bool {
        self.trackers
            .get_mut(entity)
            .is_some_and(|tracker| remove_listener(&mut tracker.on_leave, id))
    }

    /// Query the regions `body` overlaps and fire enter/leave listeners
    ///
    /// No-op while no layer is enabled.
    pub fn trigger_with(&mut self, entity: K, body: &dyn DynamicBody) {
        let Some(layer) = &self.shape_layer else {
            return;
        };
        let current = layer
            .collisions(body, self.config.broad_phase_margin)
            .into_iter()
            .map(|(shape, _)| shape.id())
            .collect();
        self.trackers.entry(entity).or_default().update(layer, current);
    }

    /// Record the regions `entity` overlaps this step and fire listeners
    ///
    /// `regions` are ids within [`RegionEvents::shape_layer`]. No-op while no
    /// layer is enabled.
    pub fn notify(&mut self, entity: K, regions: &[ShapeId]) {
        let Some(layer) = &self.shape_layer else {
            return;
        };
        self.trackers
            .entry(entity)
            .or_default()
            .update(layer, regions.to_vec());
    }

    /// Drop all state of `entity`; false if it was not tracked
    pub fn forget(&mut self, entity: &K) -> bool {
        self.trackers.remove(entity).is_some()
    }

    /// Number of entities with tracking state
    pub fn tracked_entities(&self) -> usize {
        self.trackers.len()
    }

    /// Regions `entity` overlapped in its last step
    pub fn current_regions(&self, entity: &K) -> &[ShapeId] {
        self.trackers
            .get(entity)
            .map_or(&[][..], |tracker| tracker.previous.as_slice())
    }
}

fn remove_listener(listeners: &mut Vec<(ListenerId, RegionListener)>, id: ListenerId) -> bool {
    let before = listeners.len();
    listeners.retain(|(listener_id, _)| *listener_id != id);
    listeners.len() != before
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::level::{MapLayer, MapObject};
    use crate::physics::Body;

    #[derive(Debug, Clone, PartialEq)]
    enum Seen {
        Enter(ShapeId),
        Leave(ShapeId),
    }

    fn map() -> Arc<TileMap> {
        Arc::new(TileMap {
            layers: vec![
                MapLayer::object_group(
                    "regions",
                    vec![
                        MapObject::rectangle(0.0, 0.0, 50.0, 50.0),
                        MapObject::rectangle(40.0, 0.0, 50.0, 50.0),
                    ],
                ),
                MapLayer::object_group("solid", vec![MapObject::rectangle(0.0, 0.0, 200.0, 200.0)]),
            ],
        })
    }

    fn listen(regions: &mut RegionEvents<u32>, entity: u32) -> Rc<RefCell<Vec<Seen>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let enter = Rc::clone(&seen);
        regions.on_enter_add(entity, move |event| enter.borrow_mut().push(Seen::Enter(event.shape.id())));
        let leave = Rc::clone(&seen);
        regions.on_leave_add(entity, move |event| leave.borrow_mut().push(Seen::Leave(event.shape.id())));
        seen
    }

    #[test]
    fn test_enter_and_leave() {
        let mut regions = RegionEvents::new(map());
        regions.enable_object_layer("regions").unwrap();
        let seen = listen(&mut regions, 1);

        let mut body = Body::new(10.0, 10.0, 5.0, 5.0);
        regions.trigger_with(1, &body);
        assert_eq!(*seen.borrow(), vec![Seen::Enter(ShapeId(0))]);

        // Overlap of both regions
        body.position.x = 42.0;
        regions.trigger_with(1, &body);
        assert_eq!(seen.borrow().last(), Some(&Seen::Enter(ShapeId(1))));
        assert_eq!(regions.current_regions(&1), &[ShapeId(0), ShapeId(1)]);

        body.position.x = 70.0;
        regions.trigger_with(1, &body);
        assert_eq!(seen.borrow().last(), Some(&Seen::Leave(ShapeId(0))));

        body.position.x = 300.0;
        regions.trigger_with(1, &body);
        assert_eq!(
            *seen.borrow(),
            vec![
                Seen::Enter(ShapeId(0)),
                Seen::Enter(ShapeId(1)),
                Seen::Leave(ShapeId(0)),
                Seen::Leave(ShapeId(1)),
            ]
        );
    }

    #[test]
    fn test_staying_inside_fires_nothing() {
        let mut regions = RegionEvents::new(map());
        regions.enable_object_layer("regions").unwrap();
        let seen = listen(&mut regions, 1);

        let body = Body::new(10.0, 10.0, 5.0, 5.0);
        regions.trigger_with(1, &body);
        regions.trigger_with(1, &body);
        regions.trigger_with(1, &body);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_listener_removal() {
        let mut regions = RegionEvents::new(map());
        regions.enable_object_layer("regions").unwrap();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = regions.on_enter_add(1, move |_| *sink.borrow_mut() += 1);

        assert!(!regions.on_leave_remove(&1, id));
        assert!(regions.on_enter_remove(&1, id));
        regions.notify(1, &[ShapeId(0)]);
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_disabled_and_unknown_layers() {
        let mut regions: RegionEvents<u32> = RegionEvents::new(map());
        regions.trigger_with(1, &Body::new(10.0, 10.0, 5.0, 5.0));
        assert_eq!(regions.tracked_entities(), 0);

        assert!(matches!(
            regions.enable_object_layer("missing"),
            Err(PhysicsError::LayerNotFound(name)) if name == "missing"
        ));

        regions.enable_object_layer("solid").unwrap();
        regions.trigger_with(1, &Body::new(10.0, 10.0, 5.0, 5.0));
        assert_eq!(regions.current_regions(&1), &[ShapeId(0)]);
        assert!(regions.forget(&1));
        assert_eq!(regions.tracked_entities(), 0);

        regions.disable();
        assert!(regions.shape_layer().is_none());
    }

    #[test]
    fn test_switching_layers_leaves_old_regions() {
        let map = Arc::new(TileMap {
            layers: vec![
                MapLayer::object_group("water", vec![MapObject::rectangle(0.0, 0.0, 50.0, 50.0)]),
                MapLayer::object_group("lava", vec![MapObject::rectangle(100.0, 0.0, 50.0, 50.0)]),
            ],
        });
        let mut regions = RegionEvents::new(map);
        regions.enable_object_layer("water").unwrap();
        let seen = listen(&mut regions, 1);

        let mut body = Body::new(10.0, 10.0, 5.0, 5.0);
        regions.trigger_with(1, &body);
        assert_eq!(*seen.borrow(), vec![Seen::Enter(ShapeId(0))]);

        regions.enable_object_layer("lava").unwrap();
        assert_eq!(seen.borrow().last(), Some(&Seen::Leave(ShapeId(0))));
        assert!(regions.current_regions(&1).is_empty());

        body.position.x = 110.0;
        regions.trigger_with(1, &body);
        assert_eq!(seen.borrow().last(), Some(&Seen::Enter(ShapeId(0))));

        regions.disable();
        assert_eq!(
            *seen.borrow(),
            vec![
                Seen::Enter(ShapeId(0)),
                Seen::Leave(ShapeId(0)),
                Seen::Enter(ShapeId(0)),
                Seen::Leave(ShapeId(0)),
            ]
        );
        assert!(regions.current_regions(&1).is_empty());
    }
}
