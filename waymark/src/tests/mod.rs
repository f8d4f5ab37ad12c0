//! In-memory map surface and helpers shared by the unit tests.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use waymark_types::geo::{GeoPoint, GeoPoint2d, NewGeoPoint};
use waymark_types::screen::{Point2d, Vector2d};
use waymark_types::ElementId;

use crate::error::InteractionError;
use crate::layer::LayerCallbacks;
use crate::surface::{
    MapSurface, RenderedShape, SubscriptionId, SurfaceEvent, SurfaceEventKind, SurfaceListener,
};


/// Pixels per degree of the test projection.
pub(crate) const SCALE: f64 = 100.0;

/// Point shapes closer than this to the pointer (in pixels) are hit.
pub(crate) const HIT_RADIUS: f64 = 20.0;

type Subscriptions = Vec<(SubscriptionId, SurfaceEventKind, Arc<dyn SurfaceListener>)>;

/// Surface with a flat projection: `x = lon * SCALE`, `y = -lat * SCALE`.
///
/// Hit-testing returns points within [`HIT_RADIUS`] pixels of the pointer and every non-point shape, in the order
/// they were added.
#[derive(Default)]
pub(crate) struct TestSurface {
    listeners: Mutex<Subscriptions>,
    next_id: AtomicU64,
    subscribe_count: AtomicUsize,
    shapes: Mutex<Vec<RenderedShape>>,
    queried: Mutex<Vec<Vec<String>>>,
    fail_subscribe: AtomicBool,
    fail_unsubscribe: AtomicBool,
    fail_query: AtomicBool,
    destroyed: AtomicBool,
}

impl TestSurface {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn add_shape(&self, shape: RenderedShape) {
        self.shapes.lock().push(shape);
    }

    pub(crate) fn clear_shapes(&self) {
        self.shapes.lock().clear();
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Number of successful `subscribe` calls since creation.
    pub(crate) fn subscribe_count(&self) -> usize {
        self.subscribe_count.load(Ordering::Relaxed)
    }

    /// Layer lists of all `query_rendered_shapes` calls.
    pub(crate) fn queried_layers(&self) -> Vec<Vec<String>> {
        self.queried.lock().clone()
    }

    pub(crate) fn fail_subscribe(&self, fail: bool) {
        self.fail_subscribe.store(fail, Ordering::Relaxed);
    }

    pub(crate) fn fail_unsubscribe(&self, fail: bool) {
        self.fail_unsubscribe.store(fail, Ordering::Relaxed);
    }

    pub(crate) fn fail_query(&self, fail: bool) {
        self.fail_query.store(fail, Ordering::Relaxed);
    }

    /// Makes every later `subscribe`, `unsubscribe` and query call fail with [`InteractionError::SurfaceGone`].
    pub(crate) fn destroy(&self) {
        self.destroyed.store(true, Ordering::Relaxed);
    }

    fn check_alive(&self) -> Result<(), InteractionError> {
        if self.destroyed.load(Ordering::Relaxed) {
            Err(InteractionError::SurfaceGone)
        } else {
            Ok(())
        }
    }

    /// Event of the given kind with the pointer at the given geographic point.
    pub(crate) fn event(&self, kind: SurfaceEventKind, position: GeoPoint2d) -> SurfaceEvent {
        SurfaceEvent::new(kind, to_screen(&position), position)
    }

    /// Event of the given kind with the pointer at the given screen point.
    pub(crate) fn event_at(&self, kind: SurfaceEventKind, position: Point2d) -> SurfaceEvent {
        SurfaceEvent::new(kind, position, to_geo(&position))
    }

    /// Calls every listener of the event kind and returns the event as the listeners left it.
    pub(crate) fn fire(&self, mut event: SurfaceEvent) -> SurfaceEvent {
        let listeners: Vec<_> = self
            .listeners
            .lock()
            .iter()
            .filter(|(_, kind, _)| *kind == event.kind())
            .map(|(_, _, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(&mut event);
        }

        event
    }
}

fn to_screen(point: &GeoPoint2d) -> Point2d {
    Point2d::new(point.lon() * SCALE, -point.lat() * SCALE)
}

fn to_geo(point: &Point2d) -> GeoPoint2d {
    GeoPoint2d::latlon(-point.y / SCALE, point.x / SCALE)
}

impl MapSurface for TestSurface {
    fn subscribe(
        &self,
        kind: SurfaceEventKind,
        listener: Arc<dyn SurfaceListener>,
    ) -> Result<SubscriptionId, InteractionError> {
        self.check_alive()?;
        if self.fail_subscribe.load(Ordering::Relaxed) {
            return Err(InteractionError::Subscribe {
                kind,
                reason: "surface is not loaded".into(),
            });
        }

        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, kind, listener));
        self.subscribe_count.fetch_add(1, Ordering::Relaxed);
        Ok(id)
    }

    fn unsubscribe(&self, subscription: SubscriptionId) -> Result<(), InteractionError> {
        self.check_alive()?;
        let mut listeners = self.listeners.lock();
        listeners.retain(|(id, _, _)| *id != subscription);

        if self.fail_unsubscribe.load(Ordering::Relaxed) {
            return Err(InteractionError::Unsubscribe {
                subscription,
                reason: "surface is destroyed".into(),
            });
        }

        Ok(())
    }

    fn query_rendered_shapes(
        &self,
        point: Point2d,
        layer_ids: &[&str],
    ) -> Result<Vec<RenderedShape>, InteractionError> {
        self.queried
            .lock()
            .push(layer_ids.iter().map(|id| id.to_string()).collect());
        self.check_alive()?;

        if self.fail_query.load(Ordering::Relaxed) {
            return Err(InteractionError::Query("style is not loaded".into()));
        }

        Ok(self
            .shapes
            .lock()
            .iter()
            .filter(|shape| layer_ids.contains(&shape.layer_id.as_str()))
            .filter(|shape| match shape.geometry.as_point() {
                Some(shape_point) => {
                    let offset: Vector2d = to_screen(shape_point) - point;
                    offset.norm() <= HIT_RADIUS
                }
                None => true,
            })
            .cloned()
            .collect())
    }

    fn project(&self, point: &GeoPoint2d) -> Option<Point2d> {
        Some(to_screen(point))
    }

    fn unproject(&self, point: &Point2d) -> Option<GeoPoint2d> {
        Some(to_geo(point))
    }
}

/// Callback fired by a router, as seen by a [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Recorded {
    Click(String, ElementId),
    HoverEnter(String, ElementId),
    HoverLeave(String, ElementId),
    DragStart(String, ElementId, Vector2d),
    Drag(String, ElementId, GeoPoint2d),
    DragEnd(String, ElementId),
}

/// Collects callbacks of any number of layers in the order they are fired.
#[derive(Clone, Default)]
pub(crate) struct Recorder {
    events: Arc<Mutex<Vec<Recorded>>>,
}

impl Recorder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Callbacks of all kinds that record events with the given layer name.
    pub(crate) fn callbacks(&self, layer: &str) -> LayerCallbacks {
        let record = |make: fn(String, ElementId) -> Recorded| {
            let events = self.events.clone();
            let layer = layer.to_owned();
            move |id: &ElementId, _: &SurfaceEvent| events.lock().push(make(layer.clone(), id.clone()))
        };

        let drag_start = {
            let events = self.events.clone();
            let layer = layer.to_owned();
            move |id: &ElementId, offset: Vector2d, _: &SurfaceEvent| {
                events
                    .lock()
                    .push(Recorded::DragStart(layer.clone(), id.clone(), offset))
            }
        };

        let drag = {
            let events = self.events.clone();
            let layer = layer.to_owned();
            move |id: &ElementId, position: GeoPoint2d, _: Vector2d, _: &SurfaceEvent| {
                events
                    .lock()
                    .push(Recorded::Drag(layer.clone(), id.clone(), position))
            }
        };

        LayerCallbacks::new()
            .on_click(record(Recorded::Click))
            .on_hover_enter(record(Recorded::HoverEnter))
            .on_hover_leave(record(Recorded::HoverLeave))
            .on_drag_start(drag_start)
            .on_drag(drag)
            .on_drag_end(record(Recorded::DragEnd))
    }

    /// Returns the recorded events and clears the record.
    pub(crate) fn take(&self) -> Vec<Recorded> {
        std::mem::take(&mut *self.events.lock())
    }
}
