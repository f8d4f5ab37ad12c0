//! Event router of a single pool.
//!
//! A pool is a named group of layers that share one event routing authority. The router of the pool listens to the
//! native events of the map surface and, for every event, decides which element of which member layer (if any)
//! gets the click, hover or drag callback. Only one callback of one layer fires for a single native event, no
//! matter how many overlapping layers of the pool have elements under the pointer.
//!
//! Candidates are ordered by layer priority first (lower values win, layers without priority go last), then by
//! distance to the pointer within a layer. The first candidate whose flags allow the interaction gets the event.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::{InteractionConfig, MultiTouchPolicy};
use crate::diagnostics::Diagnostics;
use crate::element::Interaction;
use crate::layer::{LayerBinding, LayerRegistration};
use crate::surface::{MapSurface, SubscriptionId, SurfaceEvent, SurfaceEventKind, SurfaceListener};

mod candidates;
mod state;

use candidates::Target;
use state::{Dispatch, RouterState};
pub use state::{DragSession, ElementRef};

/// Event router of one pool on one map surface.
///
/// Routers are created by a [`RoutingContext`](crate::RoutingContext) when the first layer joins a pool. The router
/// subscribes to the surface events when layers are added and removes the subscriptions when the last layer leaves.
/// Event kinds the surface failed to subscribe to are retried on the next registration.
pub struct EventRouter {
    pool: String,
    surface: Arc<dyn MapSurface>,
    config: InteractionConfig,
    diagnostics: Arc<dyn Diagnostics>,
    state: Mutex<RouterState>,
    subscriptions: Mutex<Vec<(SurfaceEventKind, SubscriptionId)>>,
}

impl EventRouter {
    /// Creates a router without subscriptions. [`EventRouter::attach`] subscribes it to the surface.
    pub(crate) fn new(
        pool: impl Into<String>,
        surface: Arc<dyn MapSurface>,
        config: InteractionConfig,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Arc<Self> {
        Arc::new(Self {
            pool: pool.into(),
            surface,
            config,
            diagnostics,
            state: Mutex::new(RouterState::default()),
            subscriptions: Mutex::new(Vec::new()),
        })
    }

    /// Name of the pool.
    pub fn pool(&self) -> &str {
        &self.pool
    }

    /// Returns true while the router listens to every surface event kind.
    pub fn is_attached(&self) -> bool {
        self.subscriptions.lock().len() == SurfaceEventKind::ALL.len()
    }

    /// Returns true if no layers are registered.
    pub fn is_empty(&self) -> bool {
        self.state.lock().layers.is_empty()
    }

    /// Ids of the registered layers in registration order.
    pub fn layer_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .layers
            .iter()
            .map(|layer| layer.layer_id().to_owned())
            .collect()
    }

    /// Current binding of the layer.
    pub fn binding(&self, layer_id: &str) -> Option<LayerBinding> {
        self.state
            .lock()
            .layers
            .iter()
            .find(|layer| layer.layer_id() == layer_id)
            .cloned()
    }

    /// Element currently under the pointer, if any.
    pub fn hovered(&self) -> Option<ElementRef> {
        self.state.lock().hover.clone()
    }

    /// Active drag session, if any.
    pub fn drag_session(&self) -> Option<DragSession> {
        self.state.lock().drag.clone()
    }

    /// Adds a layer to the pool or merges the registration into the existing binding of the layer.
    pub fn add_layer_listeners(self: &Arc<Self>, registration: LayerRegistration) {
        self.merge_layer(registration);
        self.attach();
    }

    /// Adds a layer to the pool or replaces every field of the existing binding of the layer. The layer keeps its
    /// place in the registration order.
    pub fn replace_layer_listeners(self: &Arc<Self>, registration: LayerRegistration) {
        self.replace_layer(registration);
        self.attach();
    }

    /// Removes the layer from the pool. When the last layer is removed, the router detaches from the surface.
    ///
    /// Returns true if the layer was registered.
    pub fn remove_layer_listeners(&self, layer_id: &str) -> bool {
        let removed = self.remove_layer(layer_id);
        if self.is_empty() {
            self.detach();
        }

        removed
    }

    pub(crate) fn merge_layer(&self, registration: LayerRegistration) {
        let mut state = self.state.lock();
        match state
            .layers
            .iter_mut()
            .find(|layer| layer.layer_id() == registration.layer_id())
        {
            Some(binding) => binding.merge(registration),
            None => state.layers.push(LayerBinding::new(registration)),
        }
    }

    pub(crate) fn replace_layer(&self, registration: LayerRegistration) {
        let mut state = self.state.lock();
        let binding = LayerBinding::new(registration);
        match state
            .layers
            .iter_mut()
            .find(|layer| layer.layer_id() == binding.layer_id())
        {
            Some(existing) => *existing = binding,
            None => state.layers.push(binding),
        }
    }

    pub(crate) fn remove_layer(&self, layer_id: &str) -> bool {
        let mut state = self.state.lock();
        let count = state.layers.len();
        state.layers.retain(|layer| layer.layer_id() != layer_id);
        state.layers.len() != count
    }

    /// Subscribes to every event kind the router does not listen to yet.
    ///
    /// No lock is held while the surface or the diagnostics hook is called.
    pub(crate) fn attach(self: &Arc<Self>) {
        let missing: Vec<SurfaceEventKind> = {
            let subscriptions = self.subscriptions.lock();
            SurfaceEventKind::ALL
                .into_iter()
                .filter(|kind| !subscriptions.iter().any(|(subscribed, _)| subscribed == kind))
                .collect()
        };
        if missing.is_empty() {
            return;
        }

        let router = Arc::downgrade(self);
        let listener: Arc<dyn SurfaceListener> = Arc::new(move |event: &mut SurfaceEvent| {
            if let Some(router) = router.upgrade() {
                router.handle_event(event);
            }
        });

        let mut errors = vec![];
        let mut subscribed = vec![];
        for kind in missing {
            match self.surface.subscribe(kind, listener.clone()) {
                Ok(id) => subscribed.push((kind, id)),
                Err(error) => errors.push(error),
            }
        }

        let added = subscribed.len();
        let duplicates: Vec<SubscriptionId> = {
            let mut subscriptions = self.subscriptions.lock();
            let mut duplicates = vec![];
            for (kind, id) in subscribed {
                if subscriptions.iter().any(|(existing, _)| *existing == kind) {
                    duplicates.push(id);
                } else {
                    subscriptions.push((kind, id));
                }
            }
            duplicates
        };

        for id in duplicates {
            if let Err(error) = self.surface.unsubscribe(id) {
                errors.push(error);
            }
        }

        log::debug!(
            "Event pool '{}' attached {added} listeners, {} failed",
            self.pool,
            errors.len()
        );
        for error in &errors {
            self.diagnostics.suppressed(error);
        }
    }

    /// Removes all subscriptions from the surface and forgets hover and drag state. Failures are reported to
    /// diagnostics and otherwise ignored.
    pub(crate) fn detach(&self) {
        let subscriptions = std::mem::take(&mut *self.subscriptions.lock());
        {
            let mut state = self.state.lock();
            state.hover = None;
            state.drag = None;
        }

        if subscriptions.is_empty() {
            return;
        }

        for (_, id) in subscriptions {
            if let Err(error) = self.surface.unsubscribe(id) {
                self.diagnostics.suppressed(&error);
            }
        }

        log::debug!("Event pool '{}' detached", self.pool);
    }

    /// Processes a native event of the surface.
    ///
    /// Callbacks are called after the internal state is unlocked, so they may freely register and unregister
    /// layers.
    pub fn handle_event(&self, event: &mut SurfaceEvent) {
        let dispatches = match event.kind() {
            SurfaceEventKind::Click => self.on_click(event),
            SurfaceEventKind::MouseMove => {
                let mut dispatches = self.on_pointer_move(event);
                dispatches.extend(self.on_drag(event));
                dispatches
            }
            SurfaceEventKind::MouseLeave => self.on_pointer_move(event),
            SurfaceEventKind::TouchMove => self.on_drag(event),
            SurfaceEventKind::MouseDown | SurfaceEventKind::TouchStart => {
                self.on_pointer_down(event)
            }
            SurfaceEventKind::MouseUp
            | SurfaceEventKind::TouchEnd
            | SurfaceEventKind::TouchCancel
            | SurfaceEventKind::WindowPointerUp => self.end_drag(),
        };

        for dispatch in dispatches {
            dispatch.invoke(event);
        }
    }

    fn resolve(&self, event: &SurfaceEvent, interaction: Interaction) -> Option<Target> {
        let layers = self.state.lock().layers.clone();
        if layers.is_empty() {
            return None;
        }

        let layer_ids: Vec<&str> = layers.iter().map(LayerBinding::layer_id).collect();
        let shapes = match self
            .surface
            .query_rendered_shapes(event.screen_position(), &layer_ids)
        {
            Ok(shapes) => shapes,
            Err(error) => {
                self.diagnostics.suppressed(&error);
                return None;
            }
        };

        let ordered = candidates::order_candidates(
            &layers,
            shapes,
            &event.geo_position(),
            self.config.shape_priority_property(),
        );
        candidates::first_target(ordered, interaction)
    }

    fn on_click(&self, event: &SurfaceEvent) -> Vec<Dispatch> {
        let Some(target) = self.resolve(event, Interaction::Click) else {
            return vec![];
        };

        let state = self.state.lock();
        Dispatch::element("click", &state.layers, target.element, |callbacks| {
            callbacks.click.clone()
        })
        .into_iter()
        .collect()
    }

    fn on_pointer_move(&self, event: &SurfaceEvent) -> Vec<Dispatch> {
        if self.state.lock().drag.is_some() {
            return vec![];
        }

        let hovered = self
            .resolve(event, Interaction::Hover)
            .map(|target| target.element);

        let mut state = self.state.lock();
        if state.hover == hovered {
            return vec![];
        }

        let mut dispatches = vec![];
        if let Some(previous) = state.hover.take() {
            dispatches.extend(Dispatch::element(
                "hover_leave",
                &state.layers,
                previous,
                |callbacks| callbacks.hover_leave.clone(),
            ));
        }
        if let Some(next) = &hovered {
            dispatches.extend(Dispatch::element(
                "hover_enter",
                &state.layers,
                next.clone(),
                |callbacks| callbacks.hover_enter.clone(),
            ));
        }

        state.hover = hovered;
        dispatches
    }

    fn on_pointer_down(&self, event: &mut SurfaceEvent) -> Vec<Dispatch> {
        if self.state.lock().drag.is_some() {
            return vec![];
        }

        let Some(target) = self.resolve(event, Interaction::Drag) else {
            return vec![];
        };

        // Only point shapes can be dragged.
        let Some(point) = target.shape.geometry.as_point() else {
            log::trace!(
                "Element {} of layer '{}' is not a point and cannot be dragged",
                target.element.element_id,
                target.element.layer_id
            );
            return vec![];
        };

        let Some(point_on_screen) = self.surface.project(point) else {
            return vec![];
        };
        let offset = event.screen_position() - point_on_screen;

        let dispatch = {
            let mut state = self.state.lock();
            state.drag = Some(DragSession {
                element: target.element.clone(),
                offset,
            });
            Dispatch::drag_start(&state.layers, target.element, offset)
        };

        event.prevent_default();
        dispatch.into_iter().collect()
    }

    fn on_drag(&self, event: &mut SurfaceEvent) -> Vec<Dispatch> {
        if event.is_multi_touch() {
            event.prevent_default();
            return self.abort_drag();
        }

        let Some(session) = self.state.lock().drag.clone() else {
            return vec![];
        };

        let Some(position) = self
            .surface
            .unproject(&(event.screen_position() - session.offset))
        else {
            return vec![];
        };

        let state = self.state.lock();
        Dispatch::drag(&state.layers, session.element, position, session.offset)
            .into_iter()
            .collect()
    }

    fn abort_drag(&self) -> Vec<Dispatch> {
        match self.config.multi_touch_policy() {
            MultiTouchPolicy::Ignore => vec![],
            MultiTouchPolicy::AbortSilently => {
                if let Some(session) = self.state.lock().drag.take() {
                    log::debug!(
                        "Drag of element {} in pool '{}' aborted by multi-touch",
                        session.element.element_id,
                        self.pool
                    );
                }
                vec![]
            }
            MultiTouchPolicy::AbortWithDragEnd => self.end_drag(),
        }
    }

    fn end_drag(&self) -> Vec<Dispatch> {
        let mut state = self.state.lock();
        let Some(session) = state.drag.take() else {
            return vec![];
        };

        let mut dispatches: Vec<Dispatch> =
            Dispatch::element("drag_end", &state.layers, session.element, |callbacks| {
                callbacks.drag_end.clone()
            })
            .into_iter()
            .collect();

        if let Some(hovered) = state.hover.take() {
            dispatches.extend(Dispatch::element(
                "hover_leave",
                &state.layers,
                hovered,
                |callbacks| callbacks.hover_leave.clone(),
            ));
        }

        dispatches
    }
}

impl Drop for EventRouter {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRouter")
            .field("pool", &self.pool)
            .field("config", &self.config)
            .field("attached", &self.is_attached())
            .field("layers", &self.layer_ids())
            .finish()
    }
}
