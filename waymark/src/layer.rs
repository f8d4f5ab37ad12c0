//! Layer registrations: what a layer tells its pool about itself.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use maybe_sync::{MaybeSend, MaybeSync};
use waymark_types::geo::GeoPoint2d;
use waymark_types::screen::Vector2d;
use waymark_types::ElementId;

use crate::element::ElementRegistry;
use crate::surface::SurfaceEvent;

/// Callback for click, hover enter, hover leave and drag end.
pub trait ElementHandler: Fn(&ElementId, &SurfaceEvent) + MaybeSend + MaybeSync {}

impl<T> ElementHandler for T where T: Fn(&ElementId, &SurfaceEvent) + MaybeSend + MaybeSync {}

/// Callback for drag start. The second argument is the offset between the pointer and the dragged point in screen
/// pixels.
pub trait DragStartHandler: Fn(&ElementId, Vector2d, &SurfaceEvent) + MaybeSend + MaybeSync {}

impl<T> DragStartHandler for T where T: Fn(&ElementId, Vector2d, &SurfaceEvent) + MaybeSend + MaybeSync {}

/// Callback for drag. Receives the new position of the dragged point (pointer position corrected by the offset
/// captured at drag start) and the offset itself.
pub trait DragHandler:
    Fn(&ElementId, GeoPoint2d, Vector2d, &SurfaceEvent) + MaybeSend + MaybeSync
{
}

impl<T> DragHandler for T where
    T: Fn(&ElementId, GeoPoint2d, Vector2d, &SurfaceEvent) + MaybeSend + MaybeSync
{
}

/// Callbacks of a layer. Every callback is optional.
#[derive(Clone, Default)]
pub struct LayerCallbacks {
    /// Element was clicked.
    pub click: Option<Arc<dyn ElementHandler>>,
    /// Pointer entered an element.
    pub hover_enter: Option<Arc<dyn ElementHandler>>,
    /// Pointer left an element.
    pub hover_leave: Option<Arc<dyn ElementHandler>>,
    /// Element drag started.
    pub drag_start: Option<Arc<dyn DragStartHandler>>,
    /// Element is being dragged.
    pub drag: Option<Arc<dyn DragHandler>>,
    /// Element drag ended.
    pub drag_end: Option<Arc<dyn ElementHandler>>,
}

impl LayerCallbacks {
    /// Creates an empty callback set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the click callback.
    pub fn on_click(mut self, handler: impl ElementHandler + 'static) -> Self {
        self.click = Some(Arc::new(handler));
        self
    }

    /// Sets the hover enter callback.
    pub fn on_hover_enter(mut self, handler: impl ElementHandler + 'static) -> Self {
        self.hover_enter = Some(Arc::new(handler));
        self
    }

    /// Sets the hover leave callback.
    pub fn on_hover_leave(mut self, handler: impl ElementHandler + 'static) -> Self {
        self.hover_leave = Some(Arc::new(handler));
        self
    }

    /// Sets the drag start callback.
    pub fn on_drag_start(mut self, handler: impl DragStartHandler + 'static) -> Self {
        self.drag_start = Some(Arc::new(handler));
        self
    }

    /// Sets the drag callback.
    pub fn on_drag(mut self, handler: impl DragHandler + 'static) -> Self {
        self.drag = Some(Arc::new(handler));
        self
    }

    /// Sets the drag end callback.
    pub fn on_drag_end(mut self, handler: impl ElementHandler + 'static) -> Self {
        self.drag_end = Some(Arc::new(handler));
        self
    }

    /// Overwrites the callbacks that are set in `other`, keeping the rest.
    pub fn merge(&mut self, other: LayerCallbacks) {
        let LayerCallbacks {
            click,
            hover_enter,
            hover_leave,
            drag_start,
            drag,
            drag_end,
        } = other;

        if click.is_some() {
            self.click = click;
        }
        if hover_enter.is_some() {
            self.hover_enter = hover_enter;
        }
        if hover_leave.is_some() {
            self.hover_leave = hover_leave;
        }
        if drag_start.is_some() {
            self.drag_start = drag_start;
        }
        if drag.is_some() {
            self.drag = drag;
        }
        if drag_end.is_some() {
            self.drag_end = drag_end;
        }
    }
}

impl Debug for LayerCallbacks {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerCallbacks")
            .field("click", &self.click.is_some())
            .field("hover_enter", &self.hover_enter.is_some())
            .field("hover_leave", &self.hover_leave.is_some())
            .field("drag_start", &self.drag_start.is_some())
            .field("drag", &self.drag.is_some())
            .field("drag_end", &self.drag_end.is_some())
            .finish()
    }
}

/// Registration of a layer in a pool.
///
/// Fields that are not set are left untouched when the registration is merged into an existing binding (see
/// [`RoutingContext::register_layer`](crate::RoutingContext::register_layer)).
#[derive(Debug, Clone)]
pub struct LayerRegistration {
    layer_id: String,
    priority: Option<f64>,
    callbacks: LayerCallbacks,
    elements: Option<ElementRegistry>,
}

impl LayerRegistration {
    /// Creates an empty registration for the layer.
    pub fn new(layer_id: impl Into<String>) -> Self {
        Self {
            layer_id: layer_id.into(),
            priority: None,
            callbacks: LayerCallbacks::default(),
            elements: None,
        }
    }

    /// Id of the layer.
    pub fn layer_id(&self) -> &str {
        &self.layer_id
    }

    /// Priority of the layer in the pool. Layers with lower values get events first.
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets all callbacks at once.
    pub fn with_callbacks(mut self, callbacks: LayerCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Sets the registry the router reads element flags from.
    pub fn with_elements(mut self, elements: ElementRegistry) -> Self {
        self.elements = Some(elements);
        self
    }

    /// Sets the click callback.
    pub fn on_click(mut self, handler: impl ElementHandler + 'static) -> Self {
        self.callbacks = self.callbacks.on_click(handler);
        self
    }

    /// Sets the hover enter callback.
    pub fn on_hover_enter(mut self, handler: impl ElementHandler + 'static) -> Self {
        self.callbacks = self.callbacks.on_hover_enter(handler);
        self
    }

    /// Sets the hover leave callback.
    pub fn on_hover_leave(mut self, handler: impl ElementHandler + 'static) -> Self {
        self.callbacks = self.callbacks.on_hover_leave(handler);
        self
    }

    /// Sets the drag start callback.
    pub fn on_drag_start(mut self, handler: impl DragStartHandler + 'static) -> Self {
        self.callbacks = self.callbacks.on_drag_start(handler);
        self
    }

    /// Sets the drag callback.
    pub fn on_drag(mut self, handler: impl DragHandler + 'static) -> Self {
        self.callbacks = self.callbacks.on_drag(handler);
        self
    }

    /// Sets the drag end callback.
    pub fn on_drag_end(mut self, handler: impl ElementHandler + 'static) -> Self {
        self.callbacks = self.callbacks.on_drag_end(handler);
        self
    }
}

/// Current state of a layer inside a pool.
#[derive(Debug, Clone)]
pub struct LayerBinding {
    layer_id: String,
    priority: f64,
    callbacks: LayerCallbacks,
    elements: Option<ElementRegistry>,
}

impl LayerBinding {
    pub(crate) fn new(registration: LayerRegistration) -> Self {
        Self {
            layer_id: registration.layer_id,
            priority: registration.priority.unwrap_or(f64::INFINITY),
            callbacks: registration.callbacks,
            elements: registration.elements,
        }
    }

    pub(crate) fn merge(&mut self, registration: LayerRegistration) {
        if let Some(priority) = registration.priority {
            self.priority = priority;
        }
        self.callbacks.merge(registration.callbacks);
        if registration.elements.is_some() {
            self.elements = registration.elements;
        }
    }

    /// Id of the layer.
    pub fn layer_id(&self) -> &str {
        &self.layer_id
    }

    /// Priority of the layer. `f64::INFINITY` if the layer never specified one.
    pub fn priority(&self) -> f64 {
        self.priority
    }

    /// Callbacks of the layer.
    pub fn callbacks(&self) -> &LayerCallbacks {
        &self.callbacks
    }

    /// Element registry of the layer, if provided.
    pub fn elements(&self) -> Option<&ElementRegistry> {
        self.elements.as_ref()
    }
}
