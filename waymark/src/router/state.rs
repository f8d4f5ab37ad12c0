use std::sync::Arc;

use waymark_types::geo::GeoPoint2d;
use waymark_types::screen::Vector2d;
use waymark_types::ElementId;

use crate::layer::{DragHandler, DragStartHandler, ElementHandler, LayerBinding, LayerCallbacks};
use crate::surface::SurfaceEvent;

/// Element of a specific layer.
///
/// Elements of different layers may share ids, so both parts are needed to identify an element inside a pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementRef {
    /// Id of the layer that owns the element.
    pub layer_id: String,
    /// Id of the element within its layer.
    pub element_id: ElementId,
}

/// Active drag session of a pool.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Dragged element.
    pub element: ElementRef,
    /// Offset between the pointer and the dragged point in screen pixels, captured at drag start.
    pub offset: Vector2d,
}

#[derive(Debug, Default)]
pub(super) struct RouterState {
    pub(super) layers: Vec<LayerBinding>,
    pub(super) hover: Option<ElementRef>,
    pub(super) drag: Option<DragSession>,
}

enum Callback {
    Element(Arc<dyn ElementHandler>),
    DragStart(Arc<dyn DragStartHandler>, Vector2d),
    Drag(Arc<dyn DragHandler>, GeoPoint2d, Vector2d),
}

/// Callback resolved while the router state was locked, to be called after the lock is released.
pub(super) struct Dispatch {
    name: &'static str,
    element: ElementRef,
    callback: Callback,
}

fn callbacks_of<'a>(layers: &'a [LayerBinding], layer_id: &str) -> Option<&'a LayerCallbacks> {
    layers
        .iter()
        .find(|layer| layer.layer_id() == layer_id)
        .map(LayerBinding::callbacks)
}

impl Dispatch {
    /// Returns `None` if the owning layer is gone or has no such callback.
    pub(super) fn element(
        name: &'static str,
        layers: &[LayerBinding],
        element: ElementRef,
        pick: impl FnOnce(&LayerCallbacks) -> Option<Arc<dyn ElementHandler>>,
    ) -> Option<Self> {
        let handler = pick(callbacks_of(layers, &element.layer_id)?)?;
        Some(Self {
            name,
            element,
            callback: Callback::Element(handler),
        })
    }

    pub(super) fn drag_start(
        layers: &[LayerBinding],
        element: ElementRef,
        offset: Vector2d,
    ) -> Option<Self> {
        let handler = callbacks_of(layers, &element.layer_id)?.drag_start.clone()?;
        Some(Self {
            name: "drag_start",
            element,
            callback: Callback::DragStart(handler, offset),
        })
    }

    pub(super) fn drag(
        layers: &[LayerBinding],
        element: ElementRef,
        position: GeoPoint2d,
        offset: Vector2d,
    ) -> Option<Self> {
        let handler = callbacks_of(layers, &element.layer_id)?.drag.clone()?;
        Some(Self {
            name: "drag",
            element,
            callback: Callback::Drag(handler, position, offset),
        })
    }

    pub(super) fn invoke(self, event: &SurfaceEvent) {
        log::trace!(
            "Dispatching {} to element {} of layer '{}'",
            self.name,
            self.element.element_id,
            self.element.layer_id
        );

        let id = &self.element.element_id;
        match self.callback {
            Callback::Element(handler) => handler(id, event),
            Callback::DragStart(handler, offset) => handler(id, offset, event),
            Callback::Drag(handler, position, offset) => handler(id, position, offset, event),
        }
    }
}
