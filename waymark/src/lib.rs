//! Waymark decides which interactive element of which map layer receives a pointer event.
//!
//! A map usually shows several layers that respond to the pointer: markers that can be clicked and dragged, routes
//! that highlight on hover, areas that open a popup on click. When their elements overlap, a naive setup where every
//! layer listens to the map events on its own fires callbacks of all of them for a single click. Waymark puts
//! cooperating layers into named *pools*. Each pool has one [`EventRouter`] that listens to the native events of the
//! [`MapSurface`] and fires the callback of exactly one element:
//!
//! * layers are ordered by their priority (lower values first, layers without priority last),
//! * within a layer, point shapes closer to the pointer come first,
//! * the first shape that has an id and responds to the interaction wins.
//!
//! Hover is tracked per pool, so moving the pointer between two elements fires `hover_leave` for one and
//! `hover_enter` for the other. Dragging a point element fires `drag_start`, then `drag` with the new position of
//! the point for every pointer move, and `drag_end` when the pointer is released anywhere in the window.
//!
//! # Main components
//!
//! * [`MapSurface`] is the contract the rendering engine implements: event subscriptions, hit-testing and
//!   projection.
//! * [`RoutingContext`] holds the pools of one surface. Layers register in it with a [`LayerRegistration`].
//! * [`LayerInteractions`] keeps the registration of a layer in sync with its current [`InteractionProps`].
//! * [`ElementRegistry`] holds the interaction flags of layer elements.
//! * [`MapEventSubscription`] is a plain listener of one event kind for the cases pools are not needed.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

mod binding;
mod config;
mod context;
mod diagnostics;
mod element;
pub mod error;
mod layer;
pub mod router;
mod subscription;
mod surface;

#[cfg(test)]
mod tests;

pub use binding::{InteractionProps, LayerInteractions};
pub use config::{
    InteractionConfig, MultiTouchPolicy, DEFAULT_POOL, DEFAULT_SHAPE_PRIORITY_PROPERTY,
};
pub use context::RoutingContext;
pub use diagnostics::{Diagnostics, LogDiagnostics};
pub use element::{ElementRegistry, Interaction, InteractionFlags, InteractiveElement};
pub use error::InteractionError;
pub use layer::{
    DragHandler, DragStartHandler, ElementHandler, LayerBinding, LayerCallbacks,
    LayerRegistration,
};
pub use router::{DragSession, ElementRef, EventRouter};
pub use subscription::MapEventSubscription;
pub use surface::{
    MapSurface, RenderedShape, SubscriptionId, SurfaceEvent, SurfaceEventKind, SurfaceListener,
    ID_PROPERTY,
};

// Reexport waymark_types
pub use waymark_types;
