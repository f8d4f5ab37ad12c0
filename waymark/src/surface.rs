//! Contract of the map surface: the external rendering engine instance that delivers pointer events, hit-tests
//! rendered shapes and converts between geographic and screen coordinates.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use maybe_sync::{MaybeSend, MaybeSync};
use waymark_types::geo::GeoPoint2d;
use waymark_types::geometry::ShapeGeometry;
use waymark_types::screen::Point2d;
use waymark_types::{ElementId, Properties, PropertyValue};

use crate::error::InteractionError;

/// Name of the shape property that holds the element id.
pub const ID_PROPERTY: &str = "id";

/// Identifier of an event subscription, issued by [`MapSurface::subscribe`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Kinds of native events the routing core listens to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurfaceEventKind {
    /// Click on the surface.
    Click,
    /// Mouse pointer moved over the surface.
    MouseMove,
    /// Mouse pointer left the surface.
    MouseLeave,
    /// Mouse button was pressed over the surface.
    MouseDown,
    /// Mouse button was released over the surface.
    MouseUp,
    /// New touch started.
    TouchStart,
    /// Existing touch moved.
    TouchMove,
    /// Existing touch was released.
    TouchEnd,
    /// Existing touch was cancelled by the platform.
    TouchCancel,
    /// Pointer was released anywhere in the host window, including outside the surface.
    WindowPointerUp,
}

impl SurfaceEventKind {
    /// All event kinds, in the order routers subscribe to them.
    pub const ALL: [SurfaceEventKind; 10] = [
        SurfaceEventKind::Click,
        SurfaceEventKind::MouseMove,
        SurfaceEventKind::MouseLeave,
        SurfaceEventKind::MouseDown,
        SurfaceEventKind::MouseUp,
        SurfaceEventKind::TouchStart,
        SurfaceEventKind::TouchMove,
        SurfaceEventKind::TouchEnd,
        SurfaceEventKind::TouchCancel,
        SurfaceEventKind::WindowPointerUp,
    ];

    /// Native name of the event, as used by web map engines.
    pub fn name(&self) -> &'static str {
        match self {
            SurfaceEventKind::Click => "click",
            SurfaceEventKind::MouseMove => "mousemove",
            SurfaceEventKind::MouseLeave => "mouseleave",
            SurfaceEventKind::MouseDown => "mousedown",
            SurfaceEventKind::MouseUp => "mouseup",
            SurfaceEventKind::TouchStart => "touchstart",
            SurfaceEventKind::TouchMove => "touchmove",
            SurfaceEventKind::TouchEnd => "touchend",
            SurfaceEventKind::TouchCancel => "touchcancel",
            SurfaceEventKind::WindowPointerUp => "pointerup",
        }
    }

    /// Returns true for the touch event kinds.
    pub fn is_touch(&self) -> bool {
        matches!(
            self,
            SurfaceEventKind::TouchStart
                | SurfaceEventKind::TouchMove
                | SurfaceEventKind::TouchEnd
                | SurfaceEventKind::TouchCancel
        )
    }
}

impl Display for SurfaceEventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Native event delivered by the surface.
///
/// The same instance is handed to the application callbacks as the raw event.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceEvent {
    kind: SurfaceEventKind,
    screen_position: Point2d,
    geo_position: GeoPoint2d,
    touch_count: usize,
    default_prevented: bool,
}

impl SurfaceEvent {
    /// Creates a new event. Touch events start with one touch point, mouse events with none.
    pub fn new(kind: SurfaceEventKind, screen_position: Point2d, geo_position: GeoPoint2d) -> Self {
        Self {
            kind,
            screen_position,
            geo_position,
            touch_count: usize::from(kind.is_touch()),
            default_prevented: false,
        }
    }

    /// Sets the number of simultaneous touch points.
    pub fn with_touch_count(mut self, touch_count: usize) -> Self {
        self.touch_count = touch_count;
        self
    }

    /// Kind of the event.
    pub fn kind(&self) -> SurfaceEventKind {
        self.kind
    }

    /// Pointer position in pixels from the top-left corner of the surface.
    pub fn screen_position(&self) -> Point2d {
        self.screen_position
    }

    /// Geographic position under the pointer.
    pub fn geo_position(&self) -> GeoPoint2d {
        self.geo_position
    }

    /// Number of simultaneous touch points.
    pub fn touch_count(&self) -> usize {
        self.touch_count
    }

    /// Returns true if more than one touch point is active.
    pub fn is_multi_touch(&self) -> bool {
        self.touch_count > 1
    }

    /// Asks the surface not to run its default handling of the event (e.g. panning the map when an element is being
    /// dragged).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Returns true if [`SurfaceEvent::prevent_default`] was called.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Listener of native surface events.
pub trait SurfaceListener: Fn(&mut SurfaceEvent) + MaybeSend + MaybeSync {}

impl<T> SurfaceListener for T where T: Fn(&mut SurfaceEvent) + MaybeSend + MaybeSync {}

/// Shape returned by hit-testing of the surface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderedShape {
    /// Id of the layer that rendered the shape.
    pub layer_id: String,
    /// Geometry of the shape.
    pub geometry: ShapeGeometry,
    /// Property bag of the shape. Interactive shapes carry an `id` and the `clickable`, `hoverable` and `draggable`
    /// flags here.
    pub properties: Properties,
}

impl RenderedShape {
    /// Creates a shape without properties.
    pub fn new(layer_id: impl Into<String>, geometry: impl Into<ShapeGeometry>) -> Self {
        Self {
            layer_id: layer_id.into(),
            geometry: geometry.into(),
            properties: Properties::new(),
        }
    }

    /// Adds a property to the shape.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Sets the `id` property of the shape.
    pub fn with_id(self, id: impl Into<ElementId>) -> Self {
        let value = match id.into() {
            ElementId::Int(v) => PropertyValue::Int64(v),
            ElementId::String(v) => PropertyValue::String(v),
        };
        self.with_property(ID_PROPERTY, value)
    }

    /// Value of the property with the given name.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Element id of the shape. Returns `None` if the shape has no usable `id` property.
    pub fn id(&self) -> Option<ElementId> {
        self.property(ID_PROPERTY)
            .and_then(|value| ElementId::try_from(value).ok())
    }
}

/// Map surface: the live map instance of the rendering engine.
///
/// All methods are called synchronously from the routing core, usually from inside a listener the surface is
/// currently invoking. Implementations must not hold internal locks while calling listeners.
///
/// A surface that has been destroyed returns [`InteractionError::SurfaceGone`] from `subscribe`, `unsubscribe` and
/// `query_rendered_shapes`.
pub trait MapSurface: MaybeSend + MaybeSync {
    /// Adds a listener for the given event kind.
    fn subscribe(
        &self,
        kind: SurfaceEventKind,
        listener: Arc<dyn SurfaceListener>,
    ) -> Result<SubscriptionId, InteractionError>;

    /// Removes a listener added by [`MapSurface::subscribe`].
    fn unsubscribe(&self, subscription: SubscriptionId) -> Result<(), InteractionError>;

    /// Returns all shapes rendered at the given screen point by any of the given layers.
    fn query_rendered_shapes(
        &self,
        point: Point2d,
        layer_ids: &[&str],
    ) -> Result<Vec<RenderedShape>, InteractionError>;

    /// Converts a geographic point into a screen point. Returns `None` if the point cannot be displayed.
    fn project(&self, point: &GeoPoint2d) -> Option<Point2d>;

    /// Converts a screen point into a geographic point. Returns `None` if the screen point does not correspond to a
    /// point on the map (e.g. it is above the horizon).
    fn unproject(&self, point: &Point2d) -> Option<GeoPoint2d>;
}

pub(crate) fn same_surface(a: &Arc<dyn MapSurface>, b: &Arc<dyn MapSurface>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_types::latlon;

    #[test]
    fn touch_events_start_with_one_touch() {
        let event = SurfaceEvent::new(
            SurfaceEventKind::TouchStart,
            Point2d::new(0.0, 0.0),
            latlon!(0.0, 0.0),
        );
        assert_eq!(event.touch_count(), 1);
        assert!(!event.is_multi_touch());

        let event = SurfaceEvent::new(
            SurfaceEventKind::MouseDown,
            Point2d::new(0.0, 0.0),
            latlon!(0.0, 0.0),
        )
        .with_touch_count(0);
        assert_eq!(event.touch_count(), 0);
    }

    #[test]
    fn prevent_default() {
        let mut event = SurfaceEvent::new(
            SurfaceEventKind::MouseDown,
            Point2d::new(0.0, 0.0),
            latlon!(0.0, 0.0),
        );
        assert!(!event.is_default_prevented());
        event.prevent_default();
        assert!(event.is_default_prevented());
    }

    #[test]
    fn shape_id() {
        let shape = RenderedShape::new("points", latlon!(1.0, 1.0)).with_id("a");
        assert_eq!(shape.id(), Some(ElementId::from("a")));

        let shape = RenderedShape::new("points", latlon!(1.0, 1.0)).with_id(4);
        assert_eq!(shape.id(), Some(ElementId::Int(4)));

        let shape =
            RenderedShape::new("points", latlon!(1.0, 1.0)).with_property("id", PropertyValue::Null);
        assert_eq!(shape.id(), None);

        let shape = RenderedShape::new("points", latlon!(1.0, 1.0));
        assert_eq!(shape.id(), None);
    }

    #[test]
    fn event_names() {
        assert_eq!(SurfaceEventKind::WindowPointerUp.to_string(), "pointerup");
        assert!(SurfaceEventKind::TouchCancel.is_touch());
        assert!(!SurfaceEventKind::Click.is_touch());
    }
}
