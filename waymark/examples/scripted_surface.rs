//! Runs a scripted pointer session against an in-memory map surface and prints the callbacks the pools fire.
//!
//! The scene (configuration, layers and their elements) is loaded from JSON.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Deserialize;
use waymark::waymark_types::geo::{GeoPoint, GeoPoint2d, NewGeoPoint};
use waymark::waymark_types::screen::{Point2d, Vector2d};
use waymark::waymark_types::ElementId;
use waymark::{
    ElementRegistry, InteractionConfig, InteractionError, InteractionProps, InteractiveElement,
    LayerCallbacks, LayerInteractions, MapSurface, RenderedShape, RoutingContext, SubscriptionId,
    SurfaceEvent, SurfaceEventKind, SurfaceListener,
};

const PIXELS_PER_DEGREE: f64 = 1000.0;
const HIT_RADIUS: f64 = 10.0;

const SCENE: &str = r#"{
    "config": { "default_pool": "markers", "multi_touch_policy": "AbortWithDragEnd" },
    "layers": [
        {
            "id": "stops",
            "priority": 1.0,
            "elements": [
                { "id": 1, "geometry": { "Point": { "lat": 0.0, "lon": 0.0 } },
                  "flags": { "clickable": true, "hoverable": true, "draggable": true } },
                { "id": 2, "geometry": { "Point": { "lat": 0.0, "lon": 0.005 } },
                  "flags": { "clickable": true } }
            ]
        },
        {
            "id": "pins",
            "priority": 2.0,
            "elements": [
                { "id": 1, "geometry": { "Point": { "lat": 0.0, "lon": 0.0 } },
                  "flags": { "clickable": true, "hoverable": true } }
            ]
        }
    ]
}"#;

#[derive(Debug, Deserialize)]
struct Scene {
    #[serde(default)]
    config: InteractionConfig,
    layers: Vec<SceneLayer>,
}

#[derive(Debug, Deserialize)]
struct SceneLayer {
    id: String,
    priority: Option<f64>,
    elements: Vec<InteractiveElement>,
}

#[derive(Default)]
struct MemorySurface {
    listeners: Mutex<Vec<(SubscriptionId, SurfaceEventKind, Arc<dyn SurfaceListener>)>>,
    shapes: Mutex<Vec<RenderedShape>>,
    next_id: AtomicU64,
}

impl MemorySurface {
    fn to_screen(point: &GeoPoint2d) -> Point2d {
        Point2d::new(point.lon() * PIXELS_PER_DEGREE, -point.lat() * PIXELS_PER_DEGREE)
    }

    fn to_geo(point: &Point2d) -> GeoPoint2d {
        GeoPoint2d::latlon(-point.y / PIXELS_PER_DEGREE, point.x / PIXELS_PER_DEGREE)
    }

    fn fire(&self, kind: SurfaceEventKind, x: f64, y: f64) {
        let position = Point2d::new(x, y);
        let mut event = SurfaceEvent::new(kind, position, Self::to_geo(&position));
        let listeners: Vec<_> = self
            .listeners
            .lock()
            .iter()
            .filter(|(_, listener_kind, _)| *listener_kind == kind)
            .map(|(_, _, listener)| listener.clone())
            .collect();

        log::info!("> {kind} at ({x}, {y})");
        for listener in listeners {
            listener(&mut event);
        }
    }
}

impl MapSurface for MemorySurface {
    fn subscribe(
        &self,
        kind: SurfaceEventKind,
        listener: Arc<dyn SurfaceListener>,
    ) -> Result<SubscriptionId, InteractionError> {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, kind, listener));
        Ok(id)
    }

    fn unsubscribe(&self, subscription: SubscriptionId) -> Result<(), InteractionError> {
        self.listeners
            .lock()
            .retain(|(id, _, _)| *id != subscription);
        Ok(())
    }

    fn query_rendered_shapes(
        &self,
        point: Point2d,
        layer_ids: &[&str],
    ) -> Result<Vec<RenderedShape>, InteractionError> {
        Ok(self
            .shapes
            .lock()
            .iter()
            .filter(|shape| layer_ids.contains(&shape.layer_id.as_str()))
            .filter(|shape| {
                shape.geometry.as_point().map_or(true, |shape_point| {
                    (Self::to_screen(shape_point) - point).norm() <= HIT_RADIUS
                })
            })
            .cloned()
            .collect())
    }

    fn project(&self, point: &GeoPoint2d) -> Option<Point2d> {
        Some(Self::to_screen(point))
    }

    fn unproject(&self, point: &Point2d) -> Option<GeoPoint2d> {
        Some(Self::to_geo(point))
    }
}

fn printing_callbacks(layer: &str) -> LayerCallbacks {
    let print = |event: &'static str| {
        let layer = layer.to_owned();
        move |id: &ElementId, _: &SurfaceEvent| log::info!("  {event}: {layer}/{id}")
    };

    let drag_start = {
        let layer = layer.to_owned();
        move |id: &ElementId, offset: Vector2d, _: &SurfaceEvent| {
            log::info!(
                "  drag start: {layer}/{id}, offset ({}, {})",
                offset.x,
                offset.y
            )
        }
    };

    let drag = {
        let layer = layer.to_owned();
        move |id: &ElementId, position: GeoPoint2d, _: Vector2d, _: &SurfaceEvent| {
            log::info!(
                "  drag: {layer}/{id} -> ({:.4}, {:.4})",
                position.lat(),
                position.lon()
            )
        }
    };

    LayerCallbacks::new()
        .on_click(print("click"))
        .on_hover_enter(print("hover enter"))
        .on_hover_leave(print("hover leave"))
        .on_drag_start(drag_start)
        .on_drag(drag)
        .on_drag_end(print("drag end"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let scene: Scene = serde_json::from_str(SCENE)?;
    let surface = Arc::new(MemorySurface::default());
    let context = Arc::new(RoutingContext::new(surface.clone()).with_config(scene.config));

    let mut bindings = vec![];
    for layer in &scene.layers {
        let elements = ElementRegistry::new();
        elements.sync(&layer.elements);
        surface
            .shapes
            .lock()
            .extend(layer.elements.iter().map(|element| element.to_shape(&layer.id)));

        let mut props = InteractionProps::new()
            .with_callbacks(printing_callbacks(&layer.id))
            .with_elements(elements);
        if let Some(priority) = layer.priority {
            props = props.with_priority(priority);
        }

        let mut binding = LayerInteractions::new();
        binding.sync(Some(&context), Some(layer.id.as_str()), &props);
        bindings.push(binding);
    }

    surface.fire(SurfaceEventKind::MouseMove, 1.0, 0.0);
    surface.fire(SurfaceEventKind::Click, 1.0, 0.0);
    surface.fire(SurfaceEventKind::Click, 6.0, 0.0);
    surface.fire(SurfaceEventKind::MouseDown, 2.0, 0.0);
    surface.fire(SurfaceEventKind::MouseMove, 12.0, 4.0);
    surface.fire(SurfaceEventKind::MouseMove, 22.0, 8.0);
    surface.fire(SurfaceEventKind::WindowPointerUp, 22.0, 8.0);

    drop(bindings);
    log::info!(
        "Pools left: {}, listeners left: {}",
        context.pool_count(),
        surface.listeners.lock().len()
    );

    Ok(())
}
