//! Ordering of the shapes under the pointer.

use waymark_types::geo::GeoPoint2d;
use waymark_types::geometry::ShapeGeometry;
use waymark_types::PropertyValue;

use crate::element::{Interaction, InteractionFlags};
use crate::layer::LayerBinding;
use crate::router::state::ElementRef;
use crate::surface::RenderedShape;

/// Shape under the pointer owned by one of the pool layers.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    layer_id: String,
    flags: InteractionFlags,
    shape: RenderedShape,
}

/// Candidate that passed the filter: it has an id and responds to the requested interaction.
#[derive(Debug, Clone)]
pub(crate) struct Target {
    pub(crate) element: ElementRef,
    pub(crate) shape: RenderedShape,
}

impl Candidate {
    fn new(layer: &LayerBinding, shape: RenderedShape) -> Self {
        let registered = shape
            .id()
            .and_then(|id| layer.elements().and_then(|elements| elements.get(&id)));
        let flags =
            registered.unwrap_or_else(|| InteractionFlags::from_properties(&shape.properties));

        Self {
            layer_id: layer.layer_id().to_owned(),
            flags,
            shape,
        }
    }

    fn into_target(self, interaction: Interaction) -> Option<Target> {
        if !self.flags.allows(interaction) {
            return None;
        }

        let element_id = self.shape.id()?;
        Some(Target {
            element: ElementRef {
                layer_id: self.layer_id,
                element_id,
            },
            shape: self.shape,
        })
    }
}

/// Closeness of the shape to the pointer. Lower is closer.
///
/// For points this is the great-circle distance in meters. Other geometries use the numeric value of the
/// `priority_property` of the shape, or `0` if there is none.
pub(crate) fn distance_to_shape(
    point: &GeoPoint2d,
    shape: &RenderedShape,
    priority_property: &str,
) -> f64 {
    match &shape.geometry {
        ShapeGeometry::Point(shape_point) => point.distance_to(shape_point),
        _ => shape
            .property(priority_property)
            .and_then(PropertyValue::as_f64)
            .unwrap_or(0.0),
    }
}

/// Orders shapes by the priority of their layers, then by distance within a layer.
///
/// Layers with equal priority keep their registration order, shapes with equal distance keep the order the surface
/// returned them in. Shapes of layers that are not in `layers` are dropped.
pub(crate) fn order_candidates(
    layers: &[LayerBinding],
    shapes: Vec<RenderedShape>,
    point: &GeoPoint2d,
    priority_property: &str,
) -> Vec<Candidate> {
    let mut by_priority: Vec<&LayerBinding> = layers.iter().collect();
    by_priority.sort_by(|a, b| a.priority().total_cmp(&b.priority()));

    let mut groups: Vec<Vec<(f64, RenderedShape)>> = by_priority.iter().map(|_| Vec::new()).collect();
    for shape in shapes {
        let Some(index) = by_priority
            .iter()
            .position(|layer| layer.layer_id() == shape.layer_id)
        else {
            log::trace!("Skipping shape of unknown layer '{}'", shape.layer_id);
            continue;
        };

        let distance = distance_to_shape(point, &shape, priority_property);
        groups[index].push((distance, shape));
    }

    let mut candidates = vec![];
    for (layer, mut group) in by_priority.into_iter().zip(groups) {
        group.sort_by(|a, b| a.0.total_cmp(&b.0));
        candidates.extend(
            group
                .into_iter()
                .map(|(_, shape)| Candidate::new(layer, shape)),
        );
    }

    candidates
}

/// First candidate that has an id and responds to the interaction.
pub(crate) fn first_target(
    candidates: Vec<Candidate>,
    interaction: Interaction,
) -> Option<Target> {
    candidates
        .into_iter()
        .find_map(|candidate| candidate.into_target(interaction))
}
