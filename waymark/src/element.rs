//! Interactive elements and the per-layer registry of their interaction flags.

use std::sync::Arc;

use ahash::{HashMap, HashMapExt};
use parking_lot::RwLock;
use waymark_types::geometry::ShapeGeometry;
use waymark_types::{ElementId, Properties, PropertyValue};

use crate::surface::{RenderedShape, ID_PROPERTY};

/// Kind of interaction an element can take part in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Interaction {
    /// Click.
    Click,
    /// Hover enter and leave.
    Hover,
    /// Drag start, drag and drag end.
    Drag,
}

impl Interaction {
    /// Name of the shape property that carries the flag for this interaction.
    pub fn property_name(&self) -> &'static str {
        match self {
            Interaction::Click => "clickable",
            Interaction::Hover => "hoverable",
            Interaction::Drag => "draggable",
        }
    }
}

/// Set of interactions an element responds to.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InteractionFlags {
    /// Element responds to clicks.
    pub clickable: bool,
    /// Element responds to hover.
    pub hoverable: bool,
    /// Element can be dragged.
    pub draggable: bool,
}

impl InteractionFlags {
    /// Element is not interactive.
    pub const NONE: Self = Self {
        clickable: false,
        hoverable: false,
        draggable: false,
    };

    /// Element responds to all interactions.
    pub const ALL: Self = Self {
        clickable: true,
        hoverable: true,
        draggable: true,
    };

    /// Sets the `clickable` flag.
    pub fn with_clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }

    /// Sets the `hoverable` flag.
    pub fn with_hoverable(mut self, hoverable: bool) -> Self {
        self.hoverable = hoverable;
        self
    }

    /// Sets the `draggable` flag.
    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    /// Returns true if the element responds to the given interaction.
    pub fn allows(&self, interaction: Interaction) -> bool {
        match interaction {
            Interaction::Click => self.clickable,
            Interaction::Hover => self.hoverable,
            Interaction::Drag => self.draggable,
        }
    }

    /// Reads the flags from a shape property bag. A missing flag property means the flag is not set.
    pub fn from_properties(properties: &Properties) -> Self {
        let flag = |interaction: Interaction| {
            properties
                .get(interaction.property_name())
                .is_some_and(PropertyValue::is_truthy)
        };

        Self {
            clickable: flag(Interaction::Click),
            hoverable: flag(Interaction::Hover),
            draggable: flag(Interaction::Drag),
        }
    }

    /// Writes the flags into a shape property bag.
    pub fn write_properties(&self, properties: &mut Properties) {
        for (interaction, value) in [
            (Interaction::Click, self.clickable),
            (Interaction::Hover, self.hoverable),
            (Interaction::Drag, self.draggable),
        ] {
            properties.insert(
                interaction.property_name().to_owned(),
                PropertyValue::Bool(value),
            );
        }
    }
}

/// Interactive element declared by a layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractiveElement {
    /// Id of the element, unique within its layer.
    pub id: ElementId,
    /// Geometry of the element.
    pub geometry: ShapeGeometry,
    /// Interactions the element responds to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: InteractionFlags,
    /// Any additional data the rendering engine styles can use.
    #[cfg_attr(feature = "serde", serde(default))]
    pub properties: Properties,
}

impl InteractiveElement {
    /// Creates a non-interactive element without properties.
    pub fn new(id: impl Into<ElementId>, geometry: impl Into<ShapeGeometry>) -> Self {
        Self {
            id: id.into(),
            geometry: geometry.into(),
            flags: InteractionFlags::NONE,
            properties: Properties::new(),
        }
    }

    /// Sets interaction flags of the element.
    pub fn with_flags(mut self, flags: InteractionFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Adds a property to the element.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Converts the element into the shape a layer hands over to the rendering engine: element properties plus the
    /// `id` and interaction flags.
    pub fn to_shape(&self, layer_id: &str) -> RenderedShape {
        let mut properties = self.properties.clone();
        self.flags.write_properties(&mut properties);
        let id = match &self.id {
            ElementId::Int(v) => PropertyValue::Int64(*v),
            ElementId::String(v) => PropertyValue::String(v.clone()),
        };
        properties.insert(ID_PROPERTY.to_owned(), id);

        RenderedShape {
            layer_id: layer_id.to_owned(),
            geometry: self.geometry.clone(),
            properties,
        }
    }
}

/// Interaction flags of the elements of one layer.
///
/// The registry is a shared handle: the layer keeps one clone to update the flags and hands another one to its pool
/// with the layer registration. The router reads the flags during event evaluation and never changes them.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    elements: Arc<RwLock<HashMap<ElementId, InteractionFlags>>>,
}

impl ElementRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            elements: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Sets flags of an element, returning the previous ones.
    pub fn upsert(
        &self,
        id: impl Into<ElementId>,
        flags: InteractionFlags,
    ) -> Option<InteractionFlags> {
        self.elements.write().insert(id.into(), flags)
    }

    /// Removes an element from the registry, returning its flags.
    pub fn remove(&self, id: &ElementId) -> Option<InteractionFlags> {
        self.elements.write().remove(id)
    }

    /// Flags of the element. Returns `None` if the element is not registered.
    pub fn get(&self, id: &ElementId) -> Option<InteractionFlags> {
        self.elements.read().get(id).copied()
    }

    /// Number of registered elements.
    pub fn len(&self) -> usize {
        self.elements.read().len()
    }

    /// Returns true if no elements are registered.
    pub fn is_empty(&self) -> bool {
        self.elements.read().is_empty()
    }

    /// Removes all elements.
    pub fn clear(&self) {
        self.elements.write().clear();
    }

    /// Ids of all registered elements in no particular order.
    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.read().keys().cloned().collect()
    }

    /// Makes the registry contain exactly the given elements.
    pub fn sync<'a>(&self, elements: impl IntoIterator<Item = &'a InteractiveElement>) {
        let mut next = HashMap::new();
        for element in elements {
            next.insert(element.id.clone(), element.flags);
        }

        *self.elements.write() = next;
    }

    /// Returns true if both handles point to the same registry.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.elements, &other.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_types::latlon;

    #[test]
    fn registry_upsert_remove() {
        let registry = ElementRegistry::new();
        assert!(registry.is_empty());

        assert_eq!(registry.upsert("a", InteractionFlags::ALL), None);
        assert_eq!(
            registry.upsert("a", InteractionFlags::NONE.with_clickable(true)),
            Some(InteractionFlags::ALL)
        );
        assert_eq!(
            registry.get(&"a".into()),
            Some(InteractionFlags::NONE.with_clickable(true))
        );
        assert_eq!(registry.get(&"b".into()), None);

        assert_eq!(
            registry.remove(&"a".into()),
            Some(InteractionFlags::NONE.with_clickable(true))
        );
        assert_eq!(registry.remove(&"a".into()), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_handles_are_shared() {
        let layer_side = ElementRegistry::new();
        let router_side = layer_side.clone();
        assert!(layer_side.ptr_eq(&router_side));

        layer_side.upsert(1, InteractionFlags::NONE.with_draggable(true));
        assert_eq!(
            router_side.get(&1.into()),
            Some(InteractionFlags::NONE.with_draggable(true))
        );

        assert!(!layer_side.ptr_eq(&ElementRegistry::new()));
    }

    #[test]
    fn registry_sync_drops_undeclared() {
        let registry = ElementRegistry::new();
        registry.upsert("stale", InteractionFlags::ALL);

        let elements = [
            InteractiveElement::new("a", latlon!(0.0, 0.0)).with_flags(InteractionFlags::ALL),
            InteractiveElement::new(2, latlon!(1.0, 1.0)),
        ];
        registry.sync(&elements);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(&"stale".into()), None);
        assert_eq!(registry.get(&2.into()), Some(InteractionFlags::NONE));
    }

    #[test]
    fn flags_from_properties() {
        let mut properties = Properties::new();
        assert_eq!(
            InteractionFlags::from_properties(&properties),
            InteractionFlags::NONE
        );

        properties.insert("clickable".into(), true.into());
        properties.insert("hoverable".into(), PropertyValue::Int64(0));
        properties.insert("draggable".into(), PropertyValue::Int64(1));
        assert_eq!(
            InteractionFlags::from_properties(&properties),
            InteractionFlags::NONE
                .with_clickable(true)
                .with_draggable(true)
        );
    }

    #[test]
    fn element_to_shape() {
        let element = InteractiveElement::new("a", latlon!(1.0, 2.0))
            .with_flags(InteractionFlags::NONE.with_hoverable(true))
            .with_property("color", "red");

        let shape = element.to_shape("markers");
        assert_eq!(shape.layer_id, "markers");
        assert_eq!(shape.id(), Some(ElementId::from("a")));
        assert_eq!(shape.property("color"), Some(&PropertyValue::from("red")));
        assert_eq!(
            InteractionFlags::from_properties(&shape.properties),
            element.flags
        );
    }
}
