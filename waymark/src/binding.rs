//! Glue between the lifecycle of a layer and its pool registration.

use std::sync::{Arc, Weak};

use crate::context::RoutingContext;
use crate::element::ElementRegistry;
use crate::layer::{LayerCallbacks, LayerRegistration};

/// Interaction related properties of a layer.
#[derive(Debug, Clone, Default)]
pub struct InteractionProps {
    /// Pool the layer joins. The default pool of the context configuration is used when not set.
    pub pool: Option<String>,
    /// Priority of the layer in its pool. Lower values get events first; layers without priority go last.
    pub priority: Option<f64>,
    /// Callbacks of the layer.
    pub callbacks: LayerCallbacks,
    /// Flags of the layer elements.
    pub elements: Option<ElementRegistry>,
}

impl InteractionProps {
    /// Creates empty props.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pool name.
    pub fn with_pool(mut self, pool: impl Into<String>) -> Self {
        self.pool = Some(pool.into());
        self
    }

    /// Sets the layer priority.
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the callbacks.
    pub fn with_callbacks(mut self, callbacks: LayerCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Sets the element registry.
    pub fn with_elements(mut self, elements: ElementRegistry) -> Self {
        self.elements = Some(elements);
        self
    }

    fn registration(&self, layer_id: &str) -> LayerRegistration {
        let mut registration =
            LayerRegistration::new(layer_id).with_callbacks(self.callbacks.clone());
        if let Some(priority) = self.priority {
            registration = registration.with_priority(priority);
        }
        if let Some(elements) = &self.elements {
            registration = registration.with_elements(elements.clone());
        }

        registration
    }
}

#[derive(Debug)]
struct Registered {
    context: Weak<RoutingContext>,
    pool: String,
    layer_id: String,
}

impl Registered {
    fn is_same(&self, context: &Arc<RoutingContext>, pool: &str, layer_id: &str) -> bool {
        std::ptr::eq(self.context.as_ptr(), Arc::as_ptr(context))
            && self.pool == pool
            && self.layer_id == layer_id
    }
}

/// Pool registration of one layer.
///
/// A layer calls [`LayerInteractions::sync`] every time it is (re)rendered with its current props. The binding
/// keeps the registration in the right pool up to date and moves it when the pool, the layer id or the routing
/// context (i.e. the map surface) changes. The registration is removed when the binding is dropped.
#[derive(Debug, Default)]
pub struct LayerInteractions {
    registered: Option<Registered>,
}

impl LayerInteractions {
    /// Creates a binding that is not registered anywhere yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings the registration in line with the current props.
    ///
    /// `context` is `None` while the map surface does not exist, `layer_id` is `None` while the layer is not added to
    /// the surface yet. In both cases any previous registration is removed.
    pub fn sync(
        &mut self,
        context: Option<&Arc<RoutingContext>>,
        layer_id: Option<&str>,
        props: &InteractionProps,
    ) {
        let (Some(context), Some(layer_id)) = (context, layer_id) else {
            self.detach();
            return;
        };

        let pool = props
            .pool
            .as_deref()
            .unwrap_or(context.config().default_pool())
            .to_owned();

        if self
            .registered
            .as_ref()
            .is_some_and(|registered| !registered.is_same(context, &pool, layer_id))
        {
            self.detach();
        }

        context.replace_layer(&pool, props.registration(layer_id));
        self.registered = Some(Registered {
            context: Arc::downgrade(context),
            pool,
            layer_id: layer_id.to_owned(),
        });
    }

    /// Pool the layer is registered in.
    pub fn pool(&self) -> Option<&str> {
        self.registered
            .as_ref()
            .map(|registered| registered.pool.as_str())
    }

    /// Returns true if the layer is registered in a pool of a live context.
    pub fn is_registered(&self) -> bool {
        self.registered
            .as_ref()
            .is_some_and(|registered| registered.context.strong_count() > 0)
    }

    /// Removes the registration. Does nothing if the layer is not registered or the context is already gone.
    pub fn detach(&mut self) {
        let Some(registered) = self.registered.take() else {
            return;
        };

        if let Some(context) = registered.context.upgrade() {
            context.unregister_layer(&registered.pool, &registered.layer_id);
        }
    }
}

impl Drop for LayerInteractions {
    fn drop(&mut self) {
        self.detach();
    }
}
