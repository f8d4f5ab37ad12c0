use std::sync::Arc;

use ahash::{HashMap, HashMapExt};
use parking_lot::Mutex;

use crate::config::InteractionConfig;
use crate::diagnostics::{Diagnostics, LogDiagnostics};
use crate::layer::LayerRegistration;
use crate::router::EventRouter;
use crate::surface::MapSurface;

/// Interaction routing state of one map surface.
///
/// The context is created alongside the map surface and handed to every layer that needs interaction routing. It
/// owns one [`EventRouter`] per pool name, creating routers on demand and dropping them when their last layer
/// unregisters. Dropping the context (or calling [`RoutingContext::teardown`]) detaches every router from the
/// surface.
///
/// ```no_run
/// # use std::sync::Arc;
/// # use waymark::{LayerRegistration, MapSurface, RoutingContext};
/// # fn surface() -> Arc<dyn MapSurface> { unimplemented!() }
/// let context = RoutingContext::new(surface());
/// context.register_layer(
///     "markers",
///     LayerRegistration::new("points")
///         .with_priority(1.0)
///         .on_click(|id, _event| println!("Clicked {id}")),
/// );
/// ```
pub struct RoutingContext {
    surface: Arc<dyn MapSurface>,
    config: InteractionConfig,
    diagnostics: Arc<dyn Diagnostics>,
    pools: Mutex<HashMap<String, Arc<EventRouter>>>,
}

impl RoutingContext {
    /// Creates a context with default configuration that logs suppressed errors.
    pub fn new(surface: Arc<dyn MapSurface>) -> Self {
        Self {
            surface,
            config: InteractionConfig::default(),
            diagnostics: Arc::new(LogDiagnostics::new()),
            pools: Mutex::new(HashMap::new()),
        }
    }

    /// Sets the configuration. Only routers created after this call use it.
    pub fn with_config(mut self, config: InteractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the hook that receives suppressed errors.
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Map surface of the context.
    pub fn surface(&self) -> &Arc<dyn MapSurface> {
        &self.surface
    }

    /// Configuration of the context.
    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Diagnostics hook of the context.
    pub fn diagnostics(&self) -> &Arc<dyn Diagnostics> {
        &self.diagnostics
    }

    /// Router of the pool, if the pool has any layers.
    pub fn router(&self, pool: &str) -> Option<Arc<EventRouter>> {
        self.pools.lock().get(pool).cloned()
    }

    /// Router of the pool. If the pool does not exist yet, a new router is created and attached to the surface.
    ///
    /// A router without layers is removed on the next [`RoutingContext::unregister_layer`] call for the pool, or on
    /// teardown.
    pub fn get_or_create(&self, pool: &str) -> Arc<EventRouter> {
        let router = self.entry(&mut self.pools.lock(), pool);
        router.attach();
        router
    }

    fn entry(&self, pools: &mut HashMap<String, Arc<EventRouter>>, pool: &str) -> Arc<EventRouter> {
        pools
            .entry(pool.to_owned())
            .or_insert_with(|| {
                log::debug!("Creating event pool '{pool}'");
                EventRouter::new(
                    pool,
                    self.surface.clone(),
                    self.config.clone(),
                    self.diagnostics.clone(),
                )
            })
            .clone()
    }

    /// Adds the layer to the pool, or merges the registration into the existing binding of the layer: fields set in
    /// `registration` overwrite the current values, the rest is kept.
    pub fn register_layer(&self, pool: &str, registration: LayerRegistration) {
        let router = {
            let mut pools = self.pools.lock();
            let router = self.entry(&mut pools, pool);
            router.merge_layer(registration);
            router
        };

        router.attach();
    }

    /// Adds the layer to the pool, or replaces the existing binding of the layer entirely. Hover and drag state of
    /// the pool are kept.
    pub fn replace_layer(&self, pool: &str, registration: LayerRegistration) {
        let router = {
            let mut pools = self.pools.lock();
            let router = self.entry(&mut pools, pool);
            router.replace_layer(registration);
            router
        };

        router.attach();
    }

    /// Removes the layer from the pool. The pool is dropped together with its surface subscriptions when it has no
    /// layers left. Unregistering an unknown layer or pool does nothing.
    ///
    /// The surface and the diagnostics hook are called after the pool table is unlocked, so both may call back into
    /// the context.
    pub fn unregister_layer(&self, pool: &str, layer_id: &str) {
        let removed = {
            let mut pools = self.pools.lock();
            let Some(router) = pools.get(pool) else {
                return;
            };

            router.remove_layer(layer_id);
            if router.is_empty() {
                pools.remove(pool)
            } else {
                None
            }
        };

        if let Some(router) = removed {
            log::debug!("Event pool '{pool}' removed");
            router.detach();
        }
    }

    /// Names of the existing pools in no particular order.
    pub fn pool_names(&self) -> Vec<String> {
        self.pools.lock().keys().cloned().collect()
    }

    /// Number of existing pools.
    pub fn pool_count(&self) -> usize {
        self.pools.lock().len()
    }

    /// Detaches every pool from the surface and forgets all registrations.
    pub fn teardown(&self) {
        let routers: Vec<_> = self.pools.lock().drain().map(|(_, router)| router).collect();
        for router in routers {
            router.detach();
        }
    }
}

impl Drop for RoutingContext {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for RoutingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingContext")
            .field("config", &self.config)
            .field("pools", &self.pool_names())
            .finish()
    }
}
