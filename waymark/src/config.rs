//! Configuration of interaction routing.

/// Pool name used by layers that do not specify one.
pub const DEFAULT_POOL: &str = "shared-event-pool";

/// Name of the shape property used to order non-point shapes within one layer.
pub const DEFAULT_SHAPE_PRIORITY_PROPERTY: &str = "priority";

/// What a router does when a second touch point appears while an element is being dragged.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MultiTouchPolicy {
    /// The drag session ends. No more `drag` callbacks are fired and no `drag_end` is fired either.
    #[default]
    AbortSilently,
    /// The drag session ends with a `drag_end` callback, the same way as when the pointer is released.
    AbortWithDragEnd,
    /// Only the multi-touch move is skipped. The session continues with the next single-touch move.
    Ignore,
}

/// Configuration of a [`RoutingContext`](crate::RoutingContext) and the routers it creates.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InteractionConfig {
    default_pool: String,
    shape_priority_property: String,
    multi_touch_policy: MultiTouchPolicy,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            default_pool: DEFAULT_POOL.to_owned(),
            shape_priority_property: DEFAULT_SHAPE_PRIORITY_PROPERTY.to_owned(),
            multi_touch_policy: MultiTouchPolicy::default(),
        }
    }
}

impl InteractionConfig {
    /// Name of the pool layers join when they do not name one.
    pub fn default_pool(&self) -> &str {
        &self.default_pool
    }

    /// Sets name of the pool layers join when they do not name one.
    pub fn with_default_pool(mut self, pool: impl Into<String>) -> Self {
        self.default_pool = pool.into();
        self
    }

    /// Sets name of the pool layers join when they do not name one.
    pub fn set_default_pool(&mut self, pool: impl Into<String>) {
        self.default_pool = pool.into();
    }

    /// Name of the numeric shape property used to order non-point shapes of the same layer.
    ///
    /// Point shapes are ordered by their distance to the pointer. Lines and polygons have no meaningful distance, so
    /// the value of this property (or `0` if it is absent) is used in its place. Lower values win.
    pub fn shape_priority_property(&self) -> &str {
        &self.shape_priority_property
    }

    /// Sets name of the numeric shape property used to order non-point shapes of the same layer.
    pub fn with_shape_priority_property(mut self, property: impl Into<String>) -> Self {
        self.shape_priority_property = property.into();
        self
    }

    /// Sets name of the numeric shape property used to order non-point shapes of the same layer.
    pub fn set_shape_priority_property(&mut self, property: impl Into<String>) {
        self.shape_priority_property = property.into();
    }

    /// Behaviour of an active drag session when a multi-touch move arrives.
    pub fn multi_touch_policy(&self) -> MultiTouchPolicy {
        self.multi_touch_policy
    }

    /// Sets behaviour of an active drag session when a multi-touch move arrives.
    pub fn with_multi_touch_policy(mut self, policy: MultiTouchPolicy) -> Self {
        self.multi_touch_policy = policy;
        self
    }

    /// Sets behaviour of an active drag session when a multi-touch move arrives.
    pub fn set_multi_touch_policy(&mut self, policy: MultiTouchPolicy) {
        self.multi_touch_policy = policy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = InteractionConfig::default();
        assert_eq!(config.default_pool(), "shared-event-pool");
        assert_eq!(config.shape_priority_property(), "priority");
        assert_eq!(config.multi_touch_policy(), MultiTouchPolicy::AbortSilently);
    }

    #[test]
    fn builder() {
        let mut config = InteractionConfig::default()
            .with_default_pool("markers")
            .with_multi_touch_policy(MultiTouchPolicy::Ignore);
        config.set_shape_priority_property("z");

        assert_eq!(config.default_pool(), "markers");
        assert_eq!(config.shape_priority_property(), "z");
        assert_eq!(config.multi_touch_policy(), MultiTouchPolicy::Ignore);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_config_from_json() {
        let config: InteractionConfig =
            serde_json::from_str(r#"{"multi_touch_policy": "AbortWithDragEnd"}"#)
                .expect("valid config");
        assert_eq!(config.default_pool(), DEFAULT_POOL);
        assert_eq!(
            config.multi_touch_policy(),
            MultiTouchPolicy::AbortWithDragEnd
        );
    }
}
