//! Error types used by the crate.

use thiserror::Error;

use crate::surface::{SubscriptionId, SurfaceEventKind};

/// Errors reported by a [`MapSurface`](crate::MapSurface) implementation.
///
/// None of these errors ever reach the application through the routing entry points. They are absorbed by the
/// router and reported to the [`Diagnostics`](crate::Diagnostics) hook instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InteractionError {
    /// The surface refused to add an event listener.
    #[error("failed to subscribe to {kind} events: {reason}")]
    Subscribe {
        /// Event kind the subscription was requested for.
        kind: SurfaceEventKind,
        /// Surface specific description.
        reason: String,
    },
    /// The surface failed to remove an event listener.
    #[error("failed to remove subscription {subscription:?}: {reason}")]
    Unsubscribe {
        /// Subscription that could not be removed.
        subscription: SubscriptionId,
        /// Surface specific description.
        reason: String,
    },
    /// Hit-testing of rendered shapes failed.
    #[error("rendered shapes query failed: {0}")]
    Query(String),
    /// The map surface was destroyed. Surfaces return it from every call made after they are gone; the router
    /// treats it like any other failure of the call.
    #[error("map surface is no longer available")]
    SurfaceGone,
    /// Generic error - details are inside. For surface failures that fit none of the other variants.
    #[error("{0}")]
    Generic(String),
}
