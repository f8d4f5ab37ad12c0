//! Raw subscription to surface events that follows the lifecycle of its owner.

use std::sync::Arc;

use crate::error::InteractionError;
use crate::surface::{same_surface, MapSurface, SubscriptionId, SurfaceEventKind, SurfaceListener};

/// Listener of a single native event kind, bypassing the event pools.
///
/// The listener stays subscribed until the guard is dropped or [`MapEventSubscription::unsubscribe`] is called.
/// Calling [`MapEventSubscription::update`] with the same surface, kind and listener does nothing, so it is safe to
/// call on every render of the owner.
pub struct MapEventSubscription {
    surface: Arc<dyn MapSurface>,
    kind: SurfaceEventKind,
    listener: Arc<dyn SurfaceListener>,
    id: Option<SubscriptionId>,
}

impl MapEventSubscription {
    /// Subscribes the listener to the given event kind of the surface.
    pub fn new(
        surface: Arc<dyn MapSurface>,
        kind: SurfaceEventKind,
        listener: Arc<dyn SurfaceListener>,
    ) -> Result<Self, InteractionError> {
        let id = surface.subscribe(kind, listener.clone())?;
        log::trace!("Subscribed {id:?} to '{kind}' events");

        Ok(Self {
            surface,
            kind,
            listener,
            id: Some(id),
        })
    }

    /// Event kind the listener is subscribed to.
    pub fn kind(&self) -> SurfaceEventKind {
        self.kind
    }

    /// Id of the active subscription.
    pub fn id(&self) -> Option<SubscriptionId> {
        self.id
    }

    /// Moves the subscription to a new surface, kind or listener.
    ///
    /// If all three are the same as the current ones, nothing happens. Otherwise the old subscription is removed and
    /// a new one is created. A failure to remove the old subscription is logged and does not prevent the new
    /// subscription.
    pub fn update(
        &mut self,
        surface: Arc<dyn MapSurface>,
        kind: SurfaceEventKind,
        listener: Arc<dyn SurfaceListener>,
    ) -> Result<(), InteractionError> {
        let same_listener = std::ptr::eq(
            Arc::as_ptr(&self.listener) as *const (),
            Arc::as_ptr(&listener) as *const (),
        );
        if self.id.is_some()
            && same_listener
            && self.kind == kind
            && same_surface(&self.surface, &surface)
        {
            return Ok(());
        }

        self.release();

        let id = surface.subscribe(kind, listener.clone())?;
        self.surface = surface;
        self.kind = kind;
        self.listener = listener;
        self.id = Some(id);

        Ok(())
    }

    /// Removes the subscription from the surface.
    pub fn unsubscribe(mut self) -> Result<(), InteractionError> {
        match self.id.take() {
            Some(id) => self.surface.unsubscribe(id),
            None => Ok(()),
        }
    }

    fn release(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };

        if let Err(error) = self.surface.unsubscribe(id) {
            log::warn!("Failed to remove '{}' listener: {error}", self.kind);
        }
    }
}

impl Drop for MapEventSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for MapEventSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapEventSubscription")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceEvent;
    use crate::tests::TestSurface;
    use assert_matches::assert_matches;
    use parking_lot::Mutex;
    use waymark_types::latlon;

    fn counter() -> (Arc<Mutex<usize>>, Arc<dyn SurfaceListener>) {
        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();
        let listener: Arc<dyn SurfaceListener> =
            Arc::new(move |_: &mut SurfaceEvent| *count_clone.lock() += 1);
        (count, listener)
    }

    #[test]
    fn listener_receives_events_until_dropped() {
        let surface = TestSurface::new();
        let (count, listener) = counter();

        let subscription =
            MapEventSubscription::new(surface.clone(), SurfaceEventKind::Click, listener)
                .expect("subscribed");
        assert_eq!(subscription.kind(), SurfaceEventKind::Click);

        surface.fire(surface.event(SurfaceEventKind::Click, latlon!(0.0, 0.0)));
        surface.fire(surface.event(SurfaceEventKind::MouseMove, latlon!(0.0, 0.0)));
        assert_eq!(*count.lock(), 1);

        drop(subscription);
        surface.fire(surface.event(SurfaceEventKind::Click, latlon!(0.0, 0.0)));
        assert_eq!(*count.lock(), 1);
        assert_eq!(surface.listener_count(), 0);
    }

    #[test]
    fn update_with_same_arguments_keeps_subscription() {
        let surface = TestSurface::new();
        let (_, listener) = counter();

        let mut subscription =
            MapEventSubscription::new(surface.clone(), SurfaceEventKind::Click, listener.clone())
                .expect("subscribed");
        let id = subscription.id();

        subscription
            .update(surface.clone(), SurfaceEventKind::Click, listener)
            .expect("updated");
        assert_eq!(subscription.id(), id);
        assert_eq!(surface.subscribe_count(), 1);
    }

    #[test]
    fn update_with_new_kind_resubscribes() {
        let surface = TestSurface::new();
        let (count, listener) = counter();

        let mut subscription =
            MapEventSubscription::new(surface.clone(), SurfaceEventKind::Click, listener.clone())
                .expect("subscribed");
        subscription
            .update(surface.clone(), SurfaceEventKind::MouseDown, listener)
            .expect("updated");

        assert_eq!(surface.listener_count(), 1);
        surface.fire(surface.event(SurfaceEventKind::Click, latlon!(0.0, 0.0)));
        surface.fire(surface.event(SurfaceEventKind::MouseDown, latlon!(0.0, 0.0)));
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn update_moves_to_new_surface() {
        let first = TestSurface::new();
        let second = TestSurface::new();
        let (_, listener) = counter();

        let mut subscription =
            MapEventSubscription::new(first.clone(), SurfaceEventKind::Click, listener.clone())
                .expect("subscribed");
        subscription
            .update(second.clone(), SurfaceEventKind::Click, listener)
            .expect("updated");

        assert_eq!(first.listener_count(), 0);
        assert_eq!(second.listener_count(), 1);
    }

    #[test]
    fn explicit_unsubscribe_reports_errors() {
        let surface = TestSurface::new();
        let (_, listener) = counter();

        let subscription =
            MapEventSubscription::new(surface.clone(), SurfaceEventKind::Click, listener)
                .expect("subscribed");
        surface.fail_unsubscribe(true);

        assert_matches!(
            subscription.unsubscribe(),
            Err(InteractionError::Unsubscribe { .. })
        );
    }

    #[test]
    fn subscribe_failure_is_returned() {
        let surface = TestSurface::new();
        surface.fail_subscribe(true);
        let (_, listener) = counter();

        assert_matches!(
            MapEventSubscription::new(surface, SurfaceEventKind::Click, listener),
            Err(InteractionError::Subscribe {
                kind: SurfaceEventKind::Click,
                ..
            })
        );
    }

    #[test]
    fn destroyed_surface_is_reported() {
        let surface = TestSurface::new();
        let (_, listener) = counter();

        let subscription =
            MapEventSubscription::new(surface.clone(), SurfaceEventKind::Click, listener.clone())
                .expect("subscribed");
        surface.destroy();

        assert_matches!(
            subscription.unsubscribe(),
            Err(InteractionError::SurfaceGone)
        );
        assert_matches!(
            MapEventSubscription::new(surface, SurfaceEventKind::Click, listener),
            Err(InteractionError::SurfaceGone)
        );
    }
}
