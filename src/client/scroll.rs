//! Scroll position tracking.

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;

use crate::client::events::{EventBus, ListenerOptions, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollPosition {
    pub x: f64,
    pub y: f64,
}

/// Native scroll notification. Carries no data; the offset is read from the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEvent;

/// Read access to the current viewport offset.
pub trait Viewport: Send + Sync {
    fn scroll_offset(&self) -> ScrollPosition;
}

/// Latest observed scroll position for as long as the tracker is mounted.
pub struct ScrollTracker {
    position: Arc<ArcSwap<ScrollPosition>>,
    _subscription: Subscription,
}

impl ScrollTracker {
    /// Subscribe with a passive listener and take an initial reading.
    pub fn mount(scroll: &EventBus<ScrollEvent>, viewport: Arc<dyn Viewport>) -> Self {
        let position = Arc::new(ArcSwap::from_pointee(ScrollPosition::default()));

        let pos = position.clone();
        let vp = viewport.clone();
        let subscription = scroll.subscribe(ListenerOptions::passive(), move |_| {
            pos.store(Arc::new(vp.scroll_offset()));
        });

        position.store(Arc::new(viewport.scroll_offset()));

        Self {
            position,
            _subscription: subscription,
        }
    }

    pub fn position(&self) -> ScrollPosition {
        **self.position.load()
    }
}
