//! Navigation gate for the mobile menu.
//!
//! While a client-side navigation is in flight the document root carries
//! the [`NAVIGATING_CLASS`] class, which the stylesheet uses to suppress
//! interaction.

use std::sync::Arc;

use crate::client::events::{EventBus, ListenerOptions, Subscription};

pub const NAVIGATING_CLASS: &str = "navigating";

/// Router lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    Started,
    Finished,
}

/// Class list of the document root element.
pub trait DocumentRoot: Send + Sync {
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
}

pub struct NavigationGate {
    _subscription: Subscription,
}

impl NavigationGate {
    pub fn mount(router: &EventBus<NavigationEvent>, root: Arc<dyn DocumentRoot>) -> Self {
        let subscription = router.subscribe(ListenerOptions::default(), move |event| match event {
            NavigationEvent::Started => root.add_class(NAVIGATING_CLASS),
            NavigationEvent::Finished => root.remove_class(NAVIGATING_CLASS),
        });
        Self {
            _subscription: subscription,
        }
    }

    /// Hook for callers to invoke before navigating away from an open menu.
    pub fn close_mobile_menu(&self) {
        // TODO: wire to the menu open state once the layout exposes it.
    }
}
