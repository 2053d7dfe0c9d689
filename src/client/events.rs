//! Listener registration for browser-style event sources.
//!
//! A [`Subscription`] unregisters its listener when dropped, so a component
//! that owns its subscriptions cleans them up on unmount.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;

/// Registration options mirroring `addEventListener`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerOptions {
    /// The listener never blocks the event's default action.
    pub passive: bool,
}

impl ListenerOptions {
    pub fn passive() -> Self {
        Self { passive: true }
    }
}

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Registered<E> {
    options: ListenerOptions,
    listener: Listener<E>,
}

struct BusInner<E> {
    next_id: AtomicU64,
    listeners: DashMap<u64, Registered<E>>,
}

/// A source of events of type `E`.
pub struct EventBus<E> {
    inner: Arc<BusInner<E>>,
}

impl<E: 'static> EventBus<E> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                next_id: AtomicU64::new(1),
                listeners: DashMap::new(),
            }),
        }
    }

    pub fn subscribe<F>(&self, options: ListenerOptions, listener: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.insert(
            id,
            Registered {
                options,
                listener: Arc::new(listener),
            },
        );

        let weak: Weak<BusInner<E>> = Arc::downgrade(&self.inner);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.listeners.remove(&id);
                }
            })),
        }
    }

    /// Deliver `event` to every registered listener.
    pub fn emit(&self, event: &E) {
        // Listeners may subscribe or unsubscribe; never call them under a shard lock.
        let listeners: Vec<Listener<E>> = self
            .inner
            .listeners
            .iter()
            .map(|entry| entry.listener.clone())
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    pub fn passive_listener_count(&self) -> usize {
        self.inner
            .listeners
            .iter()
            .filter(|entry| entry.options.passive)
            .count()
    }
}

impl<E: 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Handle for a registered listener; dropping it unregisters the listener.
#[must_use = "dropping a Subscription unregisters the listener immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Unregister now instead of at drop.
    pub fn unsubscribe(mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }
}
