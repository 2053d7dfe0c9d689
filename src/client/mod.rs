//! Browser-side utilities.
//!
//! # Components
//! ```text
//! events.rs      EventBus / Subscription (drop = unsubscribe)
//! scroll.rs      ScrollTracker: latest {x, y} from passive scroll events
//! navigation.rs  NavigationGate: root class while a navigation is in flight
//! prefetch.rs    ImagePrefetcher: fire-and-forget image requests
//! ```
//!
//! The components share no state. Each one owns its subscriptions, so
//! dropping a component is its unmount.

pub mod events;
pub mod navigation;
pub mod prefetch;
pub mod scroll;

pub use events::{EventBus, ListenerOptions, Subscription};
pub use navigation::{DocumentRoot, NavigationEvent, NavigationGate, NAVIGATING_CLASS};
pub use prefetch::{HttpImageFetcher, ImageFetcher, ImagePrefetcher};
pub use scroll::{ScrollEvent, ScrollPosition, ScrollTracker, Viewport};
