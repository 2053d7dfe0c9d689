//! Session cookie and flash storage.
//!
//! A rejected browser submission stores its errors and input under the
//! caller's session id; the next read of the form consumes them. A flash
//! nobody reads expires after the configured TTL.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::{header, HeaderMap, HeaderValue};
use dashmap::DashMap;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "crm_session";

/// Data carried across one redirect.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Flash {
    pub errors: Map<String, Value>,
    pub old: Map<String, Value>,
}

struct Pending {
    flash: Flash,
    stored_at: Instant,
}

impl Pending {
    fn is_live(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

/// Pending flashes keyed by session. Entries older than the TTL are dropped
/// on the next write and are never returned.
#[derive(Clone)]
pub struct FlashStore {
    entries: Arc<DashMap<Uuid, Pending>>,
    ttl: Duration,
}

impl FlashStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Replace any pending flash for `session`.
    pub fn put(&self, session: Uuid, flash: Flash) {
        self.evict_expired();
        self.entries.insert(
            session,
            Pending {
                flash,
                stored_at: Instant::now(),
            },
        );
    }

    /// Remove and return the pending flash for `session`.
    pub fn take(&self, session: &Uuid) -> Option<Flash> {
        self.evict_expired();
        self.entries
            .remove(session)
            .filter(|(_, pending)| pending.is_live(self.ttl))
            .map(|(_, pending)| pending.flash)
    }

    fn evict_expired(&self) {
        let before = self.entries.len();
        self.entries.retain(|_, pending| pending.is_live(self.ttl));
        let evicted = before.saturating_sub(self.entries.len());
        if evicted > 0 {
            tracing::debug!(evicted, "Dropped expired flashes");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Session id from the `Cookie` header, if present and well-formed.
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

pub fn session_cookie(session: Uuid) -> HeaderValue {
    let cookie = format!("{SESSION_COOKIE}={session}; Path=/; HttpOnly; SameSite=Lax");
    // A hyphenated UUID and fixed attributes are always valid header bytes.
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flash_is_consumed_once() {
        let store = FlashStore::new(Duration::from_secs(60));
        let session = Uuid::new_v4();
        let mut errors = Map::new();
        errors.insert("title".into(), json!(["The title field is required."]));

        store.put(
            session,
            Flash {
                errors: errors.clone(),
                old: Map::new(),
            },
        );
        assert_eq!(store.len(), 1);

        let flash = store.take(&session).unwrap();
        assert_eq!(flash.errors, errors);
        assert!(store.take(&session).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_expired_flash_is_gone() {
        let store = FlashStore::new(Duration::from_millis(20));
        let abandoned = Uuid::new_v4();
        store.put(abandoned, Flash::default());
        std::thread::sleep(Duration::from_millis(40));

        assert!(store.take(&abandoned).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_abandoned_flashes_do_not_accumulate() {
        let store = FlashStore::new(Duration::from_millis(20));
        for _ in 0..100 {
            store.put(Uuid::new_v4(), Flash::default());
        }
        assert_eq!(store.len(), 100);
        std::thread::sleep(Duration::from_millis(40));

        let fresh = Uuid::new_v4();
        store.put(fresh, Flash::default());
        assert_eq!(store.len(), 1);
        assert!(store.take(&fresh).is_some());
    }

    #[test]
    fn test_session_id_parsing() {
        let session = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE}={session}")).unwrap(),
        );
        assert_eq!(session_id(&headers), Some(session));

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("crm_session=not-a-uuid"),
        );
        assert_eq!(session_id(&headers), None);
        assert_eq!(session_id(&HeaderMap::new()), None);
    }

    #[test]
    fn test_session_cookie_roundtrips() {
        let session = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        let set_cookie = session_cookie(session);
        let pair = set_cookie.to_str().unwrap().split(';').next().unwrap().to_string();
        headers.insert(header::COOKIE, HeaderValue::from_str(&pair).unwrap());
        assert_eq!(session_id(&headers), Some(session));
    }
}
