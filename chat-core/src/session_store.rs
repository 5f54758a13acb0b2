//! In-memory session store with a pluggable expiration policy.
//!
//! The map sits behind a `RwLock`; every session has its own `Mutex`, held by
//! the caller for a whole conversational turn. Two requests for the same
//! session therefore run one after the other, different sessions in parallel.
//! Expiration is evaluated lazily on access and by [`SessionStore::purge_expired`].

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::session::Session;

/// Decides when an idle session is dropped.
pub trait ExpirationPolicy: Send + Sync + Debug {
    fn is_expired(&self, last_active: Instant, now: Instant) -> bool;
}

/// Sessions live for the whole process.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverExpire;

impl ExpirationPolicy for NeverExpire {
    fn is_expired(&self, _last_active: Instant, _now: Instant) -> bool {
        false
    }
}

/// Sessions untouched for longer than the timeout are dropped.
#[derive(Debug, Clone, Copy)]
pub struct IdleTimeout(pub Duration);

impl ExpirationPolicy for IdleTimeout {
    fn is_expired(&self, last_active: Instant, now: Instant) -> bool {
        now.saturating_duration_since(last_active) >= self.0
    }
}

#[derive(Debug)]
struct Slot {
    session: Arc<Mutex<Session>>,
    last_active: Instant,
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Slot>>,
    policy: Box<dyn ExpirationPolicy>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Box::new(NeverExpire))
    }
}

impl SessionStore {
    pub fn new(policy: Box<dyn ExpirationPolicy>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            policy,
        }
    }

    /// `IdleTimeout(ttl)` when a ttl is given, `NeverExpire` otherwise.
    pub fn with_idle_ttl(ttl: Option<Duration>) -> Self {
        match ttl {
            Some(ttl) => Self::new(Box::new(IdleTimeout(ttl))),
            None => Self::default(),
        }
    }

    /// Session handle for `id`, created lazily. An expired session is replaced.
    pub async fn get_or_create(&self, id: &str) -> Arc<Mutex<Session>> {
        self.get_or_create_at(id, Instant::now()).await
    }

    pub(crate) async fn get_or_create_at(&self, id: &str, now: Instant) -> Arc<Mutex<Session>> {
        let mut map = self.sessions.write().await;

        if let Some(slot) = map.get_mut(id) {
            if !self.policy.is_expired(slot.last_active, now) {
                slot.last_active = now;
                return Arc::clone(&slot.session);
            }
            debug!(session_id = id, "session expired, starting fresh");
        }

        let session = Arc::new(Mutex::new(Session::default()));
        map.insert(
            id.to_string(),
            Slot {
                session: Arc::clone(&session),
                last_active: now,
            },
        );
        session
    }

    /// Remove a session; returns whether it existed. Idempotent.
    pub async fn clear(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Drop every expired session; returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now()).await
    }

    pub(crate) async fn purge_expired_at(&self, now: Instant) -> usize {
        let mut map = self.sessions.write().await;
        let before = map.len();
        map.retain(|_, slot| !self.policy.is_expired(slot.last_active, now));
        before - map.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Turn;

    #[tokio::test]
    async fn same_id_shares_one_session() {
        let store = SessionStore::default();
        let a = store.get_or_create("alice").await;
        a.lock().await.history.push(Turn::user("hej"));

        let again = store.get_or_create("alice").await;
        assert_eq!(again.lock().await.history.len(), 1);
        assert!(store.get_or_create("bob").await.lock().await.history.is_empty());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let store = SessionStore::default();
        store.get_or_create("s1").await;
        assert!(store.clear("s1").await);
        assert!(!store.clear("s1").await);
        assert!(!store.clear("never-seen").await);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn default_policy_never_expires() {
        let store = SessionStore::default();
        let t0 = Instant::now();
        store.get_or_create_at("s", t0).await.lock().await.topic = Some("okna".into());

        let later = t0 + Duration::from_secs(365 * 24 * 3600);
        assert_eq!(store.purge_expired_at(later).await, 0);
        let s = store.get_or_create_at("s", later).await;
        assert_eq!(s.lock().await.topic.as_deref(), Some("okna"));
    }

    #[tokio::test]
    async fn idle_timeout_drops_stale_sessions() {
        let store = SessionStore::with_idle_ttl(Some(Duration::from_secs(60)));
        let t0 = Instant::now();
        store.get_or_create_at("stale", t0).await.lock().await.topic = Some("drzwi".into());
        store.get_or_create_at("fresh", t0).await;

        // Touching "fresh" keeps it alive.
        store
            .get_or_create_at("fresh", t0 + Duration::from_secs(50))
            .await;

        let removed = store.purge_expired_at(t0 + Duration::from_secs(70)).await;
        assert_eq!(removed, 1);
        assert_eq!(store.len().await, 1);

        let s = store
            .get_or_create_at("stale", t0 + Duration::from_secs(71))
            .await;
        assert_eq!(s.lock().await.topic, None);
    }

    #[tokio::test]
    async fn expired_session_is_replaced_on_access() {
        let store = SessionStore::with_idle_ttl(Some(Duration::from_secs(10)));
        let t0 = Instant::now();
        store.get_or_create_at("s", t0).await.lock().await.history.push(Turn::user("a"));

        let s = store.get_or_create_at("s", t0 + Duration::from_secs(11)).await;
        assert!(s.lock().await.history.is_empty());
    }
}
