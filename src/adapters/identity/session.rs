//! Identity session. Holds the signed-in identity and notifies observers.
//!
//! Injected wherever an `IdentityPort` is needed instead of living in a
//! global. Token issuance is delegated to a `TokenIssuer`.

use crate::domain::{DomainError, Identity};
use crate::ports::{IdentityPort, TokenIssuer};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info, warn};

/// Handle returned by [`AuthSession::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(Option<&Identity>) + Send + Sync>;

pub struct AuthSession {
    current: RwLock<Option<Identity>>,
    listeners: Mutex<HashMap<ListenerId, Listener>>,
    next_listener: AtomicU64,
    issuer: Arc<dyn TokenIssuer>,
}

impl AuthSession {
    /// Signed-out session.
    pub fn new(issuer: Arc<dyn TokenIssuer>) -> Self {
        Self {
            current: RwLock::new(None),
            listeners: Mutex::new(HashMap::new()),
            next_listener: AtomicU64::new(1),
            issuer,
        }
    }

    pub fn signed_in(identity: Identity, issuer: Arc<dyn TokenIssuer>) -> Self {
        let session = Self::new(issuer);
        *session.write_current() = Some(identity);
        session
    }

    /// Register an observer. It is called right away with the current
    /// identity, then on every sign-in/sign-out.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(Option<&Identity>) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        let listener: Listener = Arc::new(listener);
        let count = {
            let mut listeners = self.lock_listeners();
            listeners.insert(id, Arc::clone(&listener));
            listeners.len()
        };
        debug!(listener = id.0, count, "identity listener added");
        let current = self.current_identity();
        listener(current.as_ref());
        id
    }

    /// Returns false when `id` was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock_listeners();
        let removed = listeners.remove(&id).is_some();
        debug!(listener = id.0, count = listeners.len(), removed, "identity listener removed");
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.lock_listeners().len()
    }

    pub fn sign_in(&self, identity: Identity) {
        info!(uid = %identity.uid, "signed in");
        *self.write_current() = Some(identity.clone());
        self.notify(Some(&identity));
    }

    pub fn sign_out(&self) {
        let previous = self.write_current().take();
        if let Some(identity) = previous {
            info!(uid = %identity.uid, "signed out");
            self.notify(None);
        }
    }

    /// Drop all observers. The session stays usable.
    pub fn teardown(&self) {
        let mut listeners = self.lock_listeners();
        if !listeners.is_empty() {
            debug!(count = listeners.len(), "removing identity listeners");
        }
        listeners.clear();
    }

    /// Deliver `identity`, the value this transition wrote, to every listener.
    fn notify(&self, identity: Option<&Identity>) {
        // Listeners run outside the lock so they may (un)subscribe.
        let listeners: Vec<Listener> = self.lock_listeners().values().cloned().collect();
        for listener in listeners {
            listener(identity);
        }
    }

    fn lock_listeners(&self) -> std::sync::MutexGuard<'_, HashMap<ListenerId, Listener>> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn write_current(&self) -> std::sync::RwLockWriteGuard<'_, Option<Identity>> {
        self.current.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait::async_trait]
impl IdentityPort for AuthSession {
    fn current_identity(&self) -> Option<Identity> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    async fn fetch_id_token(&self, identity: &Identity) -> Result<String, DomainError> {
        self.issuer.issue_token(identity).await.inspect_err(|e| {
            warn!(uid = %identity.uid, error = %e, "failed to fetch ID token");
        })
    }
}
