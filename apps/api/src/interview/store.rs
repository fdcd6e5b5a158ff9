//! In-memory registry of live interview sessions.
//!
//! Each session sits behind its own mutex, so turns for one candidate are
//! strictly serialized while different candidates proceed independently.
//! Sessions idle for longer than the configured TTL are evicted, finished or not;
//! a finished interview stays readable (and keeps answering 409) until then.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::interview::session::InterviewSession;

pub type SharedSession = Arc<Mutex<InterviewSession>>;

#[derive(Debug, thiserror::Error)]
#[error("Session limit of {limit} reached")]
pub struct SessionLimitReached {
    pub limit: usize,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(max_sessions: usize, idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_sessions,
            idle_ttl,
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    /// Registers a session and returns its id. When the store is full, idle
    /// sessions are evicted first.
    pub async fn insert(&self, session: InterviewSession) -> Result<Uuid, SessionLimitReached> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            evict_idle_locked(&mut sessions, self.idle_ttl);
        }
        if sessions.len() >= self.max_sessions {
            warn!(
                "Rejecting new interview session: {} sessions already live",
                sessions.len()
            );
            return Err(SessionLimitReached {
                limit: self.max_sessions,
            });
        }

        let id = session.id();
        sessions.insert(id, Arc::new(Mutex::new(session)));
        Ok(id)
    }

    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!("Interview session {} removed", id);
        }
        removed
    }

    /// Drops every session idle past the TTL; returns how many were dropped.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        evict_idle_locked(&mut sessions, self.idle_ttl)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Periodically evicts idle sessions for as long as the store is alive.
    pub fn spawn_sweeper(&self, period: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle().await;
                if evicted > 0 {
                    info!(
                        "Evicted {} idle interview sessions, {} remain",
                        evicted,
                        store.len().await
                    );
                }
            }
        })
    }
}

/// Sessions whose mutex is held are mid-turn and always kept.
fn evict_idle_locked(sessions: &mut HashMap<Uuid, SharedSession>, idle_ttl: Duration) -> usize {
    let now = Instant::now();
    let before = sessions.len();
    sessions.retain(|_, session| match session.try_lock() {
        Ok(guard) => now.duration_since(guard.last_activity()) < idle_ttl,
        Err(_) => true,
    });
    before - sessions.len()
}
