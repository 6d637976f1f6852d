//! Server-side session store
//!
//! Sessions are created at login and destroyed at logout. The token travels
//! in a `servesoft_session` cookie; everything else stays in memory on the
//! server. Expired entries are evicted lazily on lookup.

use crate::db::roles::RoleKind;
use axum::http::HeaderMap;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "servesoft_session";

/// Identity snapshot captured at login time.
///
/// `role` is the primary role chosen when the session was created; it is
/// intentionally not re-derived on later requests (see the `check` handler).
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub account_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: RoleKind,
}

#[derive(Debug, Clone)]
struct SessionEntry {
    session: Session,
    expires_at: DateTime<Utc>,
}

pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            ttl: Duration::minutes(ttl_minutes),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Store a new session and return its opaque token.
    ///
    /// Also sweeps expired entries while holding the write lock: abandoned
    /// sessions never present their token again, so lookup-time eviction
    /// alone would let the map grow without bound under login traffic.
    pub async fn create(&self, session: Session) -> String {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now();
        let entry = SessionEntry {
            session,
            expires_at: now + self.ttl,
        };
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, e| e.expires_at > now);
        sessions.insert(token.clone(), entry);
        token
    }

    /// Look up a session, evicting it if past its TTL.
    pub async fn get(&self, token: &str) -> Option<Session> {
        {
            let sessions = self.sessions.read().await;
            let entry = sessions.get(token)?;
            if entry.expires_at > Utc::now() {
                return Some(entry.session.clone());
            }
        }
        self.sessions.write().await.remove(token);
        None
    }

    /// Remove a session. Returns whether one existed.
    pub async fn remove(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    pub fn cookie_max_age_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }
}

/// Build the Set-Cookie value for a fresh session.
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

/// Build the Set-Cookie value that clears the session cookie.
pub fn clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Extract the session token from the request's Cookie header, if present.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers
        .get(axum::http::header::COOKIE)
        .and_then(|h| h.to_str().ok())?;

    cookies.split(';').find_map(|cookie| {
        let value = cookie.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('=')?;
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    })
}

/// Public user id as exposed by the API ("u" + numeric id).
pub fn public_user_id(user_id: i64) -> String {
    format!("u{user_id}")
}
