/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 7/9/24
******************************************************************************/
use crate::application::models::user::User;
use crate::session::persistence::SessionMirror;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Current access token and authenticated user, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub access_token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"access_token\":{},\"user\":{}}}",
            self.access_token
                .as_ref()
                .map_or("null".to_string(), |_| "\"[REDACTED]\"".to_string()),
            self.user
                .as_ref()
                .map_or("null".to_string(), |u| u.to_string())
        )
    }
}

/// Owner of the process-wide [`Session`].
///
/// Every mutation goes through this type; other code only reads snapshots. The lock is
/// held for the duration of a single read or write and never across an `.await`, so a
/// mutation is visible to every request dispatched after it.
pub struct SessionStore {
    inner: RwLock<Session>,
    mirror: Option<Arc<dyn SessionMirror>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.get().to_string())
            .field("mirrored", &self.mirror.is_some())
            .finish()
    }
}

impl SessionStore {
    /// An empty, in-memory only store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Session::default()),
            mirror: None,
        }
    }

    /// Starts from `session` without touching any mirror.
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: RwLock::new(session),
            mirror: None,
        }
    }

    /// Loads the session from `mirror` and keeps writing through to it.
    ///
    /// The session is restored only when both the user and the token are present. A
    /// missing, partial or unreadable mirror yields an empty (logged-out) session.
    pub fn restore(mirror: Arc<dyn SessionMirror>) -> Self {
        let session = match mirror.load() {
            Ok(loaded) => match (loaded.user, loaded.token) {
                (Some(user), Some(token)) => {
                    info!("Restored session for user {}", user.id);
                    Session {
                        access_token: Some(token),
                        user: Some(user),
                    }
                }
                _ => {
                    debug!("No persisted session, starting logged out");
                    Session::default()
                }
            },
            Err(e) => {
                warn!("Ignoring unreadable session mirror: {}", e);
                Session::default()
            }
        };
        Self {
            inner: RwLock::new(session),
            mirror: Some(mirror),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the current session.
    pub fn get(&self) -> Session {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    /// Starts a session after a successful login or registration.
    pub fn login(&self, user: User, token: String) {
        if let Some(mirror) = &self.mirror {
            if let Err(e) = mirror.save_user(&user) {
                warn!("Failed to persist session user: {}", e);
            }
            if let Err(e) = mirror.save_token(&token) {
                warn!("Failed to persist access token: {}", e);
            }
        }
        let user_id = user.id;
        {
            let mut session = self.write();
            session.user = Some(user);
            session.access_token = Some(token);
        }
        info!("Session started for user {}", user_id);
    }

    /// Replaces the access token after a refresh. The user is left as is.
    pub fn set_token(&self, token: String) {
        if let Some(mirror) = &self.mirror {
            if let Err(e) = mirror.save_token(&token) {
                warn!("Failed to persist refreshed access token: {}", e);
            }
        }
        self.write().access_token = Some(token);
        debug!("Access token replaced");
    }

    /// Applies `update` to the session user, returning the updated copy.
    ///
    /// Does nothing and returns `None` when nobody is logged in.
    pub fn update_user<F>(&self, update: F) -> Option<User>
    where
        F: FnOnce(&mut User),
    {
        let updated = {
            let mut session = self.write();
            let user = session.user.as_mut()?;
            update(user);
            user.clone()
        };
        if let Some(mirror) = &self.mirror {
            if let Err(e) = mirror.save_user(&updated) {
                warn!("Failed to persist session user: {}", e);
            }
        }
        Some(updated)
    }

    /// Drops the token and the user.
    pub fn clear(&self) {
        if let Some(mirror) = &self.mirror {
            if let Err(e) = mirror.remove() {
                warn!("Failed to remove persisted session: {}", e);
            }
        }
        *self.write() = Session::default();
        info!("Session cleared");
    }
}
