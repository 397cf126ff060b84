/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 7/9/24
 ******************************************************************************/

//! Persisted copy of the session so it survives a restart.
//!
//! The mirror holds two keys, `user` and `token`. It is a collaborator of
//! [`crate::session::store::SessionStore`], which writes through to it on every mutation.

use crate::application::models::user::User;
use crate::constants::{MIRROR_TOKEN_KEY, MIRROR_USER_KEY};
use crate::error::AppError;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Whatever the mirror currently holds. Either key may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MirroredSession {
    pub user: Option<User>,
    pub token: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
pub trait SessionMirror: Send + Sync {
    fn load(&self) -> Result<MirroredSession, AppError>;
    fn save_user(&self, user: &User) -> Result<(), AppError>;
    fn save_token(&self, token: &str) -> Result<(), AppError>;
    /// Drops both keys.
    fn remove(&self) -> Result<(), AppError>;
}

/// JSON file backed mirror.
///
/// Writes go to a sibling temporary file which is then renamed over the target, so a
/// crash mid-write leaves the previous document intact.
#[derive(Debug)]
pub struct FileSessionMirror {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionMirror {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Map<String, Value>, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(map),
            other => Err(AppError::InvalidResponse(format!(
                "session mirror is not a JSON object: {other}"
            ))),
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, serde_json::to_vec_pretty(document)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update<F>(&self, mutate: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut Map<String, Value>) -> Result<(), AppError>,
    {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut document = self.read_document().unwrap_or_default();
        mutate(&mut document)?;
        self.write_document(&document)
    }
}

impl SessionMirror for FileSessionMirror {
    fn load(&self) -> Result<MirroredSession, AppError> {
        let document = self.read_document()?;
        let user = match document.get(MIRROR_USER_KEY) {
            Some(Value::Null) | None => None,
            Some(value) => Some(serde_json::from_value::<User>(value.clone())?),
        };
        let token = document
            .get(MIRROR_TOKEN_KEY)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(String::from);
        debug!(
            "Loaded session mirror from {}: user={}, token={}",
            self.path.display(),
            user.is_some(),
            token.is_some()
        );
        Ok(MirroredSession { user, token })
    }

    fn save_user(&self, user: &User) -> Result<(), AppError> {
        let value = serde_json::to_value(user)?;
        self.update(|doc| {
            doc.insert(MIRROR_USER_KEY.to_string(), value);
            Ok(())
        })
    }

    fn save_token(&self, token: &str) -> Result<(), AppError> {
        self.update(|doc| {
            doc.insert(MIRROR_TOKEN_KEY.to_string(), Value::String(token.to_string()));
            Ok(())
        })
    }

    fn remove(&self) -> Result<(), AppError> {
        self.update(|doc| {
            doc.remove(MIRROR_USER_KEY);
            doc.remove(MIRROR_TOKEN_KEY);
            Ok(())
        })
    }
}
