//! Token storage and retrieval.
//!
//! Stores the session token pair in `${ORBITA_HOME}/tokens.json` with
//! restricted permissions (0600). Tokens are never logged in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// A bearer session: short-lived access token plus long-lived refresh token.
///
/// The access token is present only while the session is considered valid;
/// without a refresh token no refresh is ever attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Session {
    /// Creates a session from a fresh token pair.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
        }
    }

    /// Returns true if an access token is present.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Process-wide session store.
///
/// Holds the current session behind an `RwLock` so concurrent in-flight
/// requests always observe a consistent access/refresh pair, and persists
/// every mutation to disk so the session survives restarts.
pub struct TokenStore {
    path: PathBuf,
    session: RwLock<Session>,
}

impl TokenStore {
    /// Opens the store at the default path, loading any persisted session.
    pub fn open_default() -> Result<Self> {
        Self::open(paths::tokens_path())
    }

    /// Opens the store at a specific path.
    /// A missing file yields an empty session.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let session = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read tokens from {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse tokens from {}", path.display()))?
        } else {
            Session::default()
        };

        Ok(Self {
            path,
            session: RwLock::new(session),
        })
    }

    /// Returns a snapshot of the current session. Never fails.
    pub fn get(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Replaces both fields atomically and persists the result.
    ///
    /// The write lock is held across the file write so no reader can
    /// observe a session that differs from what lands on disk.
    pub fn set(&self, session: Session) -> Result<()> {
        let mut guard = self
            .session
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = session;
        Self::persist(&self.path, &guard)
    }

    /// Nulls both fields and persists the empty session.
    pub fn clear(&self) -> Result<()> {
        self.set(Session::default())
    }

    /// Writes the session to disk with restricted permissions (0600).
    fn persist(path: &Path, session: &Session) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)
                .with_context(|| format!("Failed to open {} for writing", path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(path, contents)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        Ok(())
    }
}
