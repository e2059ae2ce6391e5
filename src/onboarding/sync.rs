//! Profile sync: reconciles the server-reported profile into the gate's
//! inputs after login, refresh or an explicit change.

use std::fmt;
use std::sync::Arc;

use crate::api::{ApiClient, ApiError, types::MinorHistoryEntry};

use super::profile::{Field, OnboardingProfile, ProfileStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Profile fetch failed non-fatally; prior values were retained so a
    /// transient error does not bounce a valid session back to step one.
    Fetch { message: String },
    /// The fetch failed with an authorization error; session teardown has
    /// already run inside the request pipeline.
    Session(ApiError),
    /// The minor history reported more than one entry with status
    /// "selected". An invariant violation on the server side, reported
    /// rather than silently resolved.
    ConflictingSelection { count: usize },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch { message } => write!(f, "profile sync failed: {}", message),
            Self::Session(err) => write!(f, "session expired during profile sync: {}", err),
            Self::ConflictingSelection { count } => write!(
                f,
                "minor history reports {} simultaneously selected minors",
                count
            ),
        }
    }
}

impl std::error::Error for SyncError {}

/// Reconciles `/api/auth/me` and `/api/minors/my/history` into the shared
/// profile store.
pub struct ProfileSync {
    store: Arc<ProfileStore>,
}

impl ProfileSync {
    pub fn new(store: Arc<ProfileStore>) -> Self {
        Self { store }
    }

    pub fn profile(&self) -> OnboardingProfile {
        self.store.get()
    }

    /// Fetches the profile and fully replaces the gate's inputs.
    ///
    /// Must run after initial load with a stored credential, after login,
    /// and after a specialty or minor change. Idempotent against an
    /// unchanged server profile.
    pub async fn sync(&self, client: &ApiClient) -> Result<OnboardingProfile, SyncError> {
        let me = match client.me().await {
            Ok(me) => me,
            Err(err) => return Err(self.classify(err)),
        };
        let history = match client.minor_history().await {
            Ok(history) => history,
            Err(err) => return Err(self.classify(err)),
        };

        let verified = Field::Value(me.is_active);
        let specialty = Field::from(me.specialization_id);

        let minor = match selected_minor(&history) {
            Ok(minor) => minor,
            Err(err) => {
                // The identity and specialty answers are still good; apply
                // them and leave the minor at its prior value.
                let mut profile = self.store.get();
                profile.verified = verified;
                profile.specialty = specialty;
                self.store.set(profile);
                return Err(err);
            }
        };

        let profile = OnboardingProfile {
            verified,
            specialty,
            minor,
        };
        self.store.set(profile);
        Ok(profile)
    }

    fn classify(&self, err: ApiError) -> SyncError {
        if err.is_session_fatal() {
            SyncError::Session(err)
        } else {
            tracing::warn!(error = %err, "profile fetch failed; keeping prior profile");
            SyncError::Fetch {
                message: err.to_string(),
            }
        }
    }
}

/// Picks the currently selected minor out of the history.
///
/// Exactly one entry may carry status "selected"; none means the minor
/// step is still pending, more than one is a server invariant violation.
fn selected_minor(history: &[MinorHistoryEntry]) -> Result<Field<u64>, SyncError> {
    let selected: Vec<&MinorHistoryEntry> =
        history.iter().filter(|e| e.is_selected()).collect();

    match selected.as_slice() {
        [] => Ok(Field::Unset),
        [only] => Ok(Field::Value(only.minor_id)),
        many => Err(SyncError::ConflictingSelection { count: many.len() }),
    }
}
