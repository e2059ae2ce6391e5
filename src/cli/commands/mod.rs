pub mod auth;
pub mod onboarding;
pub mod progress;

use anyhow::anyhow;

use orbita::api::ApiError;

/// Maps a pipeline error onto a user-facing failure.
///
/// Session-fatal errors point the user back at the authentication entry
/// point; everything else surfaces as-is.
pub fn report(err: ApiError) -> anyhow::Error {
    if err.is_session_fatal() {
        anyhow!("Session expired ({}). Run `orbita login` to sign in again.", err)
    } else {
        anyhow::Error::new(err)
    }
}
