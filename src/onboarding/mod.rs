//! Onboarding state: profile fields, the routing gate and profile sync.

pub mod gate;
pub mod profile;
pub mod sync;

pub use gate::{GateDecision, Route};
pub use profile::{Field, OnboardingProfile, ProfileStore};
pub use sync::{ProfileSync, SyncError};
