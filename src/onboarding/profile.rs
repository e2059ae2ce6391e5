//! Onboarding profile with explicit three-state fields.

use std::sync::RwLock;

/// A profile attribute that distinguishes "not yet fetched" from
/// "fetched and absent".
///
/// `Unknown` suppresses gate decisions until the attribute resolves;
/// `Unset` is a confirmed absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<T> {
    Unknown,
    Unset,
    Value(T),
}

impl<T> Field<T> {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Field::Unknown)
    }

    /// Returns the contained value, if resolved to one.
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    /// Maps a server-reported optional onto a resolved field.
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => Field::Value(v),
            None => Field::Unset,
        }
    }
}

/// Inputs of the onboarding gate, populated by profile sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingProfile {
    /// Whether the user is a verified student of the platform.
    pub verified: Field<bool>,
    /// Chosen main specialization.
    pub specialty: Field<u64>,
    /// Chosen minor (orbit).
    pub minor: Field<u64>,
}

impl OnboardingProfile {
    /// The initial state: everything pending fetch.
    pub fn unknown() -> Self {
        Self {
            verified: Field::Unknown,
            specialty: Field::Unknown,
            minor: Field::Unknown,
        }
    }

    /// The unauthenticated state used after logout or session teardown.
    /// Distinct from `unknown()`: absence here is confirmed, not pending.
    pub fn unauthenticated() -> Self {
        Self {
            verified: Field::Unset,
            specialty: Field::Unset,
            minor: Field::Unset,
        }
    }
}

impl Default for OnboardingProfile {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Shared, mutable holder for the current profile.
///
/// Mirrors the token store's discipline: snapshots out, whole-value swaps
/// in, so readers never observe a half-updated profile.
#[derive(Default)]
pub struct ProfileStore {
    inner: RwLock<OnboardingProfile>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> OnboardingProfile {
        *self
            .inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub fn set(&self, profile: OnboardingProfile) {
        *self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = profile;
    }

    /// Resets to the unauthenticated state (logout, session teardown).
    pub fn reset(&self) {
        self.set(OnboardingProfile::unauthenticated());
    }
}
