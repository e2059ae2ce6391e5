//! The onboarding gate: a pure decision over the profile.
//!
//! Ordering is fixed: identity, then specialty, then minor. A user can
//! never reach the dashboard while an earlier field is unresolved.

use super::profile::{Field, OnboardingProfile};

/// Onboarding steps and the feature area behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Auth,
    SpecialtyStep,
    MinorStep,
    Dashboard,
}

impl Route {
    /// The URL path the route maps to in the hosted web app; used for
    /// display in the CLI.
    pub fn as_path(&self) -> &'static str {
        match self {
            Route::Auth => "/onboarding/auth",
            Route::SpecialtyStep => "/onboarding/specialty",
            Route::MinorStep => "/onboarding/minor",
            Route::Dashboard => "/dashboard",
        }
    }
}

/// Outcome of evaluating the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// An input is still unknown; render loading, decide nothing.
    Loading,
    /// The step the user must be on.
    Target(Route),
}

/// Computes the mandatory step from profile completeness.
pub fn decide(profile: &OnboardingProfile) -> GateDecision {
    let verified = match profile.verified {
        Field::Unknown => return GateDecision::Loading,
        Field::Unset | Field::Value(false) => false,
        Field::Value(true) => true,
    };
    if !verified {
        return GateDecision::Target(Route::Auth);
    }

    match profile.specialty {
        Field::Unknown => return GateDecision::Loading,
        Field::Unset => return GateDecision::Target(Route::SpecialtyStep),
        Field::Value(_) => {}
    }

    match profile.minor {
        Field::Unknown => GateDecision::Loading,
        Field::Unset => GateDecision::Target(Route::MinorStep),
        Field::Value(_) => GateDecision::Target(Route::Dashboard),
    }
}

/// Returns the route to force-navigate to, if the current route differs
/// from the gate's target. Once all conditions hold the gate never
/// redirects away from the dashboard.
pub fn redirect(current: Route, profile: &OnboardingProfile) -> Option<Route> {
    match decide(profile) {
        GateDecision::Loading => None,
        GateDecision::Target(target) if target == current => None,
        GateDecision::Target(target) => Some(target),
    }
}
