//! Orbita CLI library.
//!
//! This module exports public APIs for testing and extension.

pub mod api;
pub mod auth;
pub mod config;
pub mod onboarding;
