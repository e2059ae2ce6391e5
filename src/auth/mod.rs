//! Session credentials: persisted token store and the refresh protocol.

pub mod refresh;
pub mod session;

pub use session::{Session, TokenStore};

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 16 {
        return "***".to_string();
    }
    let prefix: String = token.chars().take(12).collect();
    format!("{}...", prefix)
}
