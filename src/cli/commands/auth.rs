//! Auth command handlers.

use anyhow::Result;

use orbita::auth::mask_token;

use super::{onboarding, report};
use crate::cli::App;

pub async fn login(app: &App, email: &str, password: &str) -> Result<()> {
    let session = app.client.login(email, password).await.map_err(report)?;

    let access = session.access_token.as_deref().unwrap_or_default();
    println!("✓ Logged in as {} (token: {})", email, mask_token(access));

    onboarding::print_next_step(app).await;
    Ok(())
}

pub async fn register(app: &App, email: &str, full_name: &str, password: &str) -> Result<()> {
    let session = app
        .client
        .register(email, full_name, password)
        .await
        .map_err(report)?;

    let access = session.access_token.as_deref().unwrap_or_default();
    println!("✓ Registered {} (token: {})", email, mask_token(access));

    onboarding::print_next_step(app).await;
    Ok(())
}

pub fn logout(app: &App) -> Result<()> {
    let had_session = app.store.get().is_authenticated();
    app.store.clear()?;
    app.profile.reset();

    if had_session {
        println!("✓ Logged out");
    } else {
        println!("Not logged in (no credentials found).");
    }
    Ok(())
}
