//! Onboarding command handlers: status, specialty and minor selection.

use anyhow::Result;

use orbita::onboarding::{Field, GateDecision, Route, SyncError, gate};

use super::report;
use crate::cli::App;

pub async fn status(app: &App) -> Result<()> {
    if !app.store.get().is_authenticated() {
        println!("Not logged in. Run `orbita login` to sign in.");
        return Ok(());
    }

    sync_or_report(app).await?;

    let profile = app.profile.get();
    println!("Verified student: {}", describe_bool(profile.verified));
    println!("Specialization:   {}", describe_id(profile.specialty));
    println!("Minor (orbit):    {}", describe_id(profile.minor));
    print_decision(gate::decide(&profile));
    Ok(())
}

pub async fn specialty_list(app: &App) -> Result<()> {
    let specialties = app.client.specializations().await.map_err(report)?;
    for s in specialties {
        match s.description {
            Some(d) => println!("{:>5}  {} — {}", s.id, s.name, d),
            None => println!("{:>5}  {}", s.id, s.name),
        }
    }
    Ok(())
}

pub async fn specialty_set(app: &App, id: u64) -> Result<()> {
    app.client.set_specialization(id).await.map_err(report)?;
    println!("✓ Specialization set to {}", id);
    print_next_step(app).await;
    Ok(())
}

pub async fn minor_list(app: &App) -> Result<()> {
    let minors = app.client.minors().await.map_err(report)?;
    for m in minors {
        match m.description {
            Some(d) => println!("{:>5}  {} — {}", m.id, m.name, d),
            None => println!("{:>5}  {}", m.id, m.name),
        }
    }
    Ok(())
}

pub async fn minor_select(app: &App, id: u64) -> Result<()> {
    app.client.select_minor(id).await.map_err(report)?;
    println!("✓ Minor {} selected", id);
    print_next_step(app).await;
    Ok(())
}

/// Re-syncs the profile and prints the gate's decision; sync failures are
/// reported but never fail the surrounding command.
pub async fn print_next_step(app: &App) {
    match app.sync.sync(&app.client).await {
        Ok(profile) => print_decision(gate::decide(&profile)),
        Err(err) => {
            eprintln!("warning: {}", err);
            print_decision(gate::decide(&app.profile.get()));
        }
    }
}

async fn sync_or_report(app: &App) -> Result<()> {
    match app.sync.sync(&app.client).await {
        Ok(_) => Ok(()),
        // Stale values are retained; show them alongside the warning.
        Err(err @ (SyncError::Fetch { .. } | SyncError::ConflictingSelection { .. })) => {
            eprintln!("warning: {}", err);
            Ok(())
        }
        Err(SyncError::Session(err)) => Err(report(err)),
    }
}

fn print_decision(decision: GateDecision) {
    match decision {
        GateDecision::Loading => println!("Profile still loading; try again."),
        GateDecision::Target(Route::Auth) => {
            println!("Next step: authentication (`orbita login`)");
        }
        GateDecision::Target(Route::SpecialtyStep) => {
            println!("Next step: choose a specialization (`orbita specialty set <id>`)");
        }
        GateDecision::Target(Route::MinorStep) => {
            println!("Next step: choose a minor (`orbita minor select <id>`)");
        }
        GateDecision::Target(Route::Dashboard) => {
            println!("Onboarding complete — dashboard available.");
        }
    }
}

fn describe_bool(field: Field<bool>) -> String {
    match field {
        Field::Unknown => "unknown".to_string(),
        Field::Unset | Field::Value(false) => "no".to_string(),
        Field::Value(true) => "yes".to_string(),
    }
}

fn describe_id(field: Field<u64>) -> String {
    match field {
        Field::Unknown => "unknown".to_string(),
        Field::Unset => "not chosen".to_string(),
        Field::Value(id) => id.to_string(),
    }
}
