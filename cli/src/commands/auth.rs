use anyhow::Result;
use modconsole_shared::{models::UserIdentity, Verification};
use serde_json::json;

use super::{print_json, App};

pub async fn login(app: &App, email: &str, password: &str, remember: bool) -> Result<()> {
    let identity = app
        .session
        .login(app.api.as_ref(), email, password, remember)
        .await
        .map_err(|err| {
            let message = err.user_message();
            anyhow::Error::new(err).context(message)
        })?;

    if app.session.verification() == Some(Verification::Simulated) {
        tracing::warn!("backend unreachable; simulated session lasts for this invocation only");
    }
    if app.config.json {
        return print_json(&identity);
    }
    println!("Logged in as {}", describe(&identity));
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    app.session.logout(app.api.as_ref()).await;
    match std::fs::remove_file(app.config.cookie_path()) {
        Err(err) if err.kind() != std::io::ErrorKind::NotFound => {
            tracing::warn!("failed to remove cookie file: {err}");
        },
        _ => {},
    }
    println!("Logged out.");
    Ok(())
}

pub async fn whoami(app: &App) -> Result<()> {
    let identity = app.require_session().await?;
    let verification = app.session.verification();
    if app.config.json {
        return print_json(&json!({
            "user": identity,
            "verification": verification.map(|v| format!("{v:?}").to_ascii_lowercase()),
        }));
    }
    println!("{}", describe(&identity));
    if verification == Some(Verification::Degraded) {
        println!("(backend unreachable, showing cached session)");
    }
    Ok(())
}

fn describe(identity: &UserIdentity) -> String {
    format!("{} <{}> (id {})", identity.display_name(), identity.email, identity.id)
}
