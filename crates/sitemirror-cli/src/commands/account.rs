use anyhow::{Result, anyhow};
use sitemirror_application::{AppContext, Confirmation};
use sitemirror_core::validation::PasswordChange;

use super::report;

pub async fn login(context: &AppContext, username: &str, password: &str) -> Result<()> {
    let session = context
        .account()
        .login(username, password)
        .await
        .map_err(|e| anyhow!("Login failed: {}", e.message()))?;
    println!(
        "Signed in as {} ({})",
        session.user.username,
        session.user.role.label()
    );
    Ok(())
}

pub async fn logout(context: &AppContext, confirmation: &dyn Confirmation) -> Result<()> {
    report(context.account().logout(confirmation).await)
}

pub async fn whoami(context: &AppContext) -> Result<()> {
    match context.account().current_session().await {
        Some(session) => println!(
            "{} ({}) at {}",
            session.user.username,
            session.user.role.label(),
            context.client().base_url()
        ),
        None => println!("Not signed in"),
    }
    Ok(())
}

pub async fn change_password(
    context: &AppContext,
    old: String,
    new: String,
    confirm: String,
    confirmation: &dyn Confirmation,
) -> Result<()> {
    let change = PasswordChange::new(old, new, confirm);
    report(context.account().change_password(change, confirmation).await)
}
