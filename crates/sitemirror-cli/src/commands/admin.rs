use anyhow::Result;
use sitemirror_application::{AppContext, Confirmation};
use sitemirror_core::session::Role;
use sitemirror_core::validation::NewUser;
use std::path::Path;

use super::report;

pub async fn stats(context: &AppContext) -> Result<()> {
    let dashboard = context.admin().dashboard().await?;
    println!("Pages:    {}", dashboard.stats.pages_count);
    println!("Versions: {}", dashboard.stats.versions_count);
    println!("Size:     {:.2} MB", dashboard.stats.site_size_mb);
    if !dashboard.users.is_empty() {
        println!();
        for user in &dashboard.users {
            println!("{:<16} {:<14} {}", user.username, user.role.label(), user.created_at);
        }
    }
    Ok(())
}

pub async fn create_user(
    context: &AppContext,
    username: String,
    password: String,
    role: Role,
    confirmation: &dyn Confirmation,
) -> Result<()> {
    let user = NewUser::new(username, password, role);
    report(context.admin().create_user(user, confirmation).await)
}

pub async fn cleanup(context: &AppContext, confirmation: &dyn Confirmation) -> Result<()> {
    report(context.admin().cleanup(confirmation).await)
}

pub async fn crawl(context: &AppContext, confirmation: &dyn Confirmation) -> Result<()> {
    report(context.admin().force_crawl(confirmation).await)
}

pub async fn backup(context: &AppContext, out: &Path) -> Result<()> {
    report(context.admin().download_backup(out).await)
}
