use anyhow::Result;
use sitemirror_application::AppContext;

pub async fn show(context: &AppContext) -> Result<()> {
    let report = context.audit().load().await?;
    println!(
        "{} entries from {} users",
        report.summary.entries, report.summary.distinct_users
    );
    for entry in &report.entries {
        let when = entry
            .parsed_timestamp()
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| entry.timestamp.clone());
        println!(
            "{when}  {:<12} {:<16} {}",
            entry.user,
            entry.action,
            entry.details_preview()
        );
    }
    Ok(())
}
