use anyhow::Result;
use sitemirror_application::{AppContext, Confirmation};
use sitemirror_core::mirror::PageReference;
use std::path::Path;

use super::report;

pub async fn home(context: &AppContext) -> Result<()> {
    let overview = context.mirror().home().await?;
    println!("Site:    {}", overview.stats.base_site);
    println!("Pages:   {}", overview.stats.pages_count);
    if overview.updates.has_updates() {
        println!(
            "Updates: {} changed, {} new (run `sitemirror updates --apply`)",
            overview.updates.changed, overview.updates.new
        );
    } else {
        println!("Updates: none");
    }
    Ok(())
}

pub async fn pages(context: &AppContext, filter: Option<&str>) -> Result<()> {
    let pages = context.mirror().find_pages(filter.unwrap_or_default()).await?;
    print_pages(&pages);
    Ok(())
}

pub async fn view(context: &AppContext, url: &str) -> Result<()> {
    println!("{}", context.mirror().view(&PageReference::new(url)).await?);
    Ok(())
}

pub async fn raw(context: &AppContext, url: &str) -> Result<()> {
    println!("{}", context.mirror().raw(&PageReference::new(url)).await?);
    Ok(())
}

pub async fn download(
    context: &AppContext,
    url: &str,
    out: &Path,
    confirmation: &dyn Confirmation,
) -> Result<()> {
    let outcome = context
        .mirror()
        .download_page(&PageReference::new(url), out, confirmation)
        .await;
    report(outcome)
}

pub async fn search(context: &AppContext, query: &str) -> Result<()> {
    let results = context.mirror().search(query).await?;
    print_pages(&results);
    Ok(())
}

pub async fn updates(context: &AppContext, apply: bool, confirmation: &dyn Confirmation) -> Result<()> {
    let mirror = context.mirror();
    let summary = mirror.check_updates().await?;
    println!("{} changed, {} new", summary.changed, summary.new);
    if apply {
        if !summary.has_updates() {
            println!("Nothing to apply.");
            return Ok(());
        }
        report(mirror.apply_updates(confirmation).await)?;
    }
    Ok(())
}

fn print_pages(pages: &[PageReference]) {
    if pages.is_empty() {
        println!("No pages found");
        return;
    }
    for page in pages {
        println!("{page}");
    }
    println!("({} pages)", pages.len());
}
