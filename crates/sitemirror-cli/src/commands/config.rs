use anyhow::{Result, bail};
use sitemirror_core::config::ClientConfig;
use sitemirror_infrastructure::ConfigService;

pub fn show(config: &ClientConfig) -> Result<()> {
    println!("base_url                = {}", config.base_url);
    println!("session_cookie_name     = {}", config.session_cookie_name);
    println!("chat_poll_interval_secs = {}", config.chat_poll_interval_secs);
    println!("base_site               = {}", config.base_site);
    println!("log_level               = {}", config.log_level);
    Ok(())
}

pub fn set_base_url(service: &ConfigService, mut config: ClientConfig, url: &str) -> Result<()> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        bail!("Base URL must start with http:// or https://");
    }
    config.base_url = url.trim_end_matches('/').to_string();
    service.save(&config)?;
    println!("Base URL set to {}", config.base_url);
    Ok(())
}
