pub mod account;
pub mod admin;
pub mod audit;
pub mod browse;
pub mod chat;
pub mod config;
pub mod prompt;

use anyhow::{Result, bail};
use sitemirror_application::ActionOutcome;

/// Prints the outcome of a guarded action; a failure becomes the command's error.
pub fn report(outcome: ActionOutcome) -> Result<()> {
    match outcome {
        ActionOutcome::Cancelled => println!("Cancelled."),
        ActionOutcome::Completed(notice) => println!("{}", notice.message),
        ActionOutcome::Failed(notice) => bail!("{}", notice.message),
    }
    Ok(())
}
