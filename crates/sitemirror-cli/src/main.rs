use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sitemirror_application::{AppContext, AutoConfirm, Confirmation};
use sitemirror_core::session::Role;
use sitemirror_infrastructure::{ConfigService, MirrorPaths};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::prompt::StdinConfirmation;

#[derive(Parser)]
#[command(name = "sitemirror")]
#[command(about = "SiteMirror CLI - browse and administer a mirrored website", long_about = None)]
struct Cli {
    /// Directory holding config.toml and session.toml
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Mirror server origin for this invocation only
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Home statistics and pending updates
    Home,
    /// List mirrored pages
    Pages {
        /// Case-insensitive URL filter
        filter: Option<String>,
    },
    /// Print a page as rendered by the viewer
    View { url: String },
    /// Print the stored source of a page
    Raw { url: String },
    /// Save a stored page to disk
    Download {
        url: String,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Search the mirror
    Search { query: String },
    /// Check for or apply updates
    Updates {
        #[arg(long)]
        apply: bool,
    },
    /// Show the audit log
    Audit,
    /// Read or post chat messages
    Chat {
        #[command(subcommand)]
        action: ChatAction,
    },
    /// Administrator actions
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Change your password
    Passwd {
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
    /// Show or edit the client configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ChatAction {
    /// Print the current messages
    Show,
    /// Post a message
    Send { message: String },
    /// Follow the chat until Ctrl-C
    Watch,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Dashboard statistics and accounts
    Stats,
    /// Create an account
    CreateUser {
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "user")]
        role: Role,
    },
    /// Remove old page versions
    Cleanup,
    /// Re-crawl the whole site
    Crawl,
    /// Download the backup archive
    Backup {
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Persist a new server origin
    SetBaseUrl { url: String },
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = MirrorPaths::new(cli.config_dir.as_deref())
        .context("Failed to resolve the configuration directory")?;
    let config_service = ConfigService::new(&paths);
    let mut config = config_service.load()?;
    init_tracing(&config.log_level);

    let command = match cli.command {
        Commands::Config { action } => {
            return match action {
                ConfigAction::Show => commands::config::show(&config),
                ConfigAction::SetBaseUrl { url } => {
                    commands::config::set_base_url(&config_service, config, &url)
                }
            };
        }
        command => command,
    };

    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    let context = AppContext::with_config(&paths, config)?;
    let confirmation: Box<dyn Confirmation> = if cli.yes {
        Box::new(AutoConfirm)
    } else {
        Box::new(StdinConfirmation)
    };

    run(command, &context, confirmation.as_ref()).await
}

async fn run(command: Commands, context: &AppContext, confirmation: &dyn Confirmation) -> Result<()> {
    match command {
        Commands::Login { username, password } => {
            commands::account::login(context, &username, &password).await?
        }
        Commands::Logout => commands::account::logout(context, confirmation).await?,
        Commands::Whoami => commands::account::whoami(context).await?,
        Commands::Passwd { old, new, confirm } => {
            commands::account::change_password(context, old, new, confirm, confirmation).await?
        }
        Commands::Home => commands::browse::home(context).await?,
        Commands::Pages { filter } => commands::browse::pages(context, filter.as_deref()).await?,
        Commands::View { url } => commands::browse::view(context, &url).await?,
        Commands::Raw { url } => commands::browse::raw(context, &url).await?,
        Commands::Download { url, out } => {
            commands::browse::download(context, &url, &out, confirmation).await?
        }
        Commands::Search { query } => commands::browse::search(context, &query).await?,
        Commands::Updates { apply } => commands::browse::updates(context, apply, confirmation).await?,
        Commands::Audit => commands::audit::show(context).await?,
        Commands::Chat { action } => match action {
            ChatAction::Show => commands::chat::show(context).await?,
            ChatAction::Send { message } => commands::chat::send(context, &message).await?,
            ChatAction::Watch => commands::chat::watch(context).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Stats => commands::admin::stats(context).await?,
            AdminAction::CreateUser {
                username,
                password,
                role,
            } => commands::admin::create_user(context, username, password, role, confirmation).await?,
            AdminAction::Cleanup => commands::admin::cleanup(context, confirmation).await?,
            AdminAction::Crawl => commands::admin::crawl(context, confirmation).await?,
            AdminAction::Backup { out } => commands::admin::backup(context, &out).await?,
        },
        // handled in main before the context exists
        Commands::Config { .. } => {}
    }

    Ok(())
}
