//! velo-console - headless operator console for traffic-camera evidence
//!
//! Thin CLI over the console core: log in, browse the cruise catalog and
//! photo listings, resume the last saved filter. The review workflow itself
//! is exposed as a library for the interactive frontend.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use velo_common::config::{resolve_config, LockConflictPolicy};
use velo_console::controllers::ListingController;
use velo_console::services::{ApiGateway, AuthClient, CruiseClient, PhotosClient};
use velo_console::store::SessionStore;

#[derive(Parser)]
#[command(name = "velo-console", version, about = "Traffic-camera evidence review console")]
struct Cli {
    /// API gateway base URL (overrides env and config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Session store path (overrides env and config file)
    #[arg(long)]
    store: Option<String>,

    /// Lock conflict behavior: abort | readonly
    #[arg(long)]
    lock_conflict: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and persist the session tokens
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "VELO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// List camera sites (cruises)
    Cruises,
    /// List photos for a cruise and date
    List {
        #[arg(long)]
        cruise: i64,
        /// YYYY-MM-DD or DD/MM/YYYY
        #[arg(long)]
        date: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Re-run the last saved listing filter
    Resume,
    /// List discard reason codes
    Reasons,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting velo-console v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    let lock_policy = cli
        .lock_conflict
        .as_deref()
        .map(str::parse::<LockConflictPolicy>)
        .transpose()?;
    let config = resolve_config(cli.api_url.as_deref(), cli.store.as_deref(), lock_policy)?;

    let store = SessionStore::open(&config.store_path).await?;
    let gateway = ApiGateway::new(config.api_base_url.clone(), store.clone())?;

    match cli.command {
        Command::Login { username, password } => {
            let response = AuthClient::new(&gateway).login(&username, &password).await?;
            println!("Logged in as {} <{}>", response.username, response.email);
        }
        Command::Cruises => {
            let cruises = CruiseClient::new(&gateway).list().await?;
            for cruise in cruises {
                println!("{:>6}  {}", cruise.id, cruise.cruise_name);
            }
        }
        Command::List { cruise, date, page } => {
            let mut listing = ListingController::new(PhotosClient::new(&gateway), store);
            listing.search(cruise, &date).await?;
            if page > 1 {
                listing.go_to_page(page).await?;
            }
            print_listing(&listing);
        }
        Command::Resume => {
            let mut listing = ListingController::new(PhotosClient::new(&gateway), store);
            if listing.resume().await? {
                print_listing(&listing);
            } else {
                println!("No saved filter to resume");
            }
        }
        Command::Reasons => {
            let reasons = PhotosClient::new(&gateway).rejection_reasons().await?;
            for reason in reasons {
                println!("{:>6}  {}", reason.id, reason.description);
            }
        }
    }

    Ok(())
}

fn print_listing<C: velo_console::controllers::PhotoCatalog>(listing: &ListingController<C>) {
    if let Some(message) = listing.empty_message() {
        println!("{message}");
        return;
    }
    println!("Page {}", listing.page());
    for photo in listing.photos() {
        println!("{:>8}  {}  {}", photo.id, photo.photo_date, photo.photo_status);
    }
}
