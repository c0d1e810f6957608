use clap::{Parser, Subcommand};
use std::sync::Arc;
use wash_cli::{App, ConsoleNotifier};
use wash_core::{BookingError, Language, Route};

mod auth;
mod book;
mod cart;
mod orders;
mod providers;
mod slots;

#[derive(Debug, Parser)]
#[command(name = "carwash", about = "Carwash booking client", version, long_about = None)]
pub(crate) struct Cli {
    /// Display language (ar or en), overrides CARWASH_LANGUAGE
    #[arg(long, global = true)]
    lang: Option<Language>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Request a verification code
    Login(auth::LoginArgs),
    /// Confirm the verification code and store the session
    Verify(auth::VerifyArgs),
    /// Forget the stored session
    Logout,
    /// Browse service providers
    Providers(providers::ProvidersCommand),
    /// List or edit the cart
    Cart(cart::CartCommand),
    /// Show open slots of a provider
    Slots(slots::SlotsArgs),
    /// Book a cart item and pay
    Book(book::BookArgs),
    /// List, cancel or review orders
    Orders(orders::OrdersCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> anyhow::Result<()> {
        let mut app = App::from_env()?;
        if let Some(lang) = self.lang {
            app.config.language = lang;
            app.ctx.language = lang;
        }
        app.ctx.notifier = Arc::new(ConsoleNotifier);

        match self.command {
            Commands::Login(args) => auth::login(&app, args).await,
            Commands::Verify(args) => auth::verify(&app, args).await,
            Commands::Logout => auth::logout(&app),
            Commands::Providers(command) => providers::run(&app, command).await,
            Commands::Cart(command) => cart::run(&app, command).await,
            Commands::Slots(args) => slots::run(&app, args).await,
            Commands::Book(args) => book::run(&app, args).await,
            Commands::Orders(command) => orders::run(&app, command).await,
        }
    }
}

/// Attach a hint for errors that send the user elsewhere
pub(crate) fn explain(err: BookingError) -> anyhow::Error {
    match err.fallback_route() {
        Some(Route::Login) => anyhow::anyhow!("{}; run `carwash login <phone>` first", err),
        _ => anyhow::Error::new(err),
    }
}
