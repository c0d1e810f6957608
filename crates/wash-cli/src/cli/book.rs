use super::{explain, orders};
use anyhow::bail;
use clap::Args;
use std::time::Duration;
use tracing::{debug, warn};
use wash_cli::{render, App, RedirectListener};
use wash_core::{BookingSession, Route};

#[derive(Debug, Args)]
pub(crate) struct BookArgs {
    /// Invoice id of the cart entry to book
    invoice_id: i64,

    /// Car id; defaults to the first car on file
    #[arg(long)]
    car: Option<i64>,

    /// Address id; defaults to the first saved address
    #[arg(long)]
    address: Option<i64>,

    /// Slot id; defaults to the earliest open slot
    #[arg(long)]
    slot: Option<i64>,

    /// Discount code to apply before paying
    #[arg(long)]
    discount: Option<String>,

    /// Reserve the slot before paying
    #[arg(long)]
    lock: bool,

    /// Accept the terms and conditions
    #[arg(long)]
    agree_terms: bool,

    /// How long to wait for the payment redirect
    #[arg(long, default_value_t = 600)]
    wait_secs: u64,
}

pub(crate) async fn run(app: &App, args: BookArgs) -> anyhow::Result<()> {
    let lang = app.language();
    let mut session = BookingSession::load(app.ctx.clone(), args.invoice_id)
        .await
        .map_err(explain)?;
    session.mount().await.map_err(explain)?;

    if let Some(id) = args.car {
        session.select_car(id);
    }
    if let Some(id) = args.address {
        session.select_address(id);
    }
    if let Some(id) = args.slot {
        session.select_slot(id);
    }

    let options = session.options();
    println!("Cars");
    print!("{}", render::cars(&options.cars, session.selection().car_id()));
    println!("Addresses");
    print!("{}", render::addresses(&options.addresses, session.selection().address_id()));
    println!("Slots");
    print!(
        "{}",
        render::slot_days(&session.slot_days(), session.selection().slot_id(), session.slot_lock(), lang)
    );

    if args.lock {
        // Locking is advisory; payment re-checks the slot
        if let Err(e) = session.lock_slot().await {
            warn!(error = %e, "slot lock failed, continuing");
        }
    }
    if let Some(code) = args.discount.as_deref() {
        if let Err(e) = session.apply_discount(code).await {
            debug!(error = %e, "discount not applied");
        }
    }

    println!();
    print!("{}", render::breakdown(&session.breakdown(), session.selection().discount(), lang));

    if args.agree_terms && !session.selection().terms_agreed() {
        session.toggle_terms_agreed();
    }

    let mut listener = RedirectListener::bind(app.config.callback_addr, lang).await?;
    let route = session.confirm().await;
    session.teardown();
    let route = route.map_err(explain)?;

    let outcome = match route {
        Route::PaymentPage(url) => {
            println!();
            println!("Open the payment page to finish:");
            println!("  {}", url);
            println!("Waiting for the redirect to {} or {}", listener.success_url(), listener.failure_url());
            listener.wait(Duration::from_secs(args.wait_secs)).await
        }
        other => Some(other),
    };
    listener.shutdown().await;

    match outcome {
        Some(Route::Orders) => orders::list(app, 1, orders::DEFAULT_PAGE_SIZE).await,
        Some(Route::PaymentFailed) => bail!("payment failed"),
        Some(other) => bail!("unexpected outcome: {:?}", other),
        None => bail!("no payment result within {}s", args.wait_secs),
    }
}
