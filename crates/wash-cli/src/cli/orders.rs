use super::explain;
use clap::{Args, Subcommand};
use wash_cli::{render, App};
use wash_core::{Account, Review};

pub(crate) const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: Option<OrdersSubcommand>,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List orders, current first (default)
    List {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        size: u32,
    },
    /// Cancel an open order
    Cancel {
        /// Request id shown in the listing
        request_id: i64,
    },
    /// Rate a completed order
    Review {
        request_id: i64,
        /// 1 to 5 stars
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
        /// Optional comment
        #[arg(default_value = "")]
        comment: String,
    },
}

pub(crate) async fn run(app: &App, command: OrdersCommand) -> anyhow::Result<()> {
    let account = Account::new(app.ctx.clone());
    match command.command {
        None => list(app, 1, DEFAULT_PAGE_SIZE).await,
        Some(OrdersSubcommand::List { page, size }) => list(app, page, size).await,
        Some(OrdersSubcommand::Cancel { request_id }) => account.cancel_order(request_id).await.map_err(explain),
        Some(OrdersSubcommand::Review {
            request_id,
            rating,
            comment,
        }) => account
            .add_review(request_id, Review::new(rating, comment))
            .await
            .map_err(explain),
    }
}

/// Print one page, current orders before closed ones
pub(crate) async fn list(app: &App, page: u32, size: u32) -> anyhow::Result<()> {
    let orders = Account::new(app.ctx.clone())
        .orders(page, size)
        .await
        .map_err(explain)?;
    let (current, closed) = orders.partition();
    let lang = app.language();

    println!("Current orders ({})", current.len());
    for order in current {
        println!("  {}", render::order(order, lang));
    }
    println!("Closed orders ({})", closed.len());
    for order in closed {
        println!("  {}", render::order(order, lang));
    }
    if let Some(total) = orders.total_pages {
        println!("page {} of {}", page.max(1), total);
    }
    Ok(())
}
