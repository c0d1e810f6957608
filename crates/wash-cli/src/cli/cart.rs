use super::explain;
use clap::{Args, Subcommand};
use wash_cli::{render, App};
use wash_core::Account;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: Option<CartSubcommand>,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// List cart items with prices (default)
    List,
    /// Add a provider's service to the cart
    Add {
        /// Service id, as shown by `carwash providers show`
        service_id: i64,
        /// Extra service id; repeat for several
        #[arg(long = "extra", value_name = "EXTRA_ID")]
        extras: Vec<i64>,
    },
    /// Remove a service from the cart
    Remove {
        /// Invoice id of the cart entry
        invoice_id: i64,
        /// Item id inside the invoice
        item_id: i64,
    },
}

pub(crate) async fn run(app: &App, command: CartCommand) -> anyhow::Result<()> {
    let account = Account::new(app.ctx.clone());
    match command.command.unwrap_or(CartSubcommand::List) {
        CartSubcommand::List => {
            let entries = account.cart().await.map_err(explain)?;
            if entries.is_empty() {
                println!("Cart is empty");
            }
            for entry in &entries {
                println!("{}", render::cart_entry(entry, app.language()));
            }
            Ok(())
        }
        CartSubcommand::Add { service_id, extras } => {
            account.add_to_cart(service_id, extras).await.map_err(explain)
        }
        CartSubcommand::Remove { invoice_id, item_id } => {
            account.delete_cart_item(invoice_id, item_id).await.map_err(explain)
        }
    }
}
