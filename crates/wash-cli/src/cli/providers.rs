use super::explain;
use clap::{Args, Subcommand};
use wash_cli::{render, App};
use wash_core::Account;

#[derive(Debug, Args)]
pub(crate) struct ProvidersCommand {
    #[command(subcommand)]
    command: Option<ProvidersSubcommand>,
}

#[derive(Debug, Subcommand)]
enum ProvidersSubcommand {
    /// List car-wash providers (default)
    List,
    /// Show a provider's services, extras and latest reviews
    Show {
        /// Service provider (brand) id
        brand_id: i64,
    },
}

pub(crate) async fn run(app: &App, command: ProvidersCommand) -> anyhow::Result<()> {
    let account = Account::new(app.ctx.clone());
    let lang = app.language();
    match command.command.unwrap_or(ProvidersSubcommand::List) {
        ProvidersSubcommand::List => {
            for provider in account.providers().await.map_err(explain)? {
                println!("{}", render::provider(&provider, lang));
            }
            Ok(())
        }
        ProvidersSubcommand::Show { brand_id } => {
            let provider = account.provider(brand_id).await.map_err(explain)?;
            println!("{}", render::provider(&provider, lang));
            if let Some(description) = provider.description(lang) {
                println!("{}", description);
            }

            println!();
            let services = account.services(brand_id).await.map_err(explain)?;
            for service in &services {
                print!("{}", render::service(service, lang));
            }

            // reviews are secondary; the toast already reported a failure
            if let Ok(reviews) = account.brand_reviews(brand_id).await {
                if !reviews.is_empty() {
                    println!();
                }
                for review in &reviews {
                    println!("{}", render::review(review));
                }
            }
            Ok(())
        }
    }
}
