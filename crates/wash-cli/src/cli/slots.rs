use super::explain;
use clap::Args;
use wash_cli::{render, App};
use wash_core::{Account, SlotLock};

#[derive(Debug, Args)]
pub(crate) struct SlotsArgs {
    /// Service provider (brand) id
    brand_id: i64,
}

pub(crate) async fn run(app: &App, args: SlotsArgs) -> anyhow::Result<()> {
    let days = Account::new(app.ctx.clone())
        .slots(args.brand_id)
        .await
        .map_err(explain)?;
    print!("{}", render::slot_days(&days, None, &SlotLock::new(), app.language()));
    Ok(())
}
