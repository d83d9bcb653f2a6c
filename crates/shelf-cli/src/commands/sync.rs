use crate::commands::common::{print_outcome, Context};
use crate::error::CliError;

pub async fn run() -> Result<(), CliError> {
    let ctx = Context::load()?;
    let client = ctx.client()?;

    let outcome = ctx.reconciler(&client).sync_all().await?;
    print_outcome(&outcome);

    if outcome.is_clean() {
        println!("Sync complete");
    }
    Ok(())
}
