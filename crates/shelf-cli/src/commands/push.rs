use crate::commands::common::{print_outcome, Context};
use crate::error::CliError;

pub async fn run(name: Option<&str>) -> Result<(), CliError> {
    let ctx = Context::load()?;
    let client = ctx.client()?;
    let reconciler = ctx.reconciler(&client);

    if let Some(name) = name {
        reconciler.push_script(name).await?;
        println!("pushed   {name}");
        return Ok(());
    }

    let outcome = reconciler.push_all().await?;
    if outcome.pushed.is_empty() && outcome.errors.is_empty() {
        println!("Nothing to push");
        return Ok(());
    }
    print_outcome(&outcome);
    Ok(())
}
