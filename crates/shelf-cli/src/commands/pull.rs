use crate::commands::common::{print_outcome, Context};
use crate::error::CliError;

pub async fn run(name: Option<&str>) -> Result<(), CliError> {
    let ctx = Context::load()?;
    let client = ctx.client()?;
    let reconciler = ctx.reconciler(&client);

    if let Some(name) = name {
        // A single pull always takes the server's copy, local edits
        // included.
        reconciler.pull_script(name).await?;
        println!("pulled   {name}");
        return Ok(());
    }

    let outcome = reconciler.pull_all().await?;
    print_outcome(&outcome);
    Ok(())
}
