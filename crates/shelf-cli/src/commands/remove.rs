use crate::commands::common::{confirm, Context};
use crate::error::CliError;

pub async fn run(name: &str, yes: bool) -> Result<(), CliError> {
    let ctx = Context::load()?;

    if !yes && !confirm(&format!("Delete '{name}' from the server and this machine?"))? {
        return Err(CliError::Aborted);
    }

    // Uninstall and drop the cache even when the server copy is already
    // gone, so a half-deleted script can be cleaned up by re-running.
    let client = ctx.client()?;
    match ctx.reconciler(&client).delete(name).await {
        Ok(()) => {}
        Err(shelf_core::Error::NotFound(_)) => {
            ctx.cache.remove(name)?;
        }
        Err(error) => return Err(error.into()),
    }

    ctx.installer.uninstall(name)?;
    println!("Removed {name}");
    Ok(())
}
