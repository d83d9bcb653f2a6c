use crate::commands::common::Context;
use crate::error::CliError;

pub async fn run(name: &str) -> Result<(), CliError> {
    let ctx = Context::load()?;

    if !ctx.cache.exists(name) {
        let client = ctx.client()?;
        ctx.reconciler(&client).pull_script(name).await?;
    }

    if !ctx.installer.install(&ctx.cache, name)? {
        return Err(shelf_core::Error::NotFound(name.to_string()).into());
    }

    println!("Installed {name}");
    crate::commands::add::print_path_hint(&ctx);
    Ok(())
}

pub fn run_uninstall(name: &str) -> Result<(), CliError> {
    let ctx = Context::load()?;
    if ctx.installer.uninstall(name)? {
        println!("Uninstalled {name} (cached copy kept)");
    } else {
        println!("{name} is not installed");
    }
    Ok(())
}
