use shelf_core::models::ScriptType;

use crate::commands::common::Context;
use crate::error::CliError;

/// Print a script body to stdout so the caller's shell can eval it:
/// `eval "$(shelf source my-aliases)"`.
pub async fn run(name: &str) -> Result<(), CliError> {
    let ctx = Context::load()?;

    if !ctx.cache.exists(name) {
        let client = ctx.client()?;
        ctx.reconciler(&client).pull_script(name).await?;
    }

    let Some(cached) = ctx.cache.get(name) else {
        return Err(shelf_core::Error::NotFound(name.to_string()).into());
    };
    if cached.script_type == ScriptType::Executable {
        eprintln!(
            "warning: {name} is an executable script; `shelf run {name}` is the usual way \
             to invoke it"
        );
    }
    println!("{}", cached.content);
    Ok(())
}
