use std::process::Command;

use shelf_core::models::ScriptType;

use crate::commands::common::Context;
use crate::error::CliError;

/// Run a cached script through bash, forwarding arguments and the exit
/// status. Pulls the script first when it is not cached.
pub async fn run(name: &str, args: &[String]) -> Result<(), CliError> {
    let ctx = Context::load()?;

    if !ctx.cache.exists(name) {
        let client = ctx.client()?;
        ctx.reconciler(&client).pull_script(name).await?;
    }

    let Some(cached) = ctx.cache.get(name) else {
        return Err(shelf_core::Error::NotFound(name.to_string()).into());
    };
    if cached.script_type != ScriptType::Executable {
        eprintln!(
            "Note: '{name}' is a {} script; running it in a subshell \
             will not affect your current shell.",
            cached.script_type
        );
    }

    let status = Command::new("bash")
        .arg(ctx.cache.content_path(name))
        .args(args)
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(CliError::ScriptFailed(
            name.to_string(),
            status.code().unwrap_or(1),
        ))
    }
}
