use shelf_core::models::validate_content_size;

use crate::commands::common::{capture_editor_input, Context};
use crate::error::CliError;

pub async fn run(name: &str, local: bool) -> Result<(), CliError> {
    let ctx = Context::load()?;

    // Always start from the server's latest copy so a remote edit is on
    // screen before the editor opens; this is also how a conflicted
    // script gets resolved, since the refresh takes the server's side.
    // `--local` edits the cached copy as-is, offline.
    if !local {
        let client = ctx.client()?;
        ctx.reconciler(&client).refresh_script(name).await?;
    }

    let Some(cached) = ctx.cache.get(name) else {
        return Err(shelf_core::Error::NotFound(name.to_string()).into());
    };

    let Some(edited) = capture_editor_input(&cached.content)? else {
        return Err(CliError::EmptyContent);
    };

    if edited == cached.content {
        println!("No changes");
        return Ok(());
    }
    validate_content_size(&edited)?;

    ctx.cache.update_content(name, &edited)?;
    if local {
        println!("Edited {name} (kept local; `shelf push {name}` to publish)");
        return Ok(());
    }

    let client = ctx.client()?;
    match ctx.reconciler(&client).push_script(name).await {
        Ok(()) => println!("Edited and pushed {name}"),
        Err(error) => {
            // The edit is safe in the cache; pushing can be retried.
            eprintln!("Edit saved locally, but the push failed: {error}");
            eprintln!("Run `shelf push {name}` to retry.");
        }
    }
    Ok(())
}
