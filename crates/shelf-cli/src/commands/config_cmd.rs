use chrono::{TimeZone, Utc};
use shelf_core::config::last_sync_timestamp;

use crate::commands::common::Context;
use crate::error::CliError;

pub fn show() -> Result<(), CliError> {
    let ctx = Context::load()?;

    println!("server_url  {}", ctx.config.server_url);
    println!(
        "api_key     {}",
        if ctx.config.api_key.is_some() {
            "set"
        } else {
            "not set"
        }
    );
    println!("device_id   {}", ctx.config.device_id);
    println!("base_dir    {}", ctx.paths.base_dir.display());

    let last_sync = last_sync_timestamp(&ctx.paths);
    if last_sync > 0 {
        let formatted = Utc
            .timestamp_millis_opt(last_sync)
            .single()
            .map_or_else(|| last_sync.to_string(), |dt| dt.to_rfc3339());
        println!("last_sync   {formatted}");
    } else {
        println!("last_sync   never");
    }
    Ok(())
}

pub fn set_url(url: &str) -> Result<(), CliError> {
    let mut ctx = Context::load()?;
    ctx.config.set_server_url(url)?;
    ctx.config.save(&ctx.paths)?;
    println!("Server URL set to {}", ctx.config.server_url);
    Ok(())
}

pub fn path() -> Result<(), CliError> {
    let ctx = Context::load()?;
    println!("{}", ctx.paths.base_dir.display());
    Ok(())
}
