use crate::commands::common::Context;
use crate::error::CliError;

pub fn set_key(key: &str) -> Result<(), CliError> {
    let mut ctx = Context::load()?;
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(shelf_core::Error::InvalidInput("API key cannot be empty".to_string()).into());
    }

    ctx.config.api_key = Some(trimmed.to_string());
    ctx.config.save(&ctx.paths)?;
    println!("API key stored");
    Ok(())
}

pub async fn status() -> Result<(), CliError> {
    let ctx = Context::load()?;
    println!("server_url  {}", ctx.config.server_url);

    if ctx.config.api_key.is_none() {
        println!("api_key     not set (run `shelf auth set-key <KEY>`)");
        return Ok(());
    }
    println!("api_key     set");

    let client = ctx.client()?;
    if client.health_check().await {
        println!("server      reachable");
    } else {
        println!("server      unreachable");
    }
    Ok(())
}
