use chrono::Utc;
use serde::Serialize;
use shelf_core::models::CachedScript;
use shelf_core::sync::{script_statuses, ScriptState, ScriptStatus};

use crate::commands::common::{format_relative_time, Context};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct StatusItem {
    name: String,
    state: String,
    #[serde(rename = "type")]
    script_type: String,
    description: Option<String>,
    cached: bool,
    installed: bool,
    dirty: bool,
    on_server: Option<bool>,
    updated_at: i64,
}

pub async fn run(as_json: bool) -> Result<(), CliError> {
    let ctx = Context::load()?;
    let statuses = gather_statuses(&ctx).await?;

    if as_json {
        let items: Vec<StatusItem> = statuses.iter().map(to_item).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if statuses.is_empty() {
        println!("No scripts yet. Try `shelf add <name>`.");
        return Ok(());
    }

    let now_ms = Utc::now().timestamp_millis();
    for status in &statuses {
        println!("{}", format_line(status, now_ms));
    }
    Ok(())
}

async fn gather_statuses(ctx: &Context) -> Result<Vec<ScriptStatus>, CliError> {
    let cached: Vec<CachedScript> = ctx.cache.list();

    // Without credentials the listing degrades to the cache-only view
    // instead of failing.
    match ctx.client() {
        Ok(client) => Ok(ctx.reconciler(&client).script_statuses(&ctx.installer).await),
        Err(CliError::NotConfigured) => Ok(script_statuses(&cached, None, &ctx.installer)),
        Err(error) => Err(error),
    }
}

fn state_label(state: ScriptState) -> &'static str {
    match state {
        ScriptState::NotSynced => "not synced",
        ScriptState::Modified => "modified",
        ScriptState::LocalOnly => "local only",
        ScriptState::Installed => "installed",
        ScriptState::Cached => "cached",
    }
}

fn format_line(status: &ScriptStatus, now_ms: i64) -> String {
    let label = format!("[{}]", state_label(status.state()));
    let relative = format_relative_time(status.updated_at, now_ms);
    let description = status.description.as_deref().unwrap_or("");
    format!(
        "{:<20} {label:<12} {:<11} {relative:<10} {description}",
        status.name,
        status.script_type.as_str()
    )
    .trim_end()
    .to_string()
}

fn to_item(status: &ScriptStatus) -> StatusItem {
    StatusItem {
        name: status.name.clone(),
        state: state_label(status.state()).to_string(),
        script_type: status.script_type.to_string(),
        description: status.description.clone(),
        cached: status.cached,
        installed: status.installed,
        dirty: status.dirty,
        on_server: status.on_server,
        updated_at: status.updated_at,
    }
}
