//! Session commands.

use anyhow::Result;
use serde_json::json;

use super::{SessionArgs, SessionCommand};
use crate::context::Context;

/// Run the session command.
pub async fn run(args: SessionArgs, ctx: &Context) -> Result<()> {
    match args.command.unwrap_or(SessionCommand::Show) {
        SessionCommand::Show => show_session(ctx),
        SessionCommand::New => new_session(ctx),
        SessionCommand::End => end_session(ctx),
    }
}

fn show_session(ctx: &Context) -> Result<()> {
    let store = ctx.cart_store()?;
    let session = ctx.current_session()?;
    let summary = store.summary();
    let storage = ctx.session_storage(&session)?;
    let used = storage.used_bytes()?;
    let quota = storage.quota_bytes();

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "session": session.as_str(),
            "storage": ctx.storage_dir(),
            "used_bytes": used,
            "quota_bytes": quota,
            "summary": summary,
        }));
        return Ok(());
    }

    ctx.output.header("Session");
    ctx.output.kv("ID", session.as_str());
    ctx.output.kv("Storage", &ctx.storage_dir().display().to_string());
    ctx.output.kv("Used", &usage(used, quota));
    ctx.output.kv("Items", &summary.total_items.to_string());
    ctx.output.kv("Total", &summary.total_price.display());
    Ok(())
}

fn usage(used: usize, quota: Option<usize>) -> String {
    match quota {
        Some(quota) => format!("{} of {} bytes", used, quota),
        None => format!("{} bytes", used),
    }
}

fn new_session(ctx: &Context) -> Result<()> {
    let session = ctx.start_session()?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "session": session.as_str() }));
        return Ok(());
    }

    ctx.output.success(&format!("Started session {}", session));
    Ok(())
}

fn end_session(ctx: &Context) -> Result<()> {
    let Some(session) = ctx.active_session()? else {
        ctx.output.info("No active session.");
        return Ok(());
    };

    ctx.session_storage(&session)?.end_session()?;
    ctx.forget_session(&session)?;
    tracing::debug!(%session, "session ended");

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "ended": session.as_str() }));
        return Ok(());
    }

    ctx.output.success(&format!("Ended session {}; cart discarded", session));
    Ok(())
}
