//! Yes/no prompts

use super::context::UiContext;
use crate::error::{SyncacheError, SyncacheResult};

/// Answer that applies without asking, if any
///
/// `--yes` approves; a CI run or a pipe falls back to `default`.
fn preset_answer(ctx: &UiContext, default: bool) -> Option<bool> {
    if ctx.auto_yes() {
        Some(true)
    } else if !ctx.is_interactive() {
        Some(default)
    } else {
        None
    }
}

/// Ask a yes/no question, e.g. before deleting a post
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> SyncacheResult<bool> {
    if let Some(answer) = preset_answer(ctx, default) {
        return Ok(answer);
    }

    // Terminal input blocks
    let question = message.to_string();
    tokio::task::spawn_blocking(move || {
        cliclack::confirm(question).initial_value(default).interact()
    })
    .await
    .map_err(|e| SyncacheError::Internal(format!("Prompt task failed: {}", e)))?
    .map_err(|e| SyncacheError::User(format!("Prompt failed: {}", e)))
}
