//! Status lines for command output
//!
//! Every line goes through [`status`], which picks between cliclack's
//! log widgets and a tagged plain line such as `  [OK] Saved post p1`.
//! Failures go to stderr in plain mode so piped stdout stays parseable.

use super::context::UiContext;
use console::style;

/// Outcome a status line reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Warn,
    Fail,
    Info,
    Remark,
}

impl Status {
    fn tag(self) -> Option<String> {
        let tag = match self {
            Status::Ok => style("[OK]").green(),
            Status::Warn => style("[WARN]").yellow(),
            Status::Fail => style("[FAIL]").red(),
            Status::Info => style("[INFO]").cyan(),
            Status::Remark => return None,
        };
        Some(tag.to_string())
    }
}

fn status(ctx: &UiContext, kind: Status, text: String) {
    if ctx.use_fancy_output() {
        let _ = match kind {
            Status::Ok => cliclack::log::success(text),
            Status::Warn => cliclack::log::warning(text),
            Status::Fail => cliclack::log::error(text),
            Status::Info => cliclack::log::info(text),
            Status::Remark => cliclack::log::remark(text),
        };
        return;
    }

    let line = match kind.tag() {
        Some(tag) => format!("  {} {}", tag, text),
        None => format!("  {}", style(text).dim()),
    };
    if kind == Status::Fail {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

/// Heading above a table of records
pub fn intro(ctx: &UiContext, title: &str) {
    let title = style(title).green().bold();
    if ctx.use_fancy_output() {
        let _ = cliclack::intro(title);
    } else {
        println!("{}\n", title);
    }
}

pub fn step_ok(ctx: &UiContext, message: &str) {
    status(ctx, Status::Ok, message.to_string());
}

/// Success with a dimmed parenthetical, e.g. the file that was written
pub fn step_ok_detail(ctx: &UiContext, message: &str, detail: &str) {
    status(ctx, Status::Ok, format!("{} ({})", message, style(detail).dim()));
}

/// Warning followed by what the user can do about it
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    status(ctx, Status::Warn, format!("{} - {}", message, style(hint).dim()));
}

pub fn step_error_detail(ctx: &UiContext, message: &str, detail: &str) {
    status(ctx, Status::Fail, format!("{}: {}", message, style(detail).red()));
}

pub fn step_info(ctx: &UiContext, message: &str) {
    status(ctx, Status::Info, message.to_string());
}

/// Secondary text such as cache counts or lists of valid keys
pub fn remark(ctx: &UiContext, message: &str) {
    status(ctx, Status::Remark, message.to_string());
}

/// One field of a saved record, indented under the status line
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    let key = if ctx.use_fancy_output() {
        style(key).dim().to_string()
    } else {
        key.to_string()
    };
    println!("  {}: {}", key, value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remark_has_no_tag() {
        assert!(Status::Remark.tag().is_none());
        assert!(Status::Fail.tag().unwrap().contains("[FAIL]"));
    }

    #[test]
    fn output_non_interactive() {
        let ctx = UiContext::non_interactive();
        intro(&ctx, "Posts");
        step_ok(&ctx, "Saved post p1");
        step_info(&ctx, "Nothing to show");
        step_error_detail(&ctx, "Cannot set config value", "Unknown config key: x");
        key_value(&ctx, "title", "Sustainability Report");
    }
}
