//! Terminal output for the CLI
//!
//! Uses `cliclack` for spinners, prompts and log lines in a terminal and
//! falls back to plain bracketed lines in CI or when output is piped.
//!
//! ```rust,ignore
//! use syncache::ui::{self, TaskSpinner, UiContext};
//!
//! let ctx = UiContext::detect().with_auto_yes(args.yes);
//!
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Fetching posts...");
//! // ... await the cache ...
//! spinner.stop("Loaded 2 posts");
//!
//! if ui::confirm(&ctx, "Delete post?", false).await? {
//!     ui::step_ok(&ctx, "Deleted");
//! }
//! ```

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{
    intro, key_value, remark, step_error_detail, step_info, step_ok, step_ok_detail,
    step_warn_hint,
};
pub use progress::TaskSpinner;
pub use prompts::confirm;
pub use theme::{init_theme, SyncacheTheme};
