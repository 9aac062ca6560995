//! Config command - show or edit configuration

use crate::cli::args::{parse_rate, ConfigAction, ConfigArgs};
use crate::config::{validate, Config, ConfigManager};
use crate::error::{SyncacheError, SyncacheResult};
use crate::ui::{self, UiContext};

const VALID_KEYS: [&str; 6] = [
    "general.verbose",
    "general.log_format",
    "remote.min_latency_ms",
    "remote.max_latency_ms",
    "remote.failure_rate",
    "mutation.temp_id_prefix",
];

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
) -> SyncacheResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => show_path(manager),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, config, &key, &value).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> SyncacheResult<()> {
    let toml = toml::to_string_pretty(config)?;
    println!("{}", toml);
    Ok(())
}

fn show_path(manager: &ConfigManager) {
    println!("{}", manager.path().display());
}

async fn init_config(manager: &ConfigManager, force: bool) -> SyncacheResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;

    ui::step_ok_detail(
        &ctx,
        "Configuration initialized",
        &path.display().to_string(),
    );

    Ok(())
}

async fn set_value(
    manager: &ConfigManager,
    config: &Config,
    key: &str,
    value: &str,
) -> SyncacheResult<()> {
    let ctx = UiContext::detect();
    let mut config = config.clone();

    if let Err(e) = apply(&mut config, key, value) {
        ui::step_error_detail(&ctx, "Cannot set config value", &e.to_string());
        ui::remark(&ctx, "Valid keys:");
        for key in VALID_KEYS {
            ui::remark(&ctx, &format!("  {}", key));
        }
        return Err(e);
    }

    validate(&config).map_err(SyncacheError::User)?;
    manager.save(&config).await?;
    ui::step_ok(&ctx, &format!("Set {} = {}", key, value));

    Ok(())
}

/// Assign a dot-separated key on `config`
fn apply(config: &mut Config, key: &str, value: &str) -> SyncacheResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "verbose"] => config.general.verbose = parse_bool(value)?,
        ["general", "log_format"] => config.general.log_format = value.to_string(),
        ["remote", "min_latency_ms"] => config.remote.min_latency_ms = parse_u64(value)?,
        ["remote", "max_latency_ms"] => config.remote.max_latency_ms = parse_u64(value)?,
        ["remote", "failure_rate"] => {
            config.remote.failure_rate = parse_rate(value).map_err(SyncacheError::User)?
        }
        ["mutation", "temp_id_prefix"] => {
            if value.is_empty() {
                return Err(SyncacheError::User(
                    "mutation.temp_id_prefix cannot be empty".to_string(),
                ));
            }
            config.mutation.temp_id_prefix = value.to_string()
        }
        _ => return Err(SyncacheError::User(format!("Unknown config key: {}", key))),
    }

    Ok(())
}

fn parse_bool(value: &str) -> SyncacheResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(SyncacheError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

fn parse_u64(value: &str) -> SyncacheResult<u64> {
    value
        .parse()
        .map_err(|_| SyncacheError::User(format!("Invalid number: {}", value)))
}
