//! Config command - show the effective client configuration

use anyhow::Result;

use super::Context;
use crate::ui;

pub fn show(ctx: &Context) -> Result<()> {
    let config = &ctx.config;

    ui::header("Configuration");
    ui::key_value("API URL", &config.base_url);
    ui::key_value("Login event", &config.login_event);
    ui::key_value("Key schedule", config.key_schedule.as_str());
    ui::key_value(
        "Timeout",
        &config
            .timeout_secs
            .map(|s| format!("{}s", s))
            .unwrap_or_else(|| "none".to_string()),
    );
    ui::key_value("Dev mode", if config.dev_mode { "on" } else { "off" });
    ui::key_value("Storage", &ctx.storage_dir.display().to_string());
    if let Some(path) = &ctx.environment_file {
        ui::key_value("Environment", &path.display().to_string());
    }
    Ok(())
}
