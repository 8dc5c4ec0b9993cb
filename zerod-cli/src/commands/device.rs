//! Device command - show or reset the persisted device identifier

use anyhow::Result;

use super::Context;
use crate::ui;

pub fn run(ctx: &Context, reset: bool) -> Result<()> {
    let client = ctx.client()?;

    if reset {
        client.reset_device_id()?;
        ui::warning("Device identifier reset; the server will see a new device");
    }

    let device_id = client.device_id()?;
    ui::header("Device");
    ui::key_value("Device ID", &device_id);
    ui::key_value("Storage", &ctx.storage().path().display().to_string());
    Ok(())
}
