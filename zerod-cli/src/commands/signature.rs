//! Signature command - show the environment fingerprint

use anyhow::Result;
use zerod_client::signature::create_signature;

use super::Context;
use crate::ui;

pub fn run(ctx: &Context) -> Result<()> {
    let env = ctx.environment()?.snapshot();

    ui::header("Environment");
    ui::key_value("userAgent", &env.user_agent);
    ui::key_value("language", &env.language);
    ui::key_value("platform", &env.platform);
    ui::key_value("product", &env.product);
    ui::key_value("productSub", &env.product_sub);
    ui::key_value("vendor", &env.vendor);
    ui::key_value("vendorSub", &env.vendor_sub);

    ui::header("Signature");
    ui::key_value("Signature", &create_signature(&env));
    ui::key_value("Key schedule", ctx.config.key_schedule.as_str());

    if ctx.environment_file.is_none() {
        ui::info("Derived from this host; pass --environment to sign as a browser");
    }
    Ok(())
}
