//! Send command - encrypted request to an API event

use anyhow::{anyhow, bail, Result};
use serde_json::Value;
use zerod_client::{HttpMethod, Params};

use super::Context;
use crate::ui;

pub async fn run(
    ctx: &Context,
    event: &str,
    pairs: &[String],
    json: Option<&str>,
    method: HttpMethod,
) -> Result<()> {
    let params = build_params(pairs, json)?;
    let client = ctx.client()?;

    let pb = ui::spinner(&format!("{} {}", method, ctx.config.endpoint_url(event)));
    let result = client.send(event, params, method).await;
    pb.finish_and_clear();

    let response = result?;
    ui::response(event, &response);

    Ok(())
}

/// Merge a base JSON object with `key=value` overrides.
pub fn build_params(pairs: &[String], json: Option<&str>) -> Result<Params> {
    let mut params = match json {
        Some(raw) => match serde_json::from_str::<Value>(raw)? {
            Value::Object(map) => map,
            other => bail!("--json must be a JSON object, got {}", other),
        },
        None => Params::new(),
    };

    for pair in pairs {
        let (key, value) = parse_pair(pair)?;
        params.insert(key, value);
    }
    Ok(params)
}

/// Parse `key=value`; the value is JSON when it parses as JSON, else a string.
pub fn parse_pair(pair: &str) -> Result<(String, Value)> {
    let (key, raw) = pair
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got '{}'", pair))?;
    if key.is_empty() {
        bail!("empty parameter name in '{}'", pair);
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}
