//! Session commands - login and stored credential management

use anyhow::Result;
use serde_json::Value;
use zerod_client::session::SessionCredential;
use zerod_client::ApiResponse;

use super::send::build_params;
use super::Context;
use crate::ui;

/// Send the login event and keep the returned credential.
pub async fn login(ctx: &Context, pairs: &[String], json: Option<&str>) -> Result<()> {
    let params = build_params(pairs, json)?;
    let client = ctx.client()?;
    let event = ctx.config.login_event.clone();

    let pb = ui::spinner(&format!("Signing in via '{}'", event));
    let result = client.post(&event, params).await;
    pb.finish_and_clear();
    let response = result?;

    match credential_from(&response) {
        Some(credential) => {
            client.store_credential(&credential)?;
            ui::success("Signed in");
            ui::key_value("Account", &credential.id);
        }
        None => {
            if ctx.verbose {
                ui::response(&event, &response);
            }
            ui::error(response.message().unwrap_or("login response carried no credential"));
        }
    }
    Ok(())
}

/// Extract `accessToken` and `id` from a login response.
///
/// The id may be a JSON string or number.
pub fn credential_from(response: &ApiResponse) -> Option<SessionCredential> {
    if response.is_error() {
        return None;
    }
    let token = response.get("accessToken")?.as_str()?;
    let id = match response.get("id")? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if token.is_empty() || id.is_empty() {
        return None;
    }
    Some(SessionCredential::new(token, id))
}

pub fn set(ctx: &Context, token: &str, id: &str) -> Result<()> {
    ctx.client()?
        .store_credential(&SessionCredential::new(token, id))?;
    ui::success("Credential stored");
    Ok(())
}

pub fn show(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    match client.credential()? {
        Some(credential) => {
            ui::header("Session");
            ui::key_value("Account", &credential.id);
            ui::key_value("Token", &mask(&credential.access_token));
            ui::key_value("Authorization", &mask(&credential.bearer(&client.device_id()?)));
        }
        None => {
            ui::info("No credential stored");
            ui::info("Run 'zerod login' or 'zerod session set' to add one");
        }
    }
    Ok(())
}

pub fn clear(ctx: &Context) -> Result<()> {
    ctx.client()?.clear_credential()?;
    ui::success("Credential cleared");
    Ok(())
}

/// Keep only the first few characters of a secret.
fn mask(secret: &str) -> String {
    let shown: String = secret.chars().take(8).collect();
    if shown.len() == secret.len() {
        "*".repeat(secret.chars().count())
    } else {
        format!("{}…", shown)
    }
}
