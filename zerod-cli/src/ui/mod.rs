//! Terminal UI utilities
//!
//! Status lines go to stderr so that stdout only carries values worth
//! piping: key/value rows and response bodies.

use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use zerod_client::ApiResponse;

/// Width the keys of [`key_value`] rows are padded to.
const KEY_WIDTH: usize = 14;

fn status(symbol: ColoredString, message: &str) {
    eprintln!("{} {}", symbol, message);
}

/// Print a success message
pub fn success(message: &str) {
    status("✓".green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    status("✗".red().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    status("ℹ".blue().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    status("⚠".yellow().bold(), message);
}

/// Print a section header
pub fn header(text: &str) {
    println!("\n{}", text.bold().underline());
}

fn format_key_value(key: &str, value: &str) -> String {
    let value = if value.is_empty() {
        "(empty)".dimmed().to_string()
    } else {
        value.to_string()
    };
    let key = format!("{:<width$}", format!("{}:", key), width = KEY_WIDTH + 1);
    format!("  {} {}", key.cyan(), value)
}

/// Print an aligned key-value row; empty values are shown as `(empty)`
pub fn key_value(key: &str, value: &str) {
    println!("{}", format_key_value(key, value));
}

/// Create a spinner shown while a request is in flight
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print a separator line
pub fn separator() {
    println!("{}", "─".repeat(60).dimmed());
}

/// Print JSON prettily
pub fn json(value: &serde_json::Value) {
    if let Ok(pretty) = serde_json::to_string_pretty(value) {
        println!("{}", pretty);
    }
}

/// Summary line for a decrypted response: the server message for errors,
/// `<event> answered` otherwise.
fn response_summary(event: &str, response: &ApiResponse) -> String {
    if response.is_error() {
        response
            .message()
            .filter(|m| !m.is_empty())
            .unwrap_or(zerod_client::GENERIC_ERROR_MESSAGE)
            .to_string()
    } else {
        match response.message().filter(|m| !m.is_empty()) {
            Some(message) => format!("{} answered: {}", event, message),
            None => format!("{} answered", event),
        }
    }
}

/// Print a status line for `response` followed by its body
pub fn response(event: &str, response: &ApiResponse) {
    let summary = response_summary(event, response);
    if response.is_error() {
        warning(&summary);
    } else {
        success(&summary);
    }
    separator();
    json(response.as_value());
}
