use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use yansi::Paint;

use super::error::ApiError;

static SILENT: AtomicBool = AtomicBool::new(false);

pub fn set_silent(silent: bool) {
    SILENT.store(silent, Ordering::Relaxed);
}

fn log_output(msg: String) {
    if !SILENT.load(Ordering::Relaxed) {
        println!("{}", msg);
    }
}

/// Core HTTP function for talking to the directory backend.
/// Echoes each request as a copy-pasteable curl line unless silenced.
pub async fn api_call(
    client: &reqwest::Client,
    api_base_url: &str,
    method: &str,
    endpoint: &str,
    body: Option<Value>,
) -> Result<Value, ApiError> {
    let url = format!("{}{}", api_base_url, endpoint);

    // --- Curl Logging ---
    let mut parts = Vec::new();
    parts.push(Paint::new("curl").fg(yansi::Color::Green).bold().to_string());
    parts.push(format!("-X {}", Paint::new(method).fg(yansi::Color::Yellow).bold()));
    parts.push(format!("'{}'", Paint::new(&url).fg(yansi::Color::Cyan)));

    if body.is_some() {
        parts.push(format!("{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new("'Content-Type: application/json'").fg(yansi::Color::Magenta)
        ));
    }
    if let Some(ref d) = body {
        let json_str = serde_json::to_string_pretty(d).unwrap_or_default();
        let escaped_json = json_str.replace('\'', "'\\''");
        parts.push(format!("{} {}",
            Paint::new("-d").fg(yansi::Color::Blue),
            Paint::new(format!("'{}'", escaped_json)).fg(yansi::Color::White)
        ));
    }
    log_output(format!("Request:\n{}", parts.join(" ")));
    // --------------------

    let mut req = match method {
        "GET" => client.get(&url),
        "POST" => client.post(&url),
        "PUT" => client.put(&url),
        "DELETE" => client.delete(&url),
        _ => client.get(&url),
    };

    if let Some(ref b) = body {
        req = req.json(b);
    }

    let resp = req
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    // Colorize the response for better readability in the terminal
    // Grayed out color (dimmed/dark gray)
    let response_str = Paint::new(&text).rgb(100, 100, 100).to_string();
    log_output(format!("Response:\n{}", response_str));

    if !status.is_success() {
        let detail = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(|s| s.to_string()))
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(ApiError::Server {
            status: status.as_u16(),
            detail,
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| ApiError::Transport(format!("invalid JSON response: {}", e)))
}
