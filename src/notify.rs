use chrono::{DateTime, Utc};
use url::Url;
use worker::wasm_bindgen::JsValue;
use worker::{Env, Fetch, Headers, Method, Request, RequestInit};

use crate::error::ApiError;
use crate::models::{MAX_ALERT_LOG_CHARS, TELEGRAM_API_BASE, TelegramMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeStatus {
    Success,
    Error,
}

impl ScrapeStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Error => "ERROR",
        }
    }
}

/// What the operator is told about one scrape request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeAlert<'a> {
    pub status: ScrapeStatus,
    pub client_ip: &'a str,
    pub url: &'a str,
    pub at: DateTime<Utc>,
    pub table_count: Option<usize>,
    pub error: Option<&'a str>,
}

pub fn format_alert(alert: &ScrapeAlert<'_>) -> String {
    let mut lines = vec![
        "Web Scraping Alert!".to_string(),
        String::new(),
        format!("Status: {}", alert.status.as_str()),
        format!("IP: {}", alert.client_ip),
        format!("URL: {}", alert.url),
        format!("Time: {}", alert.at.format("%Y-%m-%d %H:%M:%S UTC")),
    ];

    match alert.status {
        ScrapeStatus::Success => {
            if let Some(count) = alert.table_count {
                lines.push(format!("Tables saved: {count}"));
            }
            lines.push("Scraping completed successfully!".to_string());
        }
        ScrapeStatus::Error => {
            lines.push("Scraping failed.".to_string());
            if let Some(error) = alert.error {
                lines.push(String::new());
                lines.push(truncate_chars(error, MAX_ALERT_LOG_CHARS));
            }
        }
    }

    lines.join("\n")
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}... (truncated)", &text[..cut]),
        None => text.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

impl TelegramConfig {
    /// `None` unless both the bot token and the chat id are set.
    pub fn from_env(env: &Env) -> Option<Self> {
        let bot_token = env
            .secret("TELEGRAM_BOT_TOKEN")
            .map(|value| value.to_string())
            .ok()
            .filter(|value| !value.trim().is_empty())?;
        let chat_id = env
            .var("TELEGRAM_CHAT_ID")
            .map(|value| value.to_string())
            .ok()
            .filter(|value| !value.trim().is_empty())?;
        Some(Self { bot_token, chat_id })
    }

    pub fn send_message_url(&self) -> Result<Url, ApiError> {
        Ok(Url::parse(&format!(
            "{TELEGRAM_API_BASE}/bot{}/sendMessage",
            self.bot_token
        ))?)
    }
}

async fn send_telegram(config: &TelegramConfig, text: &str) -> Result<(), ApiError> {
    let payload = serde_json::to_string(&TelegramMessage {
        chat_id: &config.chat_id,
        text,
    })?;

    let headers = Headers::new();
    headers.set("Content-Type", "application/json")?;
    let mut init = RequestInit::new();
    init.with_method(Method::Post)
        .with_headers(headers)
        .with_body(Some(JsValue::from_str(&payload)));

    let request = Request::new_with_init(config.send_message_url()?.as_str(), &init)?;
    let response = Fetch::Request(request).send().await?;
    let status = response.status_code();
    if status >= 400 {
        return Err(ApiError::Upstream(format!(
            "telegram sendMessage failed: status {status}"
        )));
    }
    Ok(())
}

/// Sends the alert when a bot is configured. Failures are only logged.
pub async fn notify(env: &Env, alert: &ScrapeAlert<'_>) {
    let Some(config) = TelegramConfig::from_env(env) else {
        worker::console_log!("telegram notifier not configured; skipping alert");
        return;
    };

    match send_telegram(&config, &format_alert(alert)).await {
        Ok(()) => worker::console_log!("telegram alert sent for {}", alert.url),
        Err(error) => worker::console_error!("telegram notification failed: {error}"),
    }
}
