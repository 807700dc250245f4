use crate::runtime::callbacks::post_debug_log;
use crate::types::IngestConfig;
use reqwest::Client;
use reqwest::Url;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1", "::1", "[::1]", "host.docker.internal"];

/// Remote log mirroring is only enabled against a local callback server.
pub fn is_local_callback_base(callback_base: &str) -> bool {
    let host = match Url::parse(callback_base) {
        Ok(url) => url.host_str().unwrap_or_default().to_string(),
        Err(_) => callback_base.to_string(),
    };
    LOCAL_HOSTS.contains(&host.as_str())
}

fn emit(level: LogLevel, message: &str, context: Option<&Value>) {
    let context = context.map(Value::to_string).unwrap_or_default();
    match level {
        LogLevel::Debug => tracing::debug!(context = %context, "[Runtime] {}", message),
        LogLevel::Info => tracing::info!(context = %context, "[Runtime] {}", message),
        LogLevel::Warn => tracing::warn!(context = %context, "[Runtime] {}", message),
        LogLevel::Error => tracing::error!(context = %context, "[Runtime] {}", message),
    }
}

pub async fn log_event_with_callback(
    client: &Client,
    callback_base: Option<&str>,
    callback_token: Option<&str>,
    level: LogLevel,
    message: &str,
    context: Option<Value>,
) {
    emit(level, message, context.as_ref());

    if let (Some(base), Some(token)) = (callback_base, callback_token) {
        if is_local_callback_base(base) {
            post_debug_log(client, base, token, level.as_str(), message, context).await;
        }
    }
}

pub async fn log_event(
    client: &Client,
    config: &IngestConfig,
    level: LogLevel,
    message: &str,
    context: Option<Value>,
) {
    log_event_with_callback(
        client,
        Some(&config.callback_base),
        Some(&config.callback_token),
        level,
        message,
        context,
    )
    .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_local_hosts_receive_logs() {
        assert!(is_local_callback_base("http://localhost:8787"));
        assert!(is_local_callback_base("http://host.docker.internal:8787/"));
        assert!(!is_local_callback_base("https://ingest.example.com"));
    }
}
