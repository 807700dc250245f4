use crate::ingest::IngestReport;
use crate::runtime::types::CorpusRecord;
use crate::types::{LevelIndex, SectionContent};
use reqwest::Client;

pub async fn callback_fetch(
    client: &Client,
    callback_base: &str,
    callback_token: &str,
    path: &str,
    method: reqwest::Method,
    body: Option<serde_json::Value>,
) -> Result<reqwest::Response, String> {
    let url = format!("{callback_base}{path}");
    let mut builder = client
        .request(method, &url)
        .header("Authorization", format!("Bearer {callback_token}"));

    if let Some(json_body) = body {
        let payload = serde_json::to_string(&json_body)
            .map_err(|e| format!("Failed to serialize body for {url}: {e}"))?;
        builder = builder
            .header("Content-Type", "application/json")
            .body(payload);
    }

    builder
        .send()
        .await
        .map_err(|e| format!("Request to {url} failed: {e}"))
}

async fn post_checked(
    client: &Client,
    callback_base: &str,
    callback_token: &str,
    path: &str,
    body: serde_json::Value,
    what: &str,
) -> Result<(), String> {
    let res = callback_fetch(
        client,
        callback_base,
        callback_token,
        path,
        reqwest::Method::POST,
        Some(body),
    )
    .await?;

    if !res.status().is_success() {
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        return Err(format!("{what} callback failed: {status} {text}"));
    }

    Ok(())
}

pub(crate) async fn post_debug_log(
    client: &Client,
    callback_base: &str,
    callback_token: &str,
    level: &str,
    message: &str,
    context: Option<serde_json::Value>,
) {
    let body = serde_json::json!({
        "level": level,
        "message": message,
        "context": context,
    });

    let result = callback_fetch(
        client,
        callback_base,
        callback_token,
        "/api/callback/containerLog",
        reqwest::Method::POST,
        Some(body),
    )
    .await;
    if let Err(err) = result {
        eprintln!(
            "[Runtime][stderr] post_debug_log failed: level={} message={} err={}",
            level, message, err
        );
    }
}

pub async fn post_record_batch(
    client: &Client,
    callback_base: &str,
    callback_token: &str,
    run_id: Option<&str>,
    records: &[CorpusRecord],
) -> Result<(), String> {
    post_checked(
        client,
        callback_base,
        callback_token,
        "/api/callback/insertRecordBatch",
        serde_json::json!({ "runId": run_id, "records": records }),
        "Insert record batch",
    )
    .await
}

pub async fn post_content(
    client: &Client,
    callback_base: &str,
    callback_token: &str,
    slug: &str,
    content: &SectionContent,
) -> Result<(), String> {
    post_checked(
        client,
        callback_base,
        callback_token,
        "/api/callback/storeContent",
        serde_json::json!({ "slug": slug, "content": content }),
        "Store content",
    )
    .await
}

pub async fn post_index(
    client: &Client,
    callback_base: &str,
    callback_token: &str,
    slug: &str,
    index: &LevelIndex,
) -> Result<(), String> {
    post_checked(
        client,
        callback_base,
        callback_token,
        "/api/callback/storeContent",
        serde_json::json!({ "slug": slug, "content": index }),
        "Store index",
    )
    .await
}

pub async fn post_progress(
    client: &Client,
    callback_base: &str,
    callback_token: &str,
    run_id: Option<&str>,
    status: &str,
    report: Option<&IngestReport>,
) {
    let body = serde_json::json!({
        "runId": run_id,
        "status": status,
        "report": report,
    });

    let _ = callback_fetch(
        client,
        callback_base,
        callback_token,
        "/api/callback/progress",
        reqwest::Method::POST,
        Some(body),
    )
    .await;
}

pub async fn post_ingest_error(
    client: &Client,
    callback_base: &str,
    callback_token: &str,
    error: &str,
) {
    let result = callback_fetch(
        client,
        callback_base,
        callback_token,
        "/api/callback/ingestError",
        reqwest::Method::POST,
        Some(serde_json::json!({ "error": error })),
    )
    .await;
    if let Err(err) = result {
        tracing::error!("[Runtime] Failed to report ingest error: {}", err);
    }
}
