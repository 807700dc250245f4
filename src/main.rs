use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::post,
    Router,
};
use corpus_ingest::runtime::callbacks::post_ingest_error;
use corpus_ingest::runtime::logging::{log_event_with_callback, LogLevel};
use corpus_ingest::runtime::orchestrator::ingest_source;
use corpus_ingest::types::IngestConfig;
use serde_json::json;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tokio::sync::Notify;
use tokio::time::Duration;

const IDLE_SHUTDOWN: Duration = Duration::from_secs(15);
const DEFAULT_PORT: u16 = 8080;

struct AppState {
    active_jobs: AtomicUsize,
    total_jobs_started: AtomicUsize,
    shutdown_notify: Arc<Notify>,
}

async fn handle_ingest(
    State(state): State<Arc<AppState>>,
    Json(config): Json<IngestConfig>,
) -> (StatusCode, Json<serde_json::Value>) {
    let callback_base = config.callback_base.clone();
    let callback_token = config.callback_token.clone();
    let callback_base_for_join = callback_base.clone();
    let callback_token_for_join = callback_token.clone();
    let source = config.source.as_str();

    tracing::info!(
        "[Runtime] Accepted {} ingest of {}",
        source,
        config.mirror_root
    );

    // Increment active jobs and total count strictly before spawning
    state.active_jobs.fetch_add(1, Ordering::SeqCst);
    state.total_jobs_started.fetch_add(1, Ordering::SeqCst);

    let state_for_task = state.clone();

    // Spawn the ingest task
    let handle = tokio::spawn(async move {
        match ingest_source(config).await {
            Ok(report) => tracing::info!("[Runtime] Ingest finished: {}", report.summary()),
            Err(err) => {
                tracing::error!("[Runtime] Ingest failed: {}", err);
                let client = reqwest::Client::new();
                post_ingest_error(&client, &callback_base, &callback_token, &err).await;
            }
        }
    });

    // Spawn a monitor task to handle completion/failure and cleanup
    tokio::spawn(async move {
        if let Err(err) = handle.await {
            tracing::error!("[Runtime] Ingest task panicked or was cancelled: {}", err);
            let client = reqwest::Client::new();
            post_ingest_error(
                &client,
                &callback_base_for_join,
                &callback_token_for_join,
                &err.to_string(),
            )
            .await;
            log_event_with_callback(
                &client,
                Some(&callback_base_for_join),
                Some(&callback_token_for_join),
                LogLevel::Error,
                "ingest_task_panicked_or_cancelled",
                Some(json!({ "error": err.to_string() })),
            )
            .await;
        }

        // Decrement job count
        let previous = state_for_task.active_jobs.fetch_sub(1, Ordering::SeqCst);

        // If previous was 1 (so now 0), start the idle timer
        if previous == 1 {
            let current_generation = state_for_task.total_jobs_started.load(Ordering::SeqCst);
            let state_for_timeout = state_for_task.clone();

            tokio::spawn(async move {
                tracing::info!(
                    "[Runtime] No active jobs, waiting {}s for new jobs before shutdown",
                    IDLE_SHUTDOWN.as_secs()
                );
                tokio::time::sleep(IDLE_SHUTDOWN).await;

                if state_for_timeout.active_jobs.load(Ordering::SeqCst) == 0
                    && state_for_timeout.total_jobs_started.load(Ordering::SeqCst)
                        == current_generation
                {
                    tracing::info!("[Runtime] Still idle, shutting down");
                    state_for_timeout.shutdown_notify.notify_one();
                } else {
                    tracing::info!("[Runtime] New jobs detected, cancelling idle shutdown");
                }
            });
        }
    });

    (
        StatusCode::OK,
        Json(json!({ "status": "accepted", "source": source })),
    )
}

async fn handle_health() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt::init();

    let active_jobs = AtomicUsize::new(0);
    let total_jobs_started = AtomicUsize::new(0);
    let shutdown_notify = Arc::new(Notify::new());
    let state = Arc::new(AppState {
        active_jobs,
        total_jobs_started,
        shutdown_notify: shutdown_notify.clone(),
    });

    // Shut down if no job arrives within the idle window after startup.
    let state_for_startup = state.clone();
    tokio::spawn(async move {
        tokio::time::sleep(IDLE_SHUTDOWN).await;
        if state_for_startup.active_jobs.load(Ordering::SeqCst) == 0
            && state_for_startup.total_jobs_started.load(Ordering::SeqCst) == 0
        {
            tracing::info!("[Runtime] No jobs received after startup, shutting down");
            state_for_startup.shutdown_notify.notify_one();
        }
    });

    let app = Router::new()
        .route("/ingest", post(handle_ingest))
        .fallback(handle_health)
        .with_state(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| format!("Failed to bind to port {port}: {e}"))?;

    tracing::info!("[Runtime] Listening on :{}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_notify))
        .await
        .map_err(|e| format!("Server failed: {e}"))
}

async fn shutdown_signal(notify: Arc<Notify>) {
    notify.notified().await;
}
