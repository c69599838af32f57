//! HTTP API server for integration with other systems.
//!
//! Exposes full runs (streamed as Server-Sent Events or collected), discovery
//! alone, single-video summaries and the merge step.

use crate::aggregate::LabeledSummary;
use crate::cli::Output;
use crate::config::Settings;
use crate::discovery::{clamp_count, Locator};
use crate::error::VidsumError;
use crate::pipeline::{Orchestrator, ProgressEvent, RunRequest, Terminal};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
    default_depth: i64,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(&settings)?;
    let app = router(orchestrator, settings.summary.default_depth);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("vidsum API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Run (SSE)", "POST /runs");
    Output::kv("Run (collected)", "POST /runs/collect");
    Output::kv("Search", "GET  /search?query=&n=");
    Output::kv("Summarize video", "POST /items/summarize");
    Output::kv("Merge summaries", "POST /merge");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the API router around an orchestrator.
pub fn router(orchestrator: Orchestrator, default_depth: i64) -> Router {
    let state = Arc::new(AppState {
        orchestrator,
        default_depth,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/runs", post(run_stream))
        .route("/runs/collect", post(run_collect))
        .route("/search", get(search))
        .route("/items/summarize", post(summarize_item))
        .route("/merge", post(merge))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct RunBody {
    query: String,
    #[serde(default)]
    depth: Option<i64>,
    #[serde(default)]
    style: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct CollectResponse {
    events: Vec<ProgressEvent>,
    outcome: Terminal,
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: String,
    #[serde(default)]
    n: Option<i64>,
}

#[derive(Serialize, Deserialize)]
struct SearchResponse {
    results: Vec<Locator>,
}

#[derive(Deserialize)]
struct SummarizeBody {
    video_url: String,
    #[serde(default)]
    style: Option<String>,
}

#[derive(Deserialize)]
struct MergeBody {
    query: String,
    depth: i64,
    #[serde(default)]
    style: Option<String>,
    #[serde(default)]
    summaries: Vec<LabeledSummary>,
}

#[derive(Serialize, Deserialize)]
struct SummaryResponse {
    summary: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, error: impl ToString) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

fn status_for(err: &VidsumError) -> StatusCode {
    match err {
        VidsumError::InvalidInput(_) | VidsumError::InvalidLocator(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl AppState {
    fn request(&self, body: RunBody) -> Result<RunRequest, VidsumError> {
        let request = RunRequest::new(body.query, body.depth.unwrap_or(self.default_depth))?;
        Ok(match body.style {
            Some(style) => request.with_style(style),
            None => request,
        })
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn run_stream(State(state): State<Arc<AppState>>, Json(body): Json<RunBody>) -> Response {
    let request = match state.request(body) {
        Ok(r) => r,
        Err(e) => return error_response(status_for(&e), e),
    };

    let events = state.orchestrator.run(request).map(|event| {
        let name = match &event {
            ProgressEvent::StageChanged { .. } => "stage",
            ProgressEvent::Counts { .. } => "counts",
            ProgressEvent::ItemSettled { .. } => "item",
            ProgressEvent::Terminal { .. } => "terminal",
        };
        Event::default().event(name).json_data(&event)
    });

    Sse::new(events)
        .keep_alive(KeepAlive::default())
        .into_response()
}

async fn run_collect(State(state): State<Arc<AppState>>, Json(body): Json<RunBody>) -> Response {
    let request = match state.request(body) {
        Ok(r) => r,
        Err(e) => return error_response(status_for(&e), e),
    };

    let events: Vec<ProgressEvent> = state.orchestrator.run(request).collect().await;
    let outcome = match events.last() {
        Some(ProgressEvent::Terminal { outcome }) => outcome.clone(),
        _ => {
            warn!("Run stream ended without a terminal event");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "run ended without a result");
        }
    };

    Json(CollectResponse { events, outcome }).into_response()
}

async fn search(State(state): State<Arc<AppState>>, Query(params): Query<SearchParams>) -> Response {
    if params.query.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "query must not be empty");
    }
    let count = clamp_count(params.n.unwrap_or(5));

    match state.orchestrator.discovery().search(&params.query, count).await {
        Ok(mut results) => {
            results.truncate(count as usize);
            Json(SearchResponse { results }).into_response()
        }
        Err(e) => error_response(status_for(&e), e),
    }
}

async fn summarize_item(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SummarizeBody>,
) -> Response {
    if body.video_url.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "video_url must not be empty");
    }
    let locator = Locator::new(body.video_url.trim());
    let style = state.orchestrator.resolve_style(body.style.as_deref());

    match state.orchestrator.summarizer().summarize(&locator, &style).await {
        Ok(summary) => Json(SummaryResponse { summary }).into_response(),
        Err(e) => error_response(status_for(&e), e),
    }
}

async fn merge(State(state): State<Arc<AppState>>, Json(body): Json<MergeBody>) -> Response {
    if body.query.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "query must not be empty");
    }
    if body.summaries.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "no summaries to merge");
    }
    let depth = state.orchestrator.depth_label(body.depth);
    let style = state.orchestrator.resolve_style(body.style.as_deref());

    match state
        .orchestrator
        .aggregator()
        .merge(&body.query, &depth, &style, &body.summaries)
        .await
    {
        Ok(summary) => Json(SummaryResponse { summary }).into_response(),
        Err(e) => error_response(status_for(&e), e),
    }
}
