use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use parking_lot::RwLock;
use search_core::{parse_query, DocId, DocumentEntry, IndexEntry, Operator, SearchEngine};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub operator: Operator,
    pub terms: Vec<String>,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<DocumentEntry>,
}

#[derive(Deserialize)]
pub struct AddRequest {
    pub text: String,
    #[serde(default)]
    pub doc_id: Option<DocId>,
}

#[derive(Serialize)]
pub struct AddResponse {
    pub doc_id: DocId,
    pub replaced: bool,
}

/// One line of a seed file.
#[derive(Debug, Deserialize)]
struct SeedDoc {
    #[serde(default)]
    id: Option<DocId>,
    text: String,
}

#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// JSONL file of `{"id"?: int, "text": str}` records loaded at startup.
    pub seed: Option<PathBuf>,
    /// When set, write routes require a matching `X-ADMIN-TOKEN` header.
    pub admin_token: Option<String>,
}

/// Shared handle to the engine: searches take the read lock, add/delete the write lock.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<SearchEngine>>,
    pub admin_token: Option<String>,
}

pub fn build_app(config: ServerConfig) -> Result<Router> {
    let mut engine = SearchEngine::new();
    if let Some(path) = &config.seed {
        let loaded = load_seed(&mut engine, path)?;
        tracing::info!(loaded, path = %path.display(), "seeded documents");
    }
    let app_state = AppState { engine: Arc::new(RwLock::new(engine)), admin_token: config.admin_token };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc", post(add_handler))
        .route("/doc/:doc_id", get(doc_handler).delete(delete_handler))
        .route("/docs", get(docs_handler))
        .route("/index", get(index_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);
    Ok(app)
}

/// Add every record of a JSONL seed file to `engine`. Blank lines are skipped.
pub fn load_seed(engine: &mut SearchEngine, path: &FsPath) -> Result<usize> {
    let f = File::open(path).with_context(|| format!("opening seed file {}", path.display()))?;
    let reader = BufReader::new(f);
    let mut loaded = 0;
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: SeedDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid seed record", path.display(), lineno + 1))?;
        engine.add_document(doc.text, doc.id);
        loaded += 1;
    }
    Ok(loaded)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let parsed = parse_query(&params.q);
    let hits = state.engine.read().search(&params.q);
    let results: Vec<DocumentEntry> = hits.into_iter().map(|(doc_id, text)| DocumentEntry { doc_id, text }).collect();
    let elapsed = start.elapsed();
    Json(SearchResponse {
        query: params.q,
        operator: parsed.operator,
        terms: parsed.terms,
        took_s: elapsed.as_secs_f64(),
        total_hits: results.len(),
        results,
    })
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Result<Json<DocumentEntry>, (StatusCode, String)> {
    let engine = state.engine.read();
    match engine.get_document(doc_id) {
        Some(text) => Ok(Json(DocumentEntry { doc_id, text: text.to_string() })),
        None => Err((StatusCode::NOT_FOUND, format!("document {doc_id} not found"))),
    }
}

pub async fn docs_handler(State(state): State<AppState>) -> Json<Vec<DocumentEntry>> {
    Json(state.engine.read().document_listing())
}

pub async fn index_handler(State(state): State<AppState>) -> Json<Vec<IndexEntry>> {
    Json(state.engine.read().index_listing())
}

async fn add_handler(State(state): State<AppState>, headers: HeaderMap, Json(req): Json<AddRequest>) -> Result<Json<AddResponse>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let mut engine = state.engine.write();
    let replaced = req.doc_id.is_some_and(|id| engine.contains(id));
    let doc_id = engine.add_document(req.text, req.doc_id);
    Ok(Json(AddResponse { doc_id, replaced }))
}

async fn delete_handler(State(state): State<AppState>, headers: HeaderMap, Path(doc_id): Path<DocId>) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let deleted = state.engine.write().delete_document(doc_id);
    Ok(Json(serde_json::json!({ "doc_id": doc_id, "deleted": deleted })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let Some(required) = &state.admin_token else {
        return Ok(());
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
