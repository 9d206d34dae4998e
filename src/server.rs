use std::sync::Arc;
use std::time::Instant;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use tower_http::cors::{Any, CorsLayer};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::error::{Result, VitrineError};
use crate::format::{render_results, Formatter, Grid};
use crate::predicate::SearchCriteria;

/// Query string of `/search`: `d`ate, `a`gent, `c`lassifier, `l`abel.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub d: Option<String>,
    #[serde(default)]
    pub a: Option<String>,
    #[serde(default)]
    pub c: Option<String>,
    #[serde(default)]
    pub l: Option<String>,
    /// `text` for the plain listing; JSON otherwise.
    #[serde(default)]
    pub format: Option<String>,
}

impl From<&SearchQuery> for SearchCriteria {
    fn from(query: &SearchQuery) -> Self {
        SearchCriteria {
            date: query.d.clone(),
            agent: query.a.clone(),
            classifier: query.c.clone(),
            label: query.l.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub formatter: Arc<dyn Formatter>,
}

impl AppState {
    pub fn new(catalog: Catalog, formatter: Arc<dyn Formatter>) -> Self {
        Self { catalog, formatter }
    }
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Catalog::new(settings.database.clone()).with_result_limit(settings.result_limit),
            Arc::new(Grid::new(settings.column_width)),
        )
    }
}

fn error_response(e: VitrineError) -> Response {
    let (status, message) = match &e {
        VitrineError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
        VitrineError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        _ => {
            error!(error = %e, "request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error.".to_string())
        }
    };
    if status != StatusCode::INTERNAL_SERVER_ERROR {
        warn!(%message, code = %status.as_u16(), "request rejected");
    }
    (status, Json(ErrorResponse { error: message })).into_response()
}

// The store is synchronous, so every call runs on the blocking pool.
async fn blocking<T, F>(work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| VitrineError::Join(e.to_string()))?
}

async fn search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Response {
    let started = Instant::now();
    let criteria = SearchCriteria::from(&query);
    let catalog = state.catalog.clone();
    let result = blocking(move || catalog.search(&criteria)).await;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    match result {
        Ok(records) => {
            info!(ms = elapsed_ms, records = records.len(), "search complete");
            if query.format.as_deref() == Some("text") {
                let body = render_results(&records, state.formatter.as_ref());
                ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
            } else {
                Json(records).into_response()
            }
        }
        Err(e) => error_response(e),
    }
}

async fn object_detail(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let started = Instant::now();
    let object_id: i64 = match raw_id.trim().parse() {
        Ok(id) => id,
        Err(_) => {
            return error_response(VitrineError::Validation(format!(
                "No object with id {raw_id} exists."
            )));
        }
    };
    let catalog = state.catalog.clone();
    let result = blocking(move || catalog.detail(object_id)).await;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    match result {
        Ok(record) => {
            info!(ms = elapsed_ms, object_id, "detail complete");
            Json(record.render(state.formatter.as_ref())).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET])
        .allow_headers(Any);
    Router::new()
        .route("/search", get(search))
        .route("/obj/:id", get(object_detail))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(settings: &Settings) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(&settings.bind).await?;
    info!(bind = %settings.bind, database = %settings.database.display(), "listening");
    axum::serve(listener, router(AppState::from_settings(settings))).await?;
    Ok(())
}
