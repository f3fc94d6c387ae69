//! The five HTTP routes over the command façade (spec §6).

use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{BoxError, Router};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use super::error::ApiError;
use super::logging::log_requests;
use super::state::AppState;
use crate::commands;

/// Generous enough that a `/watch` call waiting on a genuinely slow board
/// still gets its answer; this only drops the caller's HTTP connection on
/// expiry, it never reaches into or cancels in-progress Board state (spec
/// §5: the Board holds no reference to the HTTP request).
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/look/:pid", get(look))
        .route("/flip/:pid/:coords", get(flip))
        .route("/replace/:pid/:from/:to", get(replace))
        .route("/watch/:pid", get(watch))
        .route("/reset", get(reset))
        .layer(axum::middleware::from_fn(log_requests))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(REQUEST_TIMEOUT),
        )
        .with_state(state)
}

async fn handle_timeout_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "request timed out".to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, format!("unhandled error: {err}"))
    }
}

/// Validates a player id against the HTTP boundary's `[A-Za-z0-9_]` charset
/// (spec §6).
fn validate_player(pid: &str) -> Result<(), ApiError> {
    if !pid.is_empty() && pid.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "player id {pid:?} must be non-empty and match [A-Za-z0-9_]"
        )))
    }
}

fn parse_coords(coords: &str) -> Result<(usize, usize), ApiError> {
    let (r, c) = coords
        .split_once(',')
        .ok_or_else(|| ApiError::BadRequest(format!("expected \"r,c\", got {coords:?}")))?;
    let row: usize = r
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid row in {coords:?}")))?;
    let col: usize = c
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid col in {coords:?}")))?;
    Ok((row, col))
}

async fn look(State(state): State<AppState>, Path(pid): Path<String>) -> Result<String, ApiError> {
    validate_player(&pid)?;
    let board = state.board().await;
    Ok(commands::look(&board, &pid).await)
}

async fn flip(
    State(state): State<AppState>,
    Path((pid, coords)): Path<(String, String)>,
) -> Result<String, ApiError> {
    validate_player(&pid)?;
    let (row, col) = parse_coords(&coords)?;
    let board = state.board().await;
    Ok(commands::flip(&board, &pid, row, col).await?)
}

async fn replace(
    State(state): State<AppState>,
    Path((pid, from, to)): Path<(String, String, String)>,
) -> Result<String, ApiError> {
    validate_player(&pid)?;
    let board = state.board().await;
    let snapshot = commands::map(&board, &pid, move |label| {
        let from = from.clone();
        let to = to.clone();
        async move { Ok(if label == from { to } else { label }) }
    })
    .await?;
    Ok(snapshot)
}

async fn watch(State(state): State<AppState>, Path(pid): Path<String>) -> Result<String, ApiError> {
    validate_player(&pid)?;
    let board = state.board().await;
    Ok(commands::watch(&board, &pid).await)
}

#[derive(Deserialize)]
struct ResetParams {
    filename: Option<String>,
}

async fn reset(State(state): State<AppState>, Query(params): Query<ResetParams>) -> Result<String, ApiError> {
    let board = state.reset(params.filename.as_deref()).await?;
    Ok(format!("{}x{}\n", board.rows(), board.cols()))
}
