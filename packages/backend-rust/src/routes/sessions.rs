use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lexiprobe_algo::{
    DisplayEstimate, ExportPayload, LearningSession, ResponseCounts, ResponseKind, SessionPhase,
};

use crate::response::{json_error, AppError, SuccessResponse};
use crate::services::proficiency::RecordResponseInput;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordResponseRequest {
    event_id: Option<String>,
    word_id: Option<String>,
    kind: Option<String>,
    timestamp: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionResponse {
    session_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EstimateResponse {
    session_id: Uuid,
    phase: SessionPhase,
    #[serde(flatten)]
    estimate: DisplayEstimate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordedResponse {
    event_id: Uuid,
    applied: bool,
    estimate: EstimateResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CountsResponse {
    session_id: Uuid,
    counts: ResponseCounts,
    sample_count: u64,
    estimated_vocab: u64,
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", post(create_session))
        .route("/:sessionId/estimate", get(get_estimate))
        .route("/:sessionId/responses", post(record_response))
        .route("/:sessionId/reset", post(reset_session))
        .route("/:sessionId/export", get(export_session))
        .route("/:sessionId/counts", get(get_counts))
}

async fn create_session(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let session_id = state.proficiency().create_session().await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::new(CreateSessionResponse { session_id })),
    ))
}

async fn get_estimate(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session_id = parse_session_id(&session_id)?;
    let session = require_session(&state, session_id).await?;

    Ok(Json(SuccessResponse::new(estimate_response(session_id, &session))))
}

async fn record_response(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<RecordResponseRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let session_id = parse_session_id(&session_id)?;
    let Json(payload) =
        payload.map_err(|rejection| json_error(rejection.status(), "INVALID_BODY", rejection.body_text()))?;

    let kind = payload
        .kind
        .as_deref()
        .and_then(ResponseKind::parse)
        .ok_or_else(|| {
            json_error(
                StatusCode::BAD_REQUEST,
                "INVALID_RESPONSE_KIND",
                "kind 必须是 knowSentence、knowWord、uncertain 或 dontKnow",
            )
        })?;

    let word_id = payload
        .word_id
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| json_error(StatusCode::BAD_REQUEST, "INVALID_WORD_ID", "wordId 不能为空"))?;

    let event_id = match payload.event_id.as_deref() {
        Some(raw) => Some(Uuid::parse_str(raw.trim()).map_err(|_| {
            json_error(StatusCode::BAD_REQUEST, "INVALID_EVENT_ID", "eventId 必须是 UUID")
        })?),
        None => None,
    };

    let timestamp = match payload.timestamp.as_deref() {
        Some(raw) => Some(
            DateTime::parse_from_rfc3339(raw.trim())
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|_| {
                    json_error(StatusCode::BAD_REQUEST, "INVALID_TIMESTAMP", "timestamp 必须是 RFC 3339 格式")
                })?,
        ),
        None => None,
    };

    let outcome = state
        .proficiency()
        .record_response(
            session_id,
            RecordResponseInput {
                event_id,
                word_id,
                kind,
                timestamp,
            },
        )
        .await?;

    let status = if outcome.applied {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(SuccessResponse::new(RecordedResponse {
            event_id: outcome.event_id,
            applied: outcome.applied,
            estimate: estimate_response(session_id, &outcome.session),
        })),
    ))
}

async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session_id = parse_session_id(&session_id)?;
    let session = state.proficiency().reset(session_id).await?;

    Ok(Json(SuccessResponse::new(estimate_response(session_id, &session))))
}

async fn export_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ExportPayload>, AppError> {
    let session_id = parse_session_id(&session_id)?;
    let session = require_session(&state, session_id).await?;

    Ok(Json(session.export()))
}

async fn get_counts(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session_id = parse_session_id(&session_id)?;
    let session = require_session(&state, session_id).await?;

    Ok(Json(SuccessResponse::new(CountsResponse {
        session_id,
        counts: *session.counts(),
        sample_count: session.sample_count(),
        estimated_vocab: session.estimated_vocab(),
    })))
}

fn parse_session_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        json_error(StatusCode::BAD_REQUEST, "INVALID_SESSION_ID", format!("无效的会话 ID: {raw}"))
    })
}

async fn require_session(state: &AppState, session_id: Uuid) -> Result<LearningSession, AppError> {
    state
        .proficiency()
        .session(session_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("会话不存在: {session_id}")))
}

fn estimate_response(session_id: Uuid, session: &LearningSession) -> EstimateResponse {
    EstimateResponse {
        session_id,
        phase: session.phase(),
        estimate: session.estimate(),
    }
}
