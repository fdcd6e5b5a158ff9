//! Axum route handlers for the Interview API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::question_bank::QuestionBank;
use crate::interview::session::{InterviewSession, Reply, SessionStatus};
use crate::loader::{parse_job_description, resume_from_bytes};
use crate::models::JobDescription;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartInterviewRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: JobDescription,
    pub candidate_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartInterviewResponse {
    pub session_id: Uuid,
    pub candidate_name: String,
    pub greeting: String,
    pub question_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub utterance: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews
///
/// Builds the question bank for a resume + job description and opens a session.
pub async fn handle_start_interview(
    State(state): State<AppState>,
    Json(request): Json<StartInterviewRequest>,
) -> Result<(StatusCode, Json<StartInterviewResponse>), AppError> {
    open_session(
        &state,
        &request.resume_text,
        &request.job_description,
        request.candidate_name.as_deref(),
    )
    .await
}

/// POST /api/v1/interviews/upload
///
/// Multipart variant: `resume` (text or PDF file), `job_description` (JSON text)
/// and an optional `candidate_name`.
pub async fn handle_upload_interview(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<StartInterviewResponse>), AppError> {
    let mut resume: Option<(Option<String>, Bytes)> = None;
    let mut job_description = JobDescription::default();
    let mut candidate_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(String::from);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read field '{name}': {e}")))?;

        match name.as_str() {
            "resume" => resume = Some((file_name, data)),
            "job_description" => {
                let raw = std::str::from_utf8(&data).map_err(|_| {
                    AppError::Validation("job_description must be UTF-8 JSON".to_string())
                })?;
                job_description = parse_job_description(raw)?;
            }
            "candidate_name" => {
                candidate_name = Some(String::from_utf8_lossy(&data).into_owned());
            }
            other => tracing::debug!("Ignoring unknown multipart field '{other}'"),
        }
    }

    let (file_name, data) =
        resume.ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    let resume_text = resume_from_bytes(file_name.as_deref(), data.to_vec()).await?;

    open_session(
        &state,
        &resume_text,
        &job_description,
        candidate_name.as_deref(),
    )
    .await
}

async fn open_session(
    state: &AppState,
    resume_text: &str,
    job_description: &JobDescription,
    candidate_name: Option<&str>,
) -> Result<(StatusCode, Json<StartInterviewResponse>), AppError> {
    let session = InterviewSession::new(
        resume_text,
        job_description,
        candidate_name,
        state.session_chooser(),
    );

    let response = StartInterviewResponse {
        session_id: session.id(),
        candidate_name: session.candidate_name().to_string(),
        greeting: session.greeting().greeting,
        question_count: session.bank().len(),
    };

    state.sessions.insert(session).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionStatus>, AppError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::session_not_found(id))?;
    let status = session.lock().await.status();
    Ok(Json(status))
}

/// GET /api/v1/interviews/:id/questions
pub async fn handle_get_questions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionBank>, AppError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::session_not_found(id))?;
    let bank = session.lock().await.bank().clone();
    Ok(Json(bank))
}

/// POST /api/v1/interviews/:id/responses
///
/// Feeds one candidate utterance to the session and returns the next system line.
/// Fails with 409 once the interview has concluded.
pub async fn handle_respond(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RespondRequest>,
) -> Result<Json<Reply>, AppError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::session_not_found(id))?;

    let mut session = session.lock().await;
    let reply = session
        .respond(&request.utterance)
        .map_err(|e| AppError::from_interview(id, e))?;

    Ok(Json(reply))
}

/// DELETE /api/v1/interviews/:id
pub async fn handle_end_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::session_not_found(id))
    }
}
