use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{Html, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::error::AppError;
use crate::explain::{ExplainRequest, Explainer};
use crate::intake::{CandidateFile, Effect, FileId, IntakeView, Msg, UploadedFile};
use crate::page;
use crate::policy::{resolve_media_type, Rejection, UploadPolicy};
use crate::preview::{create_preview, data_url};
use crate::session::{SessionId, SessionStore};

/// Room left in a request body for multipart boundaries and text fields.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub policy: Arc<UploadPolicy>,
    pub explainer: Arc<dyn Explainer>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(
        policy: UploadPolicy,
        explainer: Arc<dyn Explainer>,
        progress_interval: Duration,
    ) -> Self {
        let policy = Arc::new(policy);
        let sessions = Arc::new(SessionStore::new(
            Arc::clone(&policy),
            Arc::clone(&explainer),
            progress_interval,
        ));
        Self {
            policy,
            explainer,
            sessions,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let (upload_limit, explain_limit) = body_limits(&state.policy);

    Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "ok" }))
        .route("/api/config", get(client_config))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .route(
            "/api/sessions/:id/files",
            post(drop_files).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/sessions/:id/files/:file_id", delete(remove_file))
        .route("/api/sessions/:id/prompt", put(set_prompt))
        .route("/api/sessions/:id/submit", post(submit))
        .route("/api/sessions/:id/close", post(close))
        .route(
            "/api/explain",
            post(explain_once).layer(DefaultBodyLimit::max(explain_limit)),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Request body caps for the file drop route and the one-shot explain route.
fn body_limits(policy: &UploadPolicy) -> (usize, usize) {
    let upload = policy
        .max_size_bytes()
        .saturating_mul(policy.max_files.max(1))
        .saturating_add(MULTIPART_OVERHEAD);
    let explain = policy
        .submission_limit_bytes()
        .saturating_add(MULTIPART_OVERHEAD);
    (upload, explain)
}

async fn index() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

#[derive(Serialize)]
struct ClientConfig<'a> {
    model: &'a str,
    policy: &'a UploadPolicy,
    max_size_bytes: usize,
    submission_limit_bytes: usize,
}

async fn client_config(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = ClientConfig {
        model: state.explainer.model(),
        policy: &state.policy,
        max_size_bytes: state.policy.max_size_bytes(),
        submission_limit_bytes: state.policy.submission_limit_bytes(),
    };
    Json(serde_json::json!(config))
}

#[derive(Serialize)]
pub struct SessionCreated {
    pub id: SessionId,
    pub view: IntakeView,
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let (id, view) = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionCreated { id, view }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IntakeView>, AppError> {
    let session = state.sessions.get(SessionId(id)).await?;
    Ok(Json(session.view().await))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let id = SessionId(id);
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::SessionNotFound(id))
    }
}

#[derive(Debug, Serialize)]
pub struct RejectedFile {
    pub name: String,
    pub reason: Rejection,
    pub message: String,
}

#[derive(Serialize)]
pub struct DropResponse {
    pub view: IntakeView,
    pub rejected: Vec<RejectedFile>,
    pub discarded: usize,
}

async fn drop_files(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<DropResponse>, AppError> {
    let id = SessionId(id);
    let session = state.sessions.get(id).await?;

    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let media_type = resolve_media_type(&name, field.content_type());
        let bytes = field.bytes().await?;

        match state.policy.check(&name, &media_type, bytes.len()) {
            Ok(()) => accepted.push(UploadedFile {
                name,
                media_type,
                bytes,
            }),
            Err(reason) => {
                tracing::debug!(session = %id, %name, %reason, "file rejected");
                rejected.push(RejectedFile {
                    message: reason.to_string(),
                    name,
                    reason,
                });
            }
        }
    }

    // Files past the remaining room are discarded without building a preview.
    let room = session.room().await;
    let overflow = accepted.len().saturating_sub(room);
    accepted.truncate(room);

    let mut candidates = Vec::with_capacity(accepted.len());
    for file in accepted {
        let preview = build_preview(&file).await;
        candidates.push(CandidateFile { file, preview });
    }
    let offered = candidates.len();

    let (view, effects) = state
        .sessions
        .dispatch(id, Msg::FilesDropped(candidates))
        .await?;
    let added = effects
        .iter()
        .filter(|effect| matches!(effect, Effect::StartProgress { .. }))
        .count();

    Ok(Json(DropResponse {
        view,
        rejected,
        discarded: overflow + offered - added,
    }))
}

async fn build_preview(file: &UploadedFile) -> Option<String> {
    let media_type = file.media_type.clone();
    let bytes = file.bytes.clone();
    let task = tokio::task::spawn_blocking(move || create_preview(&media_type, &bytes));
    match task.await {
        Ok(preview) => preview,
        Err(err) => {
            tracing::warn!(file = %file.name, error = %err, "preview task failed");
            file.media_type
                .starts_with("image/")
                .then(|| data_url(&file.media_type, &file.bytes))
        }
    }
}

#[derive(Serialize)]
pub struct RemoveResponse {
    pub view: IntakeView,
    pub removed: Option<String>,
}

async fn remove_file(
    State(state): State<AppState>,
    Path((id, file_id)): Path<(Uuid, u64)>,
) -> Result<Json<RemoveResponse>, AppError> {
    let (view, effects) = state
        .sessions
        .dispatch(SessionId(id), Msg::RemoveFile(FileId(file_id)))
        .await?;
    let removed = effects.into_iter().find_map(|effect| match effect {
        Effect::NotifyRemoved { name, .. } => Some(name),
        _ => None,
    });
    Ok(Json(RemoveResponse { view, removed }))
}

#[derive(Deserialize)]
pub struct PromptBody {
    pub prompt: String,
}

async fn set_prompt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PromptBody>,
) -> Result<Json<IntakeView>, AppError> {
    let (view, _) = state
        .sessions
        .dispatch(SessionId(id), Msg::PromptChanged(body.prompt))
        .await?;
    Ok(Json(view))
}

async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<IntakeView>), AppError> {
    let (view, effects) = state
        .sessions
        .dispatch_checked(SessionId(id), Msg::SubmitClicked, |intake| {
            if intake.is_loading() {
                Err(AppError::Busy)
            } else {
                Ok(())
            }
        })
        .await?;

    if effects.is_empty() {
        return Err(AppError::NoFile);
    }
    Ok((StatusCode::ACCEPTED, Json(view)))
}

async fn close(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IntakeView>, AppError> {
    let (view, _) = state
        .sessions
        .dispatch(SessionId(id), Msg::CloseClicked)
        .await?;
    Ok(Json(view))
}

#[derive(Serialize, Deserialize)]
pub struct ExplainResponse {
    pub text: String,
    pub model: String,
    pub processing_time_ms: u128,
}

/// One-shot explanation without a session: multipart `prompt` and `file`.
async fn explain_once(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExplainResponse>, AppError> {
    let start = Instant::now();

    let mut prompt = String::new();
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "prompt" => prompt = field.text().await?,
            "file" => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let media_type = resolve_media_type(&name, field.content_type());
                let bytes = field.bytes().await?;
                file = Some(UploadedFile {
                    name,
                    media_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    let file = file.ok_or(AppError::NoFile)?;
    state
        .policy
        .check(&file.name, &file.media_type, file.bytes.len())
        .map_err(|reason| AppError::BadUpload(reason.to_string()))?;
    state.policy.check_submission(&file)?;

    let text = state
        .explainer
        .explain(ExplainRequest::new(prompt, file))
        .await?;

    Ok(Json(ExplainResponse {
        text,
        model: state.explainer.model().to_string(),
        processing_time_ms: start.elapsed().as_millis(),
    }))
}
