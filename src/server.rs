//! HTTP surface for the coaching service.
//!
//! Handlers are thin: validate shape, delegate to the assembler / matcher /
//! sanitizer / external gateways, translate gateway failures into the error
//! taxonomy, serialize. Request handling is stateless — the caller ships the
//! full conversation history each turn and gets the extended history back.

use crate::catalog::{ExerciseCatalog, Lookup};
use crate::chat::{HistoryTurn, build_prompt, extend_history};
use crate::config::CoachConfig;
use crate::error::{CoachError, Result};
use crate::llm::{ApiGateway, CompletionGateway};
use crate::persona;
use crate::sanitize::sanitize_for_speech;
use crate::stt::{SttEngine, TranscriptionOutcome};
use crate::tts::TtsEngine;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Largest accepted audio upload (bytes).
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared state for axum handlers.
///
/// Gateways are `Option`: a missing credential at startup leaves the slot
/// empty and the dependent endpoint reports itself unavailable instead of
/// the process refusing to start.
#[derive(Clone)]
pub struct AppState {
    /// Static exercise catalog.
    pub catalog: Arc<ExerciseCatalog>,
    /// Completion gateway, when configured.
    pub llm: Option<Arc<dyn CompletionGateway>>,
    /// TTS engine, when configured.
    pub tts: Option<Arc<dyn TtsEngine>>,
    /// STT engine, when configured.
    pub stt: Option<Arc<dyn SttEngine>>,
    /// Assembled system prompt (persona + config add-on).
    pub persona: Arc<str>,
    /// History turns included at prompt-build time.
    pub history_window: usize,
    /// Language used when a TTS request does not name one.
    pub default_language: String,
}

impl AppState {
    /// Build state from config, degrading instead of failing: a gateway
    /// whose credentials do not resolve is logged and left unconfigured.
    #[must_use]
    pub fn from_config(config: &CoachConfig) -> Self {
        let llm = match ApiGateway::new(&config.llm) {
            Ok(gateway) => Some(Arc::new(gateway) as Arc<dyn CompletionGateway>),
            Err(e) => {
                warn!("completion gateway unavailable: {e}");
                None
            }
        };
        let tts = match crate::tts::engine_from_config(&config.tts) {
            Ok(engine) => Some(engine),
            Err(e) => {
                warn!("TTS engine unavailable: {e}");
                None
            }
        };
        let stt = match crate::stt::engine_from_config(&config.stt) {
            Ok(engine) => Some(engine),
            Err(e) => {
                warn!("STT engine unavailable: {e}");
                None
            }
        };

        Self {
            catalog: Arc::new(ExerciseCatalog::builtin()),
            llm,
            tts,
            stt,
            persona: persona::system_prompt(&config.llm.system_prompt).into(),
            history_window: config.llm.history_window,
            default_language: config.tts.default_language.clone(),
        }
    }
}

/// Build the service router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/chat", post(handle_chat))
        .route("/tutorials", get(handle_tutorials))
        .route("/tutorials/{exercise}", get(handle_tutorial_lookup))
        .route("/tts", post(handle_tts))
        .route("/stt", post(handle_stt))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Bind and serve until the listener fails.
///
/// # Errors
///
/// Returns an error if the listener cannot bind.
pub async fn serve(config: &CoachConfig, state: AppState) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| CoachError::Config(format!("bind {addr} failed: {e}")))?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| CoachError::Config(format!("failed to get local addr: {e}")))?;

    info!("fitbot listening on http://{local_addr}");
    axum::serve(listener, router(state))
        .await
        .map_err(|e| CoachError::Config(format!("server error: {e}")))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Error envelope
// ---------------------------------------------------------------------------

/// Categorized handler error serialized as `{"error": {category, message}}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    category: &'static str,
    message: String,
}

impl ApiError {
    fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            category: "validation",
            message: message.into(),
        }
    }

    fn unavailable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            category: "configuration",
            message: message.into(),
        }
    }
}

impl From<CoachError> for ApiError {
    fn from(err: CoachError) -> Self {
        let (status, category) = match &err {
            CoachError::Config(_) => (StatusCode::SERVICE_UNAVAILABLE, "configuration"),
            CoachError::Llm(_) => (StatusCode::BAD_GATEWAY, "completion_gateway"),
            CoachError::Tts(_) => (StatusCode::BAD_GATEWAY, "synthesis"),
            CoachError::Stt(_) => (StatusCode::BAD_GATEWAY, "transcription"),
            CoachError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        Self {
            status,
            category,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("{}: {}", self.category, self.message);
        let body = serde_json::json!({
            "error": {
                "category": self.category,
                "message": self.message,
            }
        });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// `POST /chat` request body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The new user message.
    pub message: String,
    /// Caller-supplied identifier; opaque to the core logic.
    pub user_id: String,
    /// Caller-owned conversation history.
    #[serde(default)]
    pub chat_history: Vec<HistoryTurn>,
}

/// `POST /chat` response body.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Assistant reply text.
    pub reply: String,
    /// Tutorials matched against the reply and the user message.
    pub tutorials: Vec<crate::catalog::TutorialMatch>,
    /// Input history with the new user and assistant turns appended.
    pub chat_history: Vec<HistoryTurn>,
    /// Length of `chat_history`.
    pub message_count: usize,
}

/// `POST /tts` request body.
#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    /// Text to speak; sanitized before synthesis.
    pub text: String,
    /// Language code; falls back to the configured default.
    #[serde(default)]
    pub language_code: Option<String>,
}

/// `POST /stt` response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct SttResponse {
    /// Transcript text (empty when not understood).
    pub transcript: String,
    /// Whether the engine derived any text from the audio.
    pub understood: bool,
    /// Detected language, when the engine reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn handle_root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "FitBot API - AI Fitness Assistant",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /health",
            "chat": "POST /chat",
            "tutorials": "GET /tutorials",
            "tutorial_by_exercise": "GET /tutorials/{exercise}",
            "tts": "POST /tts",
            "stt": "POST /stt",
        },
        "note": "API-only service; conversation history is client-owned",
    }))
}

async fn handle_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "fitbot",
        "llm_connected": state.llm.is_some(),
        "tts_available": state.tts.is_some(),
        "stt_available": state.stt.is_some(),
        "total_exercises": state.catalog.len(),
        "storage": "client-side",
    }))
}

async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> std::result::Result<Json<ChatResponse>, ApiError> {
    let message = request.message.trim().to_owned();
    if message.is_empty() {
        return Err(ApiError::validation("message must not be empty"));
    }

    let gateway = state.llm.as_ref().ok_or_else(|| {
        ApiError::unavailable("completion gateway not configured; check the provider API key")
    })?;

    let prompt = build_prompt(&state.persona, &request.chat_history, &message, state.history_window);
    let reply = gateway.complete(&prompt).await?;

    let haystack = format!("{reply} {message}");
    let tutorials = state.catalog.find_matches(&haystack);
    let chat_history = extend_history(&request.chat_history, &message, &reply);

    info!(
        user_id = %request.user_id,
        turns = chat_history.len(),
        tutorials = tutorials.len(),
        "chat turn complete"
    );

    Ok(Json(ChatResponse {
        reply,
        tutorials,
        message_count: chat_history.len(),
        chat_history,
    }))
}

async fn handle_tutorials(State(state): State<AppState>) -> Json<serde_json::Value> {
    let exercises: Vec<serde_json::Value> = state
        .catalog
        .entries()
        .map(|entry| {
            serde_json::json!({
                "exercise": crate::catalog::display_case(entry.name),
                "tutorial_count": entry.links.len(),
                "links": entry.links,
            })
        })
        .collect();

    Json(serde_json::json!({
        "total_exercises": exercises.len(),
        "exercises": exercises,
    }))
}

async fn handle_tutorial_lookup(
    State(state): State<AppState>,
    Path(exercise): Path<String>,
) -> Response {
    match state.catalog.resolve(&exercise) {
        Lookup::Exact(m) => Json(serde_json::json!({
            "exercise": m.exercise,
            "tutorials": m.links,
            "count": m.links.len(),
        }))
        .into_response(),
        Lookup::Partial(matches) => {
            let entries: Vec<serde_json::Value> = matches
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "exercise": m.exercise,
                        "tutorials": m.links,
                    })
                })
                .collect();
            Json(serde_json::json!({
                "matches": entries,
                "count": entries.len(),
            }))
            .into_response()
        }
        // Guidance payload, not a bare error.
        Lookup::NotFound => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "message": format!(
                    "No tutorials found for '{exercise}'. Try: squats, push ups, deadlift, etc."
                ),
                "available_exercises": state.catalog.names(),
            })),
        )
            .into_response(),
    }
}

async fn handle_tts(
    State(state): State<AppState>,
    Json(request): Json<TtsRequest>,
) -> std::result::Result<Response, ApiError> {
    let engine = state
        .tts
        .as_ref()
        .ok_or_else(|| ApiError::unavailable("TTS engine not configured"))?;

    let speakable = sanitize_for_speech(&request.text);
    if speakable.is_empty() {
        return Err(ApiError::validation("no speakable text after sanitization"));
    }

    let language = request
        .language_code
        .unwrap_or_else(|| state.default_language.clone());
    let clip = engine.synthesize(&speakable, &language).await?;

    let disposition = format!("attachment; filename=\"speech.{}\"", clip.format.extension());
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, clip.format.mime_type().to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        clip.bytes,
    )
        .into_response())
}

async fn handle_stt(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> std::result::Result<Json<SttResponse>, ApiError> {
    let engine = state
        .stt
        .as_ref()
        .ok_or_else(|| ApiError::unavailable("STT engine not configured"))?;

    let mut audio: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::validation(format!("failed to read upload: {e}")))?;
            audio = Some(bytes.to_vec());
            break;
        }
    }

    let audio = audio.ok_or_else(|| ApiError::validation("missing 'file' field"))?;
    if audio.is_empty() {
        return Err(ApiError::validation("uploaded audio is empty"));
    }

    match engine.transcribe(audio).await? {
        TranscriptionOutcome::Transcript { text, language } => Ok(Json(SttResponse {
            transcript: text,
            understood: true,
            language,
        })),
        // Explicit signal on the success path, not a blank transcript.
        TranscriptionOutcome::NotUnderstood => Ok(Json(SttResponse {
            transcript: String::new(),
            understood: false,
            language: None,
        })),
    }
}
