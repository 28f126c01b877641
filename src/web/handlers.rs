//! API endpoint handlers

use axum::{extract::State, Json};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::buttons::{ButtonLabel, StandardCatalog};
use crate::error::LedConfigError;
use crate::model::LedEdit;
use crate::sync::{EditSession, Store};

use super::types::{
    ApiResponse, EditorView, ReorderRequest, SaveResponse, ValidationResponse,
};

pub type Session = EditSession<Store, StandardCatalog>;

/// Shared application state for web handlers
pub struct AppState {
    pub session: Mutex<Session>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }

    /// The session, unless a load or save currently holds it
    fn session(&self) -> Result<MutexGuard<'_, Session>, LedConfigError> {
        self.session.try_lock().map_err(|_| {
            warn!("Rejected request: LED options are being loaded or saved");
            LedConfigError::Busy
        })
    }
}

/// GET /api/leds - Current editor view
pub async fn get_leds(State(state): State<Arc<AppState>>) -> Json<ApiResponse<EditorView>> {
    match state.session() {
        Ok(session) => Json(ApiResponse::ok(EditorView::new(&*session))),
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}

/// POST /api/leds/edits - Apply a batch of edits
pub async fn apply_edits(
    State(state): State<Arc<AppState>>,
    Json(edits): Json<Vec<LedEdit>>,
) -> Json<ApiResponse<EditorView>> {
    let mut session = match state.session() {
        Ok(session) => session,
        Err(e) => return Json(ApiResponse::error(e.to_string())),
    };

    session.edit_all(edits);
    Json(ApiResponse::ok(EditorView::new(&*session)))
}

/// POST /api/leds/order - Replace the button order after a drag-and-drop
pub async fn reorder(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReorderRequest>,
) -> Json<ApiResponse<EditorView>> {
    let mut session = match state.session() {
        Ok(session) => session,
        Err(e) => return Json(ApiResponse::error(e.to_string())),
    };

    session.edit(LedEdit::ReorderButtons {
        available: request.available,
        assigned: request.assigned,
    });
    Json(ApiResponse::ok(EditorView::new(&*session)))
}

/// POST /api/leds/validate - Validate without saving
pub async fn validate(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<ValidationResponse>> {
    let session = match state.session() {
        Ok(session) => session,
        Err(e) => return Json(ApiResponse::error(e.to_string())),
    };

    let errors = session.validate().err().unwrap_or_default();
    Json(ApiResponse::ok(ValidationResponse {
        valid: errors.is_empty(),
        errors,
        advisories: session.advisories(),
    }))
}

/// POST /api/leds/save - Validate and persist
pub async fn save(State(state): State<Arc<AppState>>) -> Json<ApiResponse<SaveResponse>> {
    let mut session = match state.session() {
        Ok(session) => session,
        Err(e) => return Json(ApiResponse::error(e.to_string())),
    };

    match session.save().await {
        Ok(saved) => Json(ApiResponse::ok(SaveResponse {
            saved,
            error: session.last_failure().map(str::to_string),
        })),
        Err(e) => {
            info!("Save rejected: {}", e);
            Json(ApiResponse::error(e.to_string()))
        }
    }
}

/// POST /api/leds/reload - Discard edits and load the stored options
pub async fn reload(State(state): State<Arc<AppState>>) -> Json<ApiResponse<EditorView>> {
    let mut session = match state.session() {
        Ok(session) => session,
        Err(e) => return Json(ApiResponse::error(e.to_string())),
    };

    let loaded = session.load().await.map(|_| ());
    match loaded {
        Ok(()) => Json(ApiResponse::ok(EditorView::new(&*session))),
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}

/// GET /api/buttons - Button catalog in the configured label style
pub async fn list_buttons(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<ButtonLabel>>> {
    match state.session() {
        Ok(session) => Json(ApiResponse::ok(session.buttons())),
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}
