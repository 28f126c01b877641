//! Request/response types for the web API

use serde::{Deserialize, Serialize};

use crate::buttons::{ButtonCatalog, ButtonId, ButtonLabel};
use crate::error::ValidationErrors;
use crate::model::{Advisory, LedConfiguration};
use crate::sync::{EditSession, LedOptionsStore};

/// Everything the editor needs to render the LED page
#[derive(Debug, Clone, Serialize)]
pub struct EditorView {
    pub configuration: LedConfiguration,
    pub available: Vec<ButtonLabel>,
    pub assigned: Vec<ButtonLabel>,
    pub first_available_rgb_index: u32,
    pub player_labels: Vec<String>,
    pub advisories: Vec<Advisory>,
}

impl EditorView {
    pub fn new<S: LedOptionsStore, C: ButtonCatalog>(session: &EditSession<S, C>) -> Self {
        let label = |id: ButtonId| ButtonLabel {
            id,
            label: session.label_for(id),
        };

        let views = session.views();
        let config = session.config();

        Self {
            configuration: config.clone(),
            available: views.available.into_iter().map(label).collect(),
            assigned: views.assigned.into_iter().map(label).collect(),
            first_available_rgb_index: session.first_available_rgb_index(),
            player_labels: config.player.fields().labels(),
            advisories: session.advisories(),
        }
    }
}

/// New button order after a drag-and-drop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub available: Vec<ButtonId>,
    pub assigned: Vec<ButtonId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: ValidationErrors,
    pub advisories: Vec<Advisory>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveResponse {
    pub saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Generic API response
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
