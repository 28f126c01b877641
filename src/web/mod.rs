//! HTTP API for the LED editor

mod handlers;
pub mod server;
mod types;

pub use handlers::{AppState, Session};
pub use server::start_server;
pub use types::{ApiResponse, EditorView, ReorderRequest, SaveResponse, ValidationResponse};
