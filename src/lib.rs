//! Drag-and-drop file explanations: intake widget state, upload policy and
//! the Gemini explanation requester, served over axum.
pub mod config;
pub mod error;
pub mod explain;
pub mod intake;
pub mod page;
pub mod policy;
pub mod preview;
pub mod routes;
pub mod session;

pub use config::Config;
pub use error::{AppError, ExplainError};
pub use explain::{ExplainRequest, Explainer, GeminiExplainer, DEFAULT_MODEL, DEFAULT_PROMPT};
pub use policy::{AcceptMap, Rejection, UploadPolicy};
pub use routes::{router, AppState};
pub use session::{SessionId, SessionStore};
