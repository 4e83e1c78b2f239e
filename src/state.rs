use std::sync::Arc;

use crate::application::services::{AuthService, ClickRecorder, LinkRegistry};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub link_registry: Arc<LinkRegistry>,
    pub click_recorder: Arc<ClickRecorder>,
    pub auth_service: Arc<AuthService>,
    /// Read the client address from proxy headers instead of the socket.
    pub trust_forwarded_for: bool,
    pub root_redirect: Option<String>,
}
