use std::sync::Arc;

use influence_core::conversation::ConversationManager;
use influence_core::lifecycle::LeadLifecycle;
use influence_core::store::{LeadStore, TemplateStore};
use influence_core::template_library::TemplateLibrary;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; every service holds its store behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub lifecycle: LeadLifecycle,
    pub conversations: ConversationManager,
    pub templates: TemplateLibrary,
    /// Kept for the health endpoint's reachability probe.
    pub lead_store: Arc<dyn LeadStore>,
}

impl AppState {
    /// Wire the services over one lead store and one template store.
    pub fn new(
        config: ServerConfig,
        leads: Arc<dyn LeadStore>,
        templates: Arc<dyn TemplateStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            lifecycle: LeadLifecycle::new(Arc::clone(&leads)),
            conversations: ConversationManager::new(Arc::clone(&leads), Arc::clone(&templates)),
            templates: TemplateLibrary::new(templates),
            lead_store: leads,
        }
    }
}
