//! Application context shared by all route handlers via Axum state.

use std::sync::Arc;

use mf_av::{ToolInfo, ToolRegistry};
use mf_core::config::Config;

/// Application context shared by all request handlers (via Axum state).
///
/// This is cheaply cloneable because it only holds `Arc`s.
#[derive(Clone)]
pub struct AppContext {
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// External tool registry.
    pub tools: Arc<ToolRegistry>,
}

impl AppContext {
    /// Build a context, discovering tools from the config's overrides and `PATH`.
    pub fn new(config: Config) -> Self {
        let tools = ToolRegistry::discover(&config.tools);
        Self::with_tools(config, tools)
    }

    /// Build a context around an already-populated tool registry.
    pub fn with_tools(config: Config, tools: ToolRegistry) -> Self {
        Self {
            config: Arc::new(config),
            tools: Arc::new(tools),
        }
    }

    /// Availability and version of each known tool.
    ///
    /// Version detection spawns the tool and waits on it, so it runs on the
    /// blocking pool.
    pub async fn tool_status(&self) -> mf_core::Result<Vec<ToolInfo>> {
        let tools = Arc::clone(&self.tools);
        tokio::task::spawn_blocking(move || tools.check_all())
            .await
            .map_err(|e| mf_core::Error::Internal(format!("tool check failed: {e}")))
    }
}
