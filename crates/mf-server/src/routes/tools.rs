//! External tool status.

use axum::extract::State;
use axum::Json;

use mf_av::ToolInfo;

use crate::context::AppContext;
use crate::error::AppError;

/// `GET /api/tools` -- availability and version of each external tool.
pub async fn list_tools(State(ctx): State<AppContext>) -> Result<Json<Vec<ToolInfo>>, AppError> {
    Ok(Json(ctx.tool_status().await?))
}
