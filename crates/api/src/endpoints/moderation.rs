//! Moderation endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use reelhub_common::AppResult;
use reelhub_core::moderation::{ReportContentInput, ReportView, ResolveReportInput};
use reelhub_db::entities::reported_content::ReportStatus;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// A simple message acknowledgment.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

/// Report a piece of content.
async fn report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ReportContentInput>,
) -> AppResult<(StatusCode, ApiResponse<MessageResponse>)> {
    state.moderation_service.report(&user.id, input).await?;

    Ok(ApiResponse::created(MessageResponse {
        message: "Content reported".to_string(),
    }))
}

/// Reports listing query.
#[derive(Debug, Deserialize)]
pub struct ReportsQuery {
    pub status: Option<ReportStatus>,
}

/// Reports listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportsResponse {
    pub reports: Vec<ReportView>,
    pub total: usize,
}

/// List reports by status (defaults to pending). Admin only.
async fn list_reports(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ReportsQuery>,
) -> AppResult<ApiResponse<ReportsResponse>> {
    let status = query.status.unwrap_or(ReportStatus::Pending);

    let reports = state
        .moderation_service
        .list_reports(user.role, status)
        .await?;

    Ok(ApiResponse::ok(ReportsResponse {
        total: reports.len(),
        reports,
    }))
}

/// Apply a moderator action to a pending report. Admin only.
async fn resolve_report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    Json(input): Json<ResolveReportInput>,
) -> AppResult<ApiResponse<MessageResponse>> {
    state
        .moderation_service
        .resolve(&user.id, user.role, &report_id, input)
        .await?;

    Ok(ApiResponse::ok(MessageResponse {
        message: "Report handled".to_string(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/report", post(report))
        .route("/reports", get(list_reports))
        .route("/reports/{id}/action", post(resolve_report))
}
