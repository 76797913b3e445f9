use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::ReportTab;
use crate::services::ReportService;

#[derive(Debug, Default, Deserialize)]
pub struct ReportListQuery {
    #[serde(default)]
    pub tab: ReportTab,
}

#[axum::debug_handler]
pub async fn list_reports(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = ReportService::new(&config);
    let reports = service.list_reports(&user.id, query.tab, auth.token()).await?;

    Ok(Json(json!({
        "tab": query.tab,
        "reports": reports,
        "total": reports.len(),
    })))
}

#[axum::debug_handler]
pub async fn get_report(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(report_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = ReportService::new(&config);
    let report = service.get_visible_report(&report_id, &user.id, auth.token()).await?;

    Ok(Json(json!(report)))
}

#[axum::debug_handler]
pub async fn get_download_url(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(report_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = ReportService::new(&config);
    let report = service.get_visible_report(&report_id, &user.id, auth.token()).await?;
    let signed = service.signed_url(&report, auth.token()).await?;

    Ok(Json(json!(signed)))
}
