use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::extractor::require_doctor;

use crate::models::{parse_patient_id, RosterQuery};
use crate::services::RosterService;

#[axum::debug_handler]
pub async fn get_roster(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Query(query): Query<RosterQuery>,
) -> Result<Json<Value>, AppError> {
    require_doctor(&user)?;

    let service = RosterService::new(&config);
    let patients = service
        .roster(&user.id, query.search.as_deref(), auth.token())
        .await?;

    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}

#[axum::debug_handler]
pub async fn get_patient_history(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(patient_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    require_doctor(&user)?;
    let patient_id = parse_patient_id(&patient_id)?;

    let service = RosterService::new(&config);
    let entry = service
        .patient_history(&user.id, patient_id, auth.token())
        .await?;

    Ok(Json(json!(entry)))
}
