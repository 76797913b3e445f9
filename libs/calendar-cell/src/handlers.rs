use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use chrono::NaiveDate;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::extractor::require_doctor;

use crate::models::{CalendarError, CalendarMonth};
use crate::services::{aggregate, date_key, ScheduleService};

/// Months in calendar URLs are 1-based; the grid itself is zero-based.
fn month_from_path(year: i32, month: u32) -> Result<CalendarMonth, CalendarError> {
    month
        .checked_sub(1)
        .and_then(|month0| CalendarMonth::new(year, month0))
        .ok_or(CalendarError::InvalidMonth { year, month })
}

#[axum::debug_handler]
pub async fn get_month_calendar(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<Value>, AppError> {
    require_doctor(&user)?;
    let month = month_from_path(year, month)?;

    let service = ScheduleService::new(&config);
    let grid = service.month_grid(&user.id, month, auth.token()).await?;

    Ok(Json(json!({
        "doctor_id": user.id,
        "first_day": date_key(month.first_day()),
        "last_day": date_key(month.last_day()),
        "grid": grid,
    })))
}

#[axum::debug_handler]
pub async fn get_day_appointments(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path((year, month, day)): Path<(i32, u32, u32)>,
) -> Result<Json<Value>, AppError> {
    require_doctor(&user)?;
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(CalendarError::InvalidDate { year, month, day })?;

    let service = ScheduleService::new(&config);
    let appointments = service.day_appointments(&user.id, date, auth.token()).await?;
    let composite_status = aggregate(&appointments);

    Ok(Json(json!({
        "date": date_key(date),
        "composite_status": composite_status,
        "indicator": composite_status.indicator(),
        "appointments": appointments,
        "total": appointments.len(),
    })))
}
