use std::sync::Arc;

use axum::{routing::get, Router};

use auth_cell::auth_routes;
use calendar_cell::calendar_routes;
use patient_cell::create_patient_router;
use report_cell::report_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic Portal API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/calendar", calendar_routes(state.clone()))
        .nest("/reports", report_routes(state.clone()))
        .nest("/patients", create_patient_router(state))
}
