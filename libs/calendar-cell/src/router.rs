use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn calendar_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/{year}/{month}", get(handlers::get_month_calendar))
        .route("/{year}/{month}/{day}", get(handlers::get_day_appointments))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
