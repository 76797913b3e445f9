use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::HeaderMap,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::auth::{TokenResponse, User};
use shared_models::error::AppError;
use shared_models::menu::menu_for_role;
use shared_utils::extractor::bearer_token;
use shared_utils::jwt::validate_token as decode_token;

pub async fn validate_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = bearer_token(&headers)?;
    let user = decode_token(token, &config.supabase_jwt_secret)
        .map_err(|e| AppError::Auth(e.to_string()))?;

    Ok(Json(TokenResponse {
        valid: true,
        user_id: user.id,
        email: user.email,
        role: user.role,
    }))
}

pub async fn verify_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    debug!("Verifying token");

    let token = bearer_token(&headers)?;
    let valid = decode_token(token, &config.supabase_jwt_secret).is_ok();

    Ok(Json(json!({ "valid": valid })))
}

#[axum::debug_handler]
pub async fn get_session(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    debug!("Getting session for user: {}", user.id);

    let auth_user = SupabaseClient::new(&config).get_user(auth.token()).await?;

    Ok(Json(json!({
        "user_id": user.id,
        "role": user.portal_role(),
        "user": auth_user,
    })))
}

pub async fn get_menu(Extension(user): Extension<User>) -> Json<Value> {
    let role = user.portal_role();

    Json(json!({
        "role": role,
        "items": menu_for_role(role),
    }))
}

#[axum::debug_handler]
pub async fn sign_out(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    SupabaseClient::new(&config).sign_out(auth.token()).await?;
    info!("User {} signed out", user.id);

    Ok(Json(json!({ "signed_out": true })))
}
