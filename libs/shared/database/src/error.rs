use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum SupabaseError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Authentication error: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SupabaseError> for AppError {
    fn from(err: SupabaseError) -> Self {
        match err {
            SupabaseError::Unauthorized(msg) => AppError::Auth(msg),
            SupabaseError::NotFound(msg) => AppError::NotFound(msg),
            SupabaseError::Api { .. } | SupabaseError::Transport(_) => {
                AppError::ExternalService(err.to_string())
            }
            SupabaseError::Decode(_) => AppError::Database(err.to_string()),
            SupabaseError::InvalidHeader(_) | SupabaseError::Io(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}
