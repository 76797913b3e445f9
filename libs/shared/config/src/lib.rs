use std::env;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_REPORTS_BUCKET: &str = "reports";
pub const DEFAULT_SIGNED_URL_EXPIRES_IN: u64 = 60;
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
    pub reports_bucket: String,
    /// Lifetime of storage signed URLs, in seconds.
    pub signed_url_expires_in: u64,
    pub report_download_dir: PathBuf,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: required("SUPABASE_URL"),
            supabase_anon_key: required("SUPABASE_ANON_PUBLIC_KEY"),
            supabase_jwt_secret: required("SUPABASE_JWT_SECRET"),
            reports_bucket: env::var("REPORTS_STORAGE_BUCKET")
                .unwrap_or_else(|_| DEFAULT_REPORTS_BUCKET.to_string()),
            signed_url_expires_in: parsed_or("SIGNED_URL_EXPIRES_IN", DEFAULT_SIGNED_URL_EXPIRES_IN),
            report_download_dir: env::var("REPORT_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            port: parsed_or("PORT", DEFAULT_PORT),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.supabase_jwt_secret.is_empty()
    }
}

fn required(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using empty value", key);
        String::new()
    })
}

fn parsed_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
