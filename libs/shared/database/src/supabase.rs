use std::path::Path;

use futures::StreamExt;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, Response,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::error::SupabaseError;

pub type Result<T> = std::result::Result<T, SupabaseError>;

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL", alias = "signedUrl")]
    signed_url: String,
}

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "apikey",
            HeaderValue::from_str(&self.anon_key).map_err(|_| SupabaseError::InvalidHeader("apikey"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| SupabaseError::InvalidHeader("Authorization"))?,
            );
        }

        Ok(headers)
    }

    /// Sends the request and turns non-2xx statuses into errors.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let headers = self.get_headers(auth_token)?;
        let mut req = self.client.request(method, &url).headers(headers);
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;
        check_status(response).await
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.execute(method, path, auth_token, body).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Current session user from the auth service.
    pub async fn get_user(&self, auth_token: &str) -> Result<Value> {
        self.request(Method::GET, "/auth/v1/user", Some(auth_token), None).await
    }

    /// Revokes the session behind `auth_token`.
    pub async fn sign_out(&self, auth_token: &str) -> Result<()> {
        self.execute(Method::POST, "/auth/v1/logout", Some(auth_token), None)
            .await?;
        Ok(())
    }

    /// Requests a time-limited URL for a private storage object and returns
    /// it as an absolute URL.
    pub async fn create_signed_url(
        &self,
        bucket: &str,
        object_path: &str,
        expires_in: u64,
        auth_token: &str,
    ) -> Result<String> {
        let path = format!(
            "/storage/v1/object/sign/{}/{}",
            urlencoding::encode(bucket),
            encode_object_path(object_path)
        );

        let signed: SignedUrlResponse = self
            .request(
                Method::POST,
                &path,
                Some(auth_token),
                Some(json!({ "expiresIn": expires_in })),
            )
            .await?;

        Ok(self.absolute_storage_url(&signed.signed_url))
    }

    /// Streams `url` into `destination`, returning the number of bytes written.
    /// The partially written file is removed when the transfer fails.
    pub async fn download_to_file(&self, url: &str, destination: &Path) -> Result<u64> {
        debug!("Downloading {} to {}", url, destination.display());

        let response = check_status(self.client.get(url).send().await?).await?;
        let mut file = tokio::fs::File::create(destination).await?;

        match write_stream(response, &mut file).await {
            Ok(written) => {
                file.flush().await?;
                Ok(written)
            }
            Err(e) => {
                drop(file);
                if let Err(remove_err) = tokio::fs::remove_file(destination).await {
                    error!("Failed to remove partial download {}: {}", destination.display(), remove_err);
                }
                Err(e)
            }
        }
    }

    fn absolute_storage_url(&self, signed_url: &str) -> String {
        if signed_url.starts_with("http://") || signed_url.starts_with("https://") {
            signed_url.to_string()
        } else if signed_url.starts_with("/storage/v1/") {
            format!("{}{}", self.base_url, signed_url)
        } else {
            format!("{}/storage/v1/{}", self.base_url, signed_url.trim_start_matches('/'))
        }
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    error!("API error ({}): {}", status, error_text);

    Err(match status.as_u16() {
        401 | 403 => SupabaseError::Unauthorized(error_text),
        404 => SupabaseError::NotFound(error_text),
        code => SupabaseError::Api {
            status: code,
            message: error_text,
        },
    })
}

async fn write_stream(response: Response, file: &mut tokio::fs::File) -> Result<u64> {
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    Ok(written)
}

fn encode_object_path(object_path: &str) -> String {
    object_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
