// ABOUTME: Portal API client for registration, sign-in, materials and attendance

use crate::api::error::ApiError;
use crate::api::types::{
    CheckInRequest, LoginData, LoginRequest, LoginResponse, MessageResponse, RegistrationPayload,
};
use crate::api::RegistrationBackend;
use crate::config::{ApiConfig, EndpointConfig};
use crate::materials::{MaterialUpload, UploadProgress};
use anyhow::{Context, Result};
use futures_util::stream::{self, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use url::Url;

const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct PortalApiClient {
    client: Client,
    base_url: String,
    endpoints: EndpointConfig,
    token: Option<String>,
}

impl PortalApiClient {
    /// Create a client from the API section of the config
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Url::parse(&config.base_url)
            .with_context(|| format!("Invalid API base URL: {}", config.base_url))?;

        let client = Client::builder()
            .user_agent(concat!("ict-portal/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            endpoints: config.endpoints.clone(),
            token: None,
        })
    }

    /// Attach (or drop) the bearer token used for signed-in requests
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| ApiError::InvalidEndpoint(format!("{joined}: {e}")))
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_ref().ok_or(ApiError::Unauthorized)?;
        Ok(request.bearer_auth(token))
    }

    /// Submit a completed registration
    pub async fn register(&self, payload: &RegistrationPayload) -> Result<(), ApiError> {
        info!("Submitting registration for {}", payload.email);
        let url = self.endpoint_url(&self.endpoints.registration_submit)?;
        let response = self.client.post(url).json(payload).send().await?;

        // The body only acknowledges success, but it must be JSON
        let _: serde_json::Value = Self::read_json(response).await?;
        info!("Registration accepted");
        Ok(())
    }

    /// Sign in and return the token and user record
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginData, ApiError> {
        info!("Signing in {}", request.email);
        let url = self.endpoint_url(&self.endpoints.auth_login)?;
        let response = self.client.post(url).json(request).send().await?;

        let body: LoginResponse = Self::read_json(response).await?;
        debug!("Signed in, dashboard at {}", body.data.user.dashboard_url);
        Ok(body.data)
    }

    /// Record attendance from a scanned QR token
    pub async fn check_in(&self, qr_token: &str) -> Result<String, ApiError> {
        let qr_token = qr_token.trim();
        if qr_token.is_empty() {
            return Err(ApiError::InvalidRequest(
                "The scanned attendance code is empty".to_string(),
            ));
        }

        let body = CheckInRequest {
            token: qr_token.to_string(),
        };
        let response: MessageResponse = self
            .post_json_authorized(&self.endpoints.attendance_check_in, &body)
            .await?;

        Ok(response
            .message
            .unwrap_or_else(|| "Attendance recorded".to_string()))
    }

    /// Upload a validated material, reporting progress on `progress`
    pub async fn upload_material(
        &self,
        upload: &MaterialUpload,
        progress: watch::Sender<UploadProgress>,
    ) -> Result<String, ApiError> {
        let url = self.endpoint_url(&self.endpoints.materials_upload)?;
        let read_failed =
            |e: std::io::Error| ApiError::InvalidRequest(format!("Failed to read {}: {e}", upload.path.display()));

        let file = File::open(&upload.path).await.map_err(read_failed)?;
        let total = file.metadata().await.map_err(read_failed)?.len();
        if total != upload.size {
            return Err(ApiError::InvalidRequest(format!(
                "{} changed since it was checked ({} bytes, now {} bytes). Please upload it again.",
                upload.file_name, upload.size, total
            )));
        }

        progress.send_replace(UploadProgress::new(0, total));
        info!("Uploading {} ({} bytes)", upload.file_name, total);

        // Never sends more than the declared length even if the file grows mid-upload
        let chunks = stream::unfold((file, total), |(mut file, remaining)| async move {
            if remaining == 0 {
                return None;
            }
            let want = usize::try_from(remaining).map_or(UPLOAD_CHUNK_SIZE, |r| r.min(UPLOAD_CHUNK_SIZE));
            let mut buf = vec![0u8; want];
            match file.read(&mut buf).await {
                Ok(0) => Some((
                    Err(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "file shrank during upload",
                    )),
                    (file, 0),
                )),
                Ok(n) => {
                    buf.truncate(n);
                    Some((Ok(buf), (file, remaining - n as u64)))
                }
                Err(e) => Some((Err(e), (file, 0))),
            }
        });

        // Progress counts bytes handed to the transport
        let mut sent = 0u64;
        let body_stream = chunks.map(move |chunk: Result<Vec<u8>, std::io::Error>| {
            if let Ok(bytes) = &chunk {
                sent += bytes.len() as u64;
                progress.send_replace(UploadProgress::new(sent, total));
            }
            chunk
        });

        let part = Part::stream_with_length(Body::wrap_stream(body_stream), total)
            .file_name(upload.file_name.clone())
            .mime_str(upload.mime)?;
        let form = Form::new()
            .text("title", upload.title.clone())
            .part("file", part);

        let request = self.authorized(self.client.post(url))?.multipart(form);
        let response = request.send().await?;
        let body: MessageResponse = Self::read_json(response).await?;

        info!("Upload of {} complete", upload.file_name);
        Ok(body.message.unwrap_or_else(|| "Upload complete".to_string()))
    }

    async fn post_json_authorized<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint_url(path)?;
        let request = self.authorized(self.client.post(url))?.json(body);
        let response = request.send().await?;
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let err = ApiError::from_response(status, &text);
            warn!("Portal API returned {}: {}", status, err);
            return Err(err);
        }

        serde_json::from_str(&text).map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }
}

impl RegistrationBackend for PortalApiClient {
    async fn submit_registration(&self, payload: &RegistrationPayload) -> Result<(), ApiError> {
        self.register(payload).await
    }
}
