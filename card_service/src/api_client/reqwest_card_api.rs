use super::{CardApi, SessionContext, UploadedFile};
use crate::entitys::auth_dto::{LoginData, LoginRequest, RegisterRequest};
use crate::entitys::card_application::{CardApplication, UserProfile};
use crate::entitys::payload::{CancelRequest, SubmitPayload, UpdatePayload};
use async_trait::async_trait;
use common::config::ServerConfig;
use common::result::{AckResponse, ApiResponse};
use common::{AppError, Result};
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ReqwestCardApi {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestCardApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("card-service")
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Config(format!("failed to initialize HTTP client: {err}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, client })
    }

    pub fn from_config(server: &ServerConfig) -> Result<Self> {
        Self::new(server.base_url.clone(), server.timeout())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(builder: RequestBuilder, session: &SessionContext) -> RequestBuilder {
        match session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<ApiResponse<T>> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("response {} ({} bytes)", status, body.len());

        if status == StatusCode::UNAUTHORIZED {
            warn!("认证失败或Token已过期，请重新登录。");
            return Err(AppError::Unauthorized(server_message(&body).unwrap_or_default()));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(server_message(&body)));
        }
        if !status.is_success() {
            warn!("backend returned HTTP {}: {}", status, truncate_for_log(&body));
            return Err(AppError::Transport(server_message(&body)));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// 非 2xx 响应体里的提示文案
fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<AckResponse>(body)
        .ok()
        .and_then(|resp| resp.message)
        .filter(|msg| !msg.trim().is_empty())
}

fn truncate_for_log(body: &str) -> String {
    const MAX_LEN: usize = 200;
    if body.chars().count() <= MAX_LEN {
        body.to_owned()
    } else {
        format!("{}...", body.chars().take(MAX_LEN).collect::<String>())
    }
}

#[async_trait]
impl CardApi for ReqwestCardApi {
    async fn fetch_profile(&self, session: &SessionContext) -> Result<ApiResponse<UserProfile>> {
        let builder = Self::authorize(self.client.get(self.url("/auth/profile")), session);
        self.send(builder).await
    }

    async fn query_applications(&self, session: &SessionContext) -> Result<ApiResponse<Vec<CardApplication>>> {
        let builder = Self::authorize(self.client.post(self.url("/application/query")), session);
        self.send(builder).await
    }

    async fn submit(&self, session: &SessionContext, payload: &SubmitPayload) -> Result<AckResponse> {
        let builder = Self::authorize(self.client.post(self.url("/application/submit")), session).json(payload);
        self.send(builder).await
    }

    async fn update(&self, session: &SessionContext, payload: &UpdatePayload) -> Result<AckResponse> {
        let builder = Self::authorize(self.client.post(self.url("/application/update")), session).json(payload);
        self.send(builder).await
    }

    async fn cancel(&self, session: &SessionContext, request: &CancelRequest) -> Result<AckResponse> {
        let builder = Self::authorize(self.client.post(self.url("/application/cancel")), session).json(request);
        self.send(builder).await
    }

    async fn upload_file(&self, session: &SessionContext, file_name: &str, bytes: Vec<u8>) -> Result<ApiResponse<UploadedFile>> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        let builder = Self::authorize(self.client.post(self.url("/file/upload")), session).multipart(form);
        self.send(builder).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<ApiResponse<LoginData>> {
        let builder = self.client.post(self.url("/auth/login")).json(request);
        self.send(builder).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AckResponse> {
        let builder = self.client.post(self.url("/auth/register")).json(request);
        self.send(builder).await
    }
}
