mod reqwest_card_api;

pub use reqwest_card_api::ReqwestCardApi;

use crate::entitys::auth_dto::{LoginData, LoginRequest, RegisterRequest};
use crate::entitys::card_application::{CardApplication, UserProfile};
use crate::entitys::payload::{CancelRequest, SubmitPayload, UpdatePayload};
use async_trait::async_trait;
use common::Result;
use common::result::{AckResponse, ApiResponse};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 调用方持有的登录态，每次请求时显式传入
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    token: Option<String>,
}

impl SessionContext {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let token = if token.trim().is_empty() { None } else { Some(token) };
        Self { token }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SessionContext")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// 上传接口返回的文件地址
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadedFile {
    pub url: String,
}

/// 后端接口
#[async_trait]
pub trait CardApi: Send + Sync {
    async fn fetch_profile(&self, session: &SessionContext) -> Result<ApiResponse<UserProfile>>;

    /// 查询当前用户的全部申请；没有记录时后端返回 404
    async fn query_applications(&self, session: &SessionContext) -> Result<ApiResponse<Vec<CardApplication>>>;

    async fn submit(&self, session: &SessionContext, payload: &SubmitPayload) -> Result<AckResponse>;

    async fn update(&self, session: &SessionContext, payload: &UpdatePayload) -> Result<AckResponse>;

    async fn cancel(&self, session: &SessionContext, request: &CancelRequest) -> Result<AckResponse>;

    /// multipart 上传，字段名 `file`
    async fn upload_file(&self, session: &SessionContext, file_name: &str, bytes: Vec<u8>) -> Result<ApiResponse<UploadedFile>>;

    async fn login(&self, request: &LoginRequest) -> Result<ApiResponse<LoginData>>;

    async fn register(&self, request: &RegisterRequest) -> Result<AckResponse>;
}
