use log::error;
use std::io;
use thiserror::Error;

/// 网络或服务端异常且没有可用提示时展示给用户的兜底文案
pub const GENERIC_FAILURE_MESSAGE: &str = "网络繁忙，请稍后重试";

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    // ==== 页面上下文错误 ====
    /// 修改模式缺少已加载的申请数据，页面必须返回上一级
    #[error("Missing context: {0}")]
    MissingContext(String),

    // ==== 本地校验错误（不会发出请求）====
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Illegal transition: cannot {action} an application in status {status}")]
    IllegalTransition { status: String, action: String },

    // ==== 后端业务错误 ====
    /// 后端返回 success=false，message 原样展示
    #[error("biz error: {0}")]
    BizRejected(String),

    #[error("Unauthorized access")]
    Unauthorized(String),

    /// HTTP 404；带服务端提示时原样展示
    #[error("Resource not found: {}", .0.as_deref().unwrap_or("-"))]
    NotFound(Option<String>),

    // ==== 系统错误 ====
    /// 网络错误或非 2xx 响应；None 表示服务端没有给出提示
    #[error("Transport error: {}", .0.as_deref().unwrap_or(GENERIC_FAILURE_MESSAGE))]
    Transport(Option<String>),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// 展示给申请人的提示文案
    pub fn user_message(&self) -> String {
        match self {
            AppError::MissingContext(_) => "缺少申请数据，请返回主页重试".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::IllegalTransition { .. } => "当前状态不允许该操作".to_string(),
            AppError::BizRejected(msg) => msg.clone(),
            AppError::Unauthorized(_) => "认证失败或Token已过期，请重新登录。".to_string(),
            AppError::Transport(Some(msg)) | AppError::NotFound(Some(msg)) => msg.clone(),
            AppError::Transport(None) | AppError::NotFound(None) => GENERIC_FAILURE_MESSAGE.to_string(),
            e => {
                error!("{:?}", e);
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }

    /// 本地拒绝的错误：请求一定没有发出
    pub fn is_local(&self) -> bool {
        matches!(self, AppError::MissingContext(_) | AppError::Validation(_) | AppError::IllegalTransition { .. })
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("参数验证失败: {}", e))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        error!("transport failure: {:?}", e);
        AppError::Transport(None)
    }
}

impl From<::config::ConfigError> for AppError {
    fn from(e: ::config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
