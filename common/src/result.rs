use crate::errors::{AppError, GENERIC_FAILURE_MESSAGE, Result};
use serde::{Deserialize, Serialize};

/// 后端统一响应结构 `{ success, message?, data? }`
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, alias = "msg", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, message: None, data: Some(data) }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self { success: false, message: Some(message.into()), data: None }
    }

    /// success=false 转为业务错误，message 原样保留
    pub fn into_result(self) -> Result<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(AppError::BizRejected(self.message.unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())))
        }
    }

    /// 要求成功且必须携带 data
    pub fn into_data(self) -> Result<T> {
        self.into_result()?
            .ok_or_else(|| AppError::Internal("response is missing its data payload".to_string()))
    }
}

/// 只关心成败、不关心 data 的响应
pub type AckResponse = ApiResponse<serde_json::Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_response_keeps_server_message() {
        let resp: ApiResponse<String> = serde_json::from_str(r#"{"success":false,"message":"手机号已被注册"}"#).unwrap();
        match resp.into_result() {
            Err(AppError::BizRejected(msg)) => assert_eq!(msg, "手机号已被注册"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn rejected_response_without_message_uses_fallback() {
        let resp: AckResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        let err = resp.into_result().unwrap_err();
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn msg_alias_is_accepted() {
        let resp: AckResponse = serde_json::from_str(r#"{"success":false,"msg":"已取消"}"#).unwrap();
        assert_eq!(resp.message.as_deref(), Some("已取消"));
    }

    fn parse<T: serde::de::DeserializeOwned>(body: &str) -> ApiResponse<T> {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn payload_type_needs_no_default() {
        #[derive(Deserialize)]
        struct Token {
            value: String,
        }
        let resp: ApiResponse<Token> = parse(r#"{"success":true,"data":{"value":"abc"}}"#);
        assert_eq!(resp.into_data().unwrap().value, "abc");
        let resp: ApiResponse<Token> = parse(r#"{"success":true}"#);
        assert!(resp.data.is_none());
    }

    #[test]
    fn success_without_data_fails_into_data() {
        let resp: ApiResponse<String> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(resp.into_data(), Err(AppError::Internal(_))));
    }
}
