use crate::entitys::card_application::Gender;
use common::util::validate::{validate_not_blank, validate_password, validate_phone};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 注册请求，确认密码只在本地校验，不会发给后端
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_not_blank", message = "请输入姓名"))]
    pub name: String,

    pub gender: Gender,

    #[serde(default)]
    pub address: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,

    /// 密码（至少6位）
    #[validate(custom(function = "validate_password"))]
    pub password: String,

    #[serde(skip_serializing)]
    #[validate(must_match(other = "password", message = "两次输入的密码不一致！"))]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "validate_not_blank", message = "请输入手机号码"))]
    pub phone_number: String,
    #[validate(custom(function = "validate_not_blank", message = "请输入密码"))]
    pub password: String,
}

/// 登录成功返回：token + 用户信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}
