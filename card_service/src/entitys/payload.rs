use crate::entitys::card_application::{Gender, IdType};
use chrono::NaiveDate;
use common::ApplicationId;
use common::util::date_util::ymd_option;
use common::util::validate::validate_not_blank;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

pub const APPLICATION_ID_KEY: &str = "application_id";

/// 新建申请请求体：全部字段 + 两张照片
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct SubmitPayload {
    #[validate(custom(function = "validate_not_blank", message = "申请人姓名不能为空"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, with = "ymd_option", skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    pub phone_number: String,
    pub address: String,
    pub id_type: IdType,
    #[validate(custom(function = "validate_not_blank", message = "请填写证件号码"))]
    pub id_number: String,
    #[validate(custom(function = "validate_not_blank", message = "请务必上传身份证正反面照片"))]
    pub id_front_photo_url: String,
    #[validate(custom(function = "validate_not_blank", message = "请务必上传身份证正反面照片"))]
    pub id_back_photo_url: String,
}

/// 修改申请请求体：application_id + 允许修改的字段
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(transparent)]
pub struct UpdatePayload {
    body: Map<String, Value>,
}

impl UpdatePayload {
    pub(crate) fn new(application_id: ApplicationId) -> Self {
        let mut body = Map::new();
        body.insert(APPLICATION_ID_KEY.to_string(), Value::from(application_id));
        Self { body }
    }

    pub(crate) fn insert(&mut self, key: &str, value: Value) {
        self.body.insert(key.to_string(), value);
    }

    pub fn application_id(&self) -> Option<ApplicationId> {
        self.body.get(APPLICATION_ID_KEY).and_then(Value::as_i64)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// 除 application_id 之外的字段键
    pub fn field_keys(&self) -> Vec<&str> {
        self.body.keys().map(String::as_str).filter(|k| *k != APPLICATION_ID_KEY).collect()
    }

    pub fn as_json(&self) -> &Map<String, Value> {
        &self.body
    }
}

/// 取消申请请求体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CancelRequest {
    pub application_id: ApplicationId,
}

/// 构建完成、可以直接发出的请求
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundRequest {
    Submit(SubmitPayload),
    Update(UpdatePayload),
}
