use crate::entitys::card_application::{ApplicationStatus, CardApplication, Gender, IdType, UserProfile};
use chrono::NaiveDate;
use common::ApplicationId;
use common::util::date_util::ymd_option;
use serde::{Deserialize, Serialize};

/// 表单模式：新建申请，或修改一份已加载的申请
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update { application_id: ApplicationId, status: ApplicationStatus },
}

impl FormMode {
    pub fn is_create(&self) -> bool {
        matches!(self, FormMode::Create)
    }
}

/// 表单上的字段值（照片单独由 PhotoRefs 管理）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormValues {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default, with = "ymd_option")]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub id_type: IdType,
    #[serde(default)]
    pub id_number: String,
}

impl FormValues {
    /// 用个人资料预填，证件类型取默认值
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone().unwrap_or_default(),
            gender: profile.gender,
            birthday: profile.birthday,
            phone_number: profile.phone_number.clone().unwrap_or_default(),
            address: profile.address.clone().unwrap_or_default(),
            id_type: IdType::default(),
            id_number: String::new(),
        }
    }

    pub fn from_application(application: &CardApplication) -> Self {
        Self {
            name: application.name.clone(),
            gender: application.gender,
            birthday: application.birthday,
            phone_number: application.phone_number.clone(),
            address: application.address.clone(),
            id_type: application.id_type,
            id_number: application.id_number.clone(),
        }
    }
}
