use chrono::NaiveDate;
use common::ApplicationId;
use common::util::date_util::ymd_option;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// 申请状态
#[derive(Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl ApplicationStatus {
    /// 列表页展示的状态标签
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "审核中",
            ApplicationStatus::Approved => "已通过",
            ApplicationStatus::Rejected => "已驳回",
            ApplicationStatus::Cancelled => "已取消",
        }
    }
}

#[derive(Serialize, Deserialize, Display, EnumString)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gender {
    #[serde(rename = "男", alias = "male")]
    #[strum(to_string = "男", serialize = "male")]
    Male,
    #[serde(rename = "女", alias = "female")]
    #[strum(to_string = "女", serialize = "female")]
    Female,
}

/// 性别控件的值：单选或多选，提交时只取一个
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum GenderSelection {
    One(Gender),
    Many(Vec<Gender>),
}

impl GenderSelection {
    pub fn resolve(&self) -> Option<Gender> {
        match self {
            GenderSelection::One(gender) => Some(*gender),
            GenderSelection::Many(list) => list.first().copied(),
        }
    }
}

/// 证件类型
#[derive(Serialize, Deserialize, Display, EnumString, Default)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdType {
    #[default]
    #[serde(rename = "居民身份证")]
    #[strum(to_string = "居民身份证")]
    ResidentId,
    #[serde(rename = "港澳台居民居住证")]
    #[strum(to_string = "港澳台居民居住证")]
    ResidencePermit,
}

/// 证件照片槽位
#[derive(Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhotoSlot {
    Front,
    Back,
}

/// 正反面照片地址，空串等同于未上传
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PhotoRefs {
    #[serde(rename = "id_front_photo_url", default)]
    pub front: Option<String>,
    #[serde(rename = "id_back_photo_url", default)]
    pub back: Option<String>,
}

impl PhotoRefs {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self { front: Some(front.into()), back: Some(back.into()) }
    }

    pub fn get(&self, slot: PhotoSlot) -> Option<&str> {
        let url = match slot {
            PhotoSlot::Front => &self.front,
            PhotoSlot::Back => &self.back,
        };
        url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    pub fn set(&mut self, slot: PhotoSlot, url: impl Into<String>) {
        let url = Some(url.into());
        match slot {
            PhotoSlot::Front => self.front = url,
            PhotoSlot::Back => self.back = url,
        }
    }

    pub fn clear(&mut self, slot: PhotoSlot) {
        match slot {
            PhotoSlot::Front => self.front = None,
            PhotoSlot::Back => self.back = None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.get(PhotoSlot::Front).is_some() && self.get(PhotoSlot::Back).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.get(PhotoSlot::Front).is_none() && self.get(PhotoSlot::Back).is_none()
    }

    /// 按槽位比较（空串与缺省等价）
    pub fn same_as(&self, other: &PhotoRefs) -> bool {
        self.get(PhotoSlot::Front) == other.get(PhotoSlot::Front) && self.get(PhotoSlot::Back) == other.get(PhotoSlot::Back)
    }
}

/// 安心卡申请记录（来自查询接口）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardApplication {
    pub id: ApplicationId,
    pub status: ApplicationStatus,
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
    #[serde(flatten)]
    pub photos: PhotoRefs,
    /// 驳回意见，仅 REJECTED 时有值
    #[serde(default)]
    pub comments: Option<String>,
}

impl CardApplication {
    /// 驳回意见：只有驳回状态下的非空意见才算数
    pub fn rejection_comments(&self) -> Option<&str> {
        if self.status != ApplicationStatus::Rejected {
            return None;
        }
        self.comments.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// 当前登录用户的个人资料（新建申请时预填）
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default, with = "ymd_option")]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}
