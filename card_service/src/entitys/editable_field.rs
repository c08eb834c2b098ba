use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// 驳回后允许修改的字段键；`Photos` 覆盖正反面两张照片
#[derive(Serialize, Deserialize, Display, EnumString, AsRefStr, IntoStaticStr, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EditableField {
    Name,
    Gender,
    Birthday,
    PhoneNumber,
    Address,
    IdNumber,
    IdType,
    Photos,
}

impl EditableField {
    pub fn label(&self) -> &'static str {
        match self {
            EditableField::Name => "姓名",
            EditableField::Gender => "性别",
            EditableField::Birthday => "出生日期",
            EditableField::PhoneNumber => "手机号码",
            EditableField::Address => "联系地址",
            EditableField::IdNumber => "证件号码",
            EditableField::IdType => "证件类型",
            EditableField::Photos => "证件照片",
        }
    }
}

/// 每个字段一个布尔值；每次打开驳回申请时重新计算，不做缓存
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditableFieldSet {
    pub name: bool,
    pub gender: bool,
    pub birthday: bool,
    pub phone_number: bool,
    pub address: bool,
    pub id_number: bool,
    pub id_type: bool,
    pub photos: bool,
}

impl EditableFieldSet {
    /// 全部不可改
    pub fn none() -> Self {
        Self::default()
    }

    pub fn only(fields: &[EditableField]) -> Self {
        let mut set = Self::none();
        for field in fields {
            set.set(*field, true);
        }
        set
    }

    pub fn is_editable(&self, field: EditableField) -> bool {
        match field {
            EditableField::Name => self.name,
            EditableField::Gender => self.gender,
            EditableField::Birthday => self.birthday,
            EditableField::PhoneNumber => self.phone_number,
            EditableField::Address => self.address,
            EditableField::IdNumber => self.id_number,
            EditableField::IdType => self.id_type,
            EditableField::Photos => self.photos,
        }
    }

    pub fn set(&mut self, field: EditableField, editable: bool) {
        let flag = match field {
            EditableField::Name => &mut self.name,
            EditableField::Gender => &mut self.gender,
            EditableField::Birthday => &mut self.birthday,
            EditableField::PhoneNumber => &mut self.phone_number,
            EditableField::Address => &mut self.address,
            EditableField::IdNumber => &mut self.id_number,
            EditableField::IdType => &mut self.id_type,
            EditableField::Photos => &mut self.photos,
        };
        *flag = editable;
    }

    pub fn editable_fields(&self) -> impl Iterator<Item = EditableField> + '_ {
        EditableField::iter().filter(|field| self.is_editable(*field))
    }

    pub fn is_empty(&self) -> bool {
        self.editable_fields().next().is_none()
    }
}
