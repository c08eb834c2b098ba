use card_service::entitys::card_application::{GenderSelection, IdType};
use card_service::entitys::form_values::FormValues;
use common::Result;
use common::util::date_util::parse_date;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 命令行表单文件（JSON），只覆盖出现的字段
#[derive(Debug, Deserialize, Default)]
pub struct FormFile {
    pub name: Option<String>,
    pub gender: Option<GenderSelection>,
    pub birthday: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub id_type: Option<IdType>,
    pub id_number: Option<String>,
    /// 正面照片本地路径
    pub front_photo: Option<PathBuf>,
    /// 反面照片本地路径
    pub back_photo: Option<PathBuf>,
}

impl FormFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn apply_to(&self, values: &mut FormValues) -> Result<()> {
        if let Some(name) = &self.name {
            values.name = name.clone();
        }
        if let Some(selection) = &self.gender {
            values.gender = selection.resolve();
        }
        if let Some(birthday) = &self.birthday {
            values.birthday = Some(parse_date(birthday)?);
        }
        if let Some(phone) = &self.phone_number {
            values.phone_number = phone.clone();
        }
        if let Some(address) = &self.address {
            values.address = address.clone();
        }
        if let Some(id_type) = self.id_type {
            values.id_type = id_type;
        }
        if let Some(id_number) = &self.id_number {
            values.id_number = id_number.clone();
        }
        Ok(())
    }
}
