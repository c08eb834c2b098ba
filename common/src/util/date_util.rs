use crate::errors::{AppError, Result};
use chrono::NaiveDate;

/// 出生日期在接口上的固定文本格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 解析 `YYYY-MM-DD`；带时间的 ISO 文本按日期前缀解析
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return Ok(date);
    }
    match text.get(..10) {
        Some(prefix) if text.len() > 10 && text[10..].starts_with(['T', ' ']) => NaiveDate::parse_from_str(prefix, DATE_FORMAT)
            .map_err(|_| AppError::validation(format!("非法的日期: {}", text))),
        _ => Err(AppError::validation(format!("非法的日期: {}", text))),
    }
}

/// serde 适配：`Option<NaiveDate>` <-> `"YYYY-MM-DD"`，空串视为缺省
pub mod ymd_option {
    use super::{format_date, parse_date};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&format_date(date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse_date(text).map(Some).map_err(serde::de::Error::custom),
        }
    }
}
