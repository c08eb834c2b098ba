use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// 密码最少 6 位
pub fn validate_password(pwd: &str) -> Result<(), ValidationError> {
    if pwd.chars().count() < 6 {
        return Err(ValidationError::new("password.too.short").with_message("请设置至少6位数的密码".into()));
    }
    Ok(())
}

/// ✅ 手机号校验（可接受 +86、0086 前缀）
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    lazy_static! {
        static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9]{7,20}$").unwrap();
    }

    if PHONE_RE.is_match(phone.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone.format").with_message("手机号码格式错误".into()))
    }
}

/// 必填文本：去掉空白后不能为空
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() { Err(ValidationError::new("required")) } else { Ok(()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_accepts_prefixes() {
        assert!(validate_phone("13800138000").is_ok());
        assert!(validate_phone("+8613800138000").is_ok());
        assert!(validate_phone("008613800138000").is_ok());
        assert!(validate_phone("138-0013-8000").is_err());
        assert!(validate_phone("123").is_err());
    }

    #[test]
    fn password_counts_characters() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("密码密码密码").is_ok());
    }

    #[test]
    fn blank_is_rejected() {
        assert!(validate_not_blank("  ").is_err());
        assert!(validate_not_blank("张三").is_ok());
    }
}
