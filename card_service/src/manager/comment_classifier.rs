use crate::entitys::editable_field::{EditableField, EditableFieldSet};
use log::debug;

/// 一条规则：意见里包含任一关键字，即放开对应字段
pub struct KeywordRule {
    pub field: EditableField,
    pub keywords: &'static [&'static str],
}

impl KeywordRule {
    pub fn matches(&self, comments: &str) -> bool {
        self.keywords.iter().any(|keyword| comments.contains(keyword))
    }
}

/// 证件类型不在表中：任何驳回意见都不会放开它
pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule { field: EditableField::Name, keywords: &["姓名", "名字"] },
    KeywordRule { field: EditableField::Gender, keywords: &["性别"] },
    KeywordRule { field: EditableField::Birthday, keywords: &["出生日期", "生日", "年龄"] },
    KeywordRule { field: EditableField::PhoneNumber, keywords: &["手机号码", "电话", "联系方式"] },
    KeywordRule { field: EditableField::Address, keywords: &["联系地址", "住址"] },
    KeywordRule { field: EditableField::IdNumber, keywords: &["证件号码"] },
    KeywordRule { field: EditableField::Photos, keywords: &["照片"] },
];

/// 根据驳回意见计算可修改字段；没有意见时全部不可改
pub fn classify(comments: Option<&str>) -> EditableFieldSet {
    let mut editable = EditableFieldSet::none();
    let Some(comments) = comments.map(str::trim).filter(|c| !c.is_empty()) else {
        return editable;
    };
    for rule in KEYWORD_RULES {
        if rule.matches(comments) {
            editable.set(rule.field, true);
        }
    }
    debug!("classified comments {:?} -> {:?}", comments, editable);
    editable
}
