use crate::entitys::card_application::PhotoRefs;
use crate::entitys::editable_field::EditableFieldSet;
use crate::entitys::form_values::FormMode;
use common::{AppError, Result};
use log::warn;

pub const PHOTOS_REQUIRED_MESSAGE: &str = "请务必上传身份证正反面照片";
pub const PHOTOS_LOCKED_MESSAGE: &str = "本次修改不允许更换证件照片";

/// 新建时总能上传；修改时只有驳回意见放开了照片才能上传
pub fn can_upload(mode: &FormMode, editable: &EditableFieldSet) -> bool {
    match mode {
        FormMode::Create => true,
        FormMode::Update { .. } => editable.photos,
    }
}

/// 提交前检查照片：需要上传时两张都必须有，不允许修改时必须与加载时一致
pub fn validate_before_submit(
    mode: &FormMode,
    editable: &EditableFieldSet,
    current: &PhotoRefs,
    original: &PhotoRefs,
) -> Result<()> {
    if can_upload(mode, editable) {
        if !current.is_complete() {
            return Err(AppError::validation(PHOTOS_REQUIRED_MESSAGE));
        }
        return Ok(());
    }
    if !current.same_as(original) {
        warn!("photo references changed while photos are locked: {:?} -> {:?}", original, current);
        return Err(AppError::validation(PHOTOS_LOCKED_MESSAGE));
    }
    Ok(())
}
