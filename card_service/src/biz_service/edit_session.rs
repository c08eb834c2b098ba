use crate::entitys::card_application::{PhotoRefs, PhotoSlot};
use crate::entitys::editable_field::{EditableField, EditableFieldSet};
use crate::entitys::form_values::{FormMode, FormValues};
use crate::entitys::payload::OutboundRequest;
use crate::manager::form_prefill::PrefillState;
use crate::manager::{payload_builder, upload_gate};
use common::{AppError, Result};

/// 一次表单编辑的全部状态，离开页面即丢弃
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    mode: FormMode,
    editable: EditableFieldSet,
    comments: Option<String>,
    values: FormValues,
    photos: PhotoRefs,
    original_photos: PhotoRefs,
}

impl From<PrefillState> for EditSession {
    fn from(state: PrefillState) -> Self {
        Self {
            mode: state.mode,
            editable: state.editable,
            comments: state.comments,
            values: state.values,
            photos: state.photos,
            original_photos: state.original_photos,
        }
    }
}

impl EditSession {
    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn editable(&self) -> &EditableFieldSet {
        &self.editable
    }

    /// 驳回原因，原样展示
    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// 不可改字段的编辑不会进入修改请求体
    pub fn values_mut(&mut self) -> &mut FormValues {
        &mut self.values
    }

    pub fn photos(&self) -> &PhotoRefs {
        &self.photos
    }

    pub fn is_field_enabled(&self, field: EditableField) -> bool {
        self.mode.is_create() || self.editable.is_editable(field)
    }

    pub fn can_upload(&self) -> bool {
        upload_gate::can_upload(&self.mode, &self.editable)
    }

    /// 照片槽位只在允许上传时可写
    pub fn set_photo(&mut self, slot: PhotoSlot, url: impl Into<String>) -> Result<()> {
        if !self.can_upload() {
            return Err(AppError::validation(upload_gate::PHOTOS_LOCKED_MESSAGE));
        }
        self.photos.set(slot, url);
        Ok(())
    }

    pub fn clear_photo(&mut self, slot: PhotoSlot) -> Result<()> {
        if !self.can_upload() {
            return Err(AppError::validation(upload_gate::PHOTOS_LOCKED_MESSAGE));
        }
        self.photos.clear(slot);
        Ok(())
    }

    pub fn build_request(&self) -> Result<OutboundRequest> {
        payload_builder::build(&self.mode, &self.editable, &self.values, &self.photos, &self.original_photos)
    }
}
