use crate::entitys::card_application::{ApplicationStatus, CardApplication, PhotoRefs, UserProfile};
use crate::entitys::editable_field::{EditableField, EditableFieldSet};
use crate::entitys::form_values::{FormMode, FormValues};
use crate::manager::comment_classifier::classify;
use common::{AppError, Result};
use log::debug;

/// 打开表单时的上下文
#[derive(Debug, Clone, Copy)]
pub enum PrefillContext<'a> {
    /// 新建：个人资料获取失败时为 None
    Create { profile: Option<&'a UserProfile> },
    /// 修改：必须带着列表页已加载的申请
    Update { application: Option<&'a CardApplication> },
}

/// 表单初始状态
#[derive(Debug, Clone, PartialEq)]
pub struct PrefillState {
    pub mode: FormMode,
    pub values: FormValues,
    /// 表单上当前的照片
    pub photos: PhotoRefs,
    /// 加载时的照片，用于校验照片是否被改动
    pub original_photos: PhotoRefs,
    pub editable: EditableFieldSet,
    /// 展示给申请人的驳回原因
    pub comments: Option<String>,
}

impl PrefillState {
    /// 新建模式不走字段开关，全部可填
    pub fn is_field_enabled(&self, field: EditableField) -> bool {
        self.mode.is_create() || self.editable.is_editable(field)
    }

    /// 非驳回的修改场景可以显式指定可改字段
    pub fn override_editable(mut self, editable: EditableFieldSet) -> Self {
        if editable.photos && !self.editable.photos {
            self.photos = PhotoRefs::default();
        } else if !editable.photos {
            self.photos = self.original_photos.clone();
        }
        self.editable = editable;
        self
    }
}

pub fn resolve(context: PrefillContext<'_>) -> Result<PrefillState> {
    match context {
        PrefillContext::Create { profile } => Ok(resolve_create(profile)),
        PrefillContext::Update { application } => {
            let application = application
                .ok_or_else(|| AppError::MissingContext("update mode opened without application data".to_string()))?;
            Ok(resolve_update(application))
        }
    }
}

fn resolve_create(profile: Option<&UserProfile>) -> PrefillState {
    let values = profile.map(FormValues::from_profile).unwrap_or_default();
    PrefillState {
        mode: FormMode::Create,
        values,
        photos: PhotoRefs::default(),
        original_photos: PhotoRefs::default(),
        editable: EditableFieldSet::none(),
        comments: None,
    }
}

fn resolve_update(application: &CardApplication) -> PrefillState {
    let mode = FormMode::Update { application_id: application.id, status: application.status };
    let values = FormValues::from_application(application);
    let original_photos = application.photos.clone();

    if application.status != ApplicationStatus::Rejected {
        debug!("application {} is {}, opened read-only", application.id, application.status);
        return PrefillState {
            mode,
            values,
            photos: original_photos.clone(),
            original_photos,
            editable: EditableFieldSet::none(),
            comments: None,
        };
    }

    let comments = application.rejection_comments().map(str::to_string);
    let editable = classify(comments.as_deref());
    // 照片被驳回时从空白开始，强制重新上传
    let photos = if editable.photos { PhotoRefs::default() } else { original_photos.clone() };
    PrefillState { mode, values, photos, original_photos, editable, comments }
}
