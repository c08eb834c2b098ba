use crate::entitys::card_application::{PhotoRefs, PhotoSlot};
use crate::entitys::editable_field::{EditableField, EditableFieldSet};
use crate::entitys::form_values::{FormMode, FormValues};
use crate::entitys::payload::{OutboundRequest, SubmitPayload, UpdatePayload};
use crate::manager::application_state::{ApplicationEvent, ensure_resubmittable, next_status};
use crate::manager::upload_gate::{PHOTOS_REQUIRED_MESSAGE, validate_before_submit};
use common::util::date_util::format_date;
use common::util::validate::validate_phone;
use common::{AppError, Result};
use log::{debug, warn};
use serde_json::Value;
use validator::Validate;

pub const NOTHING_EDITABLE_MESSAGE: &str = "驳回意见未指明可修改的内容，请取消后重新申请";

type FieldWriter = fn(&FormValues, &PhotoRefs, &mut UpdatePayload) -> Result<()>;

/// 字段键 -> 取值并格式化写入请求体
struct FieldRule {
    field: EditableField,
    write: FieldWriter,
}

const UPDATE_RULES: &[FieldRule] = &[
    FieldRule { field: EditableField::Name, write: write_name },
    FieldRule { field: EditableField::Gender, write: write_gender },
    FieldRule { field: EditableField::Birthday, write: write_birthday },
    FieldRule { field: EditableField::PhoneNumber, write: write_phone_number },
    FieldRule { field: EditableField::Address, write: write_address },
    FieldRule { field: EditableField::IdNumber, write: write_id_number },
    FieldRule { field: EditableField::IdType, write: write_id_type },
    FieldRule { field: EditableField::Photos, write: write_photos },
];

/// 构建请求体；任何校验失败都在这里返回，不会产生请求
pub fn build(
    mode: &FormMode,
    editable: &EditableFieldSet,
    values: &FormValues,
    photos: &PhotoRefs,
    original_photos: &PhotoRefs,
) -> Result<OutboundRequest> {
    match mode {
        FormMode::Create => {
            next_status(None, ApplicationEvent::Submit)?;
            validate_before_submit(mode, editable, photos, original_photos)?;
            Ok(OutboundRequest::Submit(build_submit(values, photos)?))
        }
        FormMode::Update { application_id, status } => {
            ensure_resubmittable(*status)?;
            if editable.is_empty() {
                warn!("application {} has no editable field, refusing resubmit", application_id);
                return Err(AppError::validation(NOTHING_EDITABLE_MESSAGE));
            }
            validate_before_submit(mode, editable, photos, original_photos)?;
            let mut payload = UpdatePayload::new(*application_id);
            for rule in UPDATE_RULES.iter().filter(|rule| editable.is_editable(rule.field)) {
                (rule.write)(values, photos, &mut payload)?;
            }
            debug!("update payload for {}: {:?}", application_id, payload.field_keys());
            Ok(OutboundRequest::Update(payload))
        }
    }
}

fn build_submit(values: &FormValues, photos: &PhotoRefs) -> Result<SubmitPayload> {
    let payload = SubmitPayload {
        name: values.name.trim().to_string(),
        gender: values.gender,
        birthday: values.birthday,
        phone_number: values.phone_number.trim().to_string(),
        address: values.address.trim().to_string(),
        id_type: values.id_type,
        id_number: values.id_number.trim().to_string(),
        id_front_photo_url: photos.get(PhotoSlot::Front).unwrap_or_default().to_string(),
        id_back_photo_url: photos.get(PhotoSlot::Back).unwrap_or_default().to_string(),
    };
    payload.validate()?;
    Ok(payload)
}

fn required_text<'a>(value: &'a str, message: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() { Err(AppError::validation(message)) } else { Ok(value) }
}

fn write_name(values: &FormValues, _: &PhotoRefs, payload: &mut UpdatePayload) -> Result<()> {
    let name = required_text(&values.name, "申请人姓名不能为空")?;
    payload.insert("name", Value::from(name));
    Ok(())
}

fn write_gender(values: &FormValues, _: &PhotoRefs, payload: &mut UpdatePayload) -> Result<()> {
    let gender = values.gender.ok_or_else(|| AppError::validation("请选择性别"))?;
    payload.insert("gender", serde_json::to_value(gender)?);
    Ok(())
}

fn write_birthday(values: &FormValues, _: &PhotoRefs, payload: &mut UpdatePayload) -> Result<()> {
    let birthday = values.birthday.ok_or_else(|| AppError::validation("请选择出生日期"))?;
    payload.insert("birthday", Value::from(format_date(&birthday)));
    Ok(())
}

fn write_phone_number(values: &FormValues, _: &PhotoRefs, payload: &mut UpdatePayload) -> Result<()> {
    let phone = required_text(&values.phone_number, "请输入手机号码")?;
    validate_phone(phone).map_err(|_| AppError::validation("手机号码格式错误"))?;
    payload.insert("phone_number", Value::from(phone));
    Ok(())
}

fn write_address(values: &FormValues, _: &PhotoRefs, payload: &mut UpdatePayload) -> Result<()> {
    let address = required_text(&values.address, "请输入联系地址")?;
    payload.insert("address", Value::from(address));
    Ok(())
}

fn write_id_number(values: &FormValues, _: &PhotoRefs, payload: &mut UpdatePayload) -> Result<()> {
    let id_number = required_text(&values.id_number, "请填写证件号码")?;
    payload.insert("id_number", Value::from(id_number));
    Ok(())
}

fn write_id_type(values: &FormValues, _: &PhotoRefs, payload: &mut UpdatePayload) -> Result<()> {
    payload.insert("id_type", serde_json::to_value(values.id_type)?);
    Ok(())
}

fn write_photos(_: &FormValues, photos: &PhotoRefs, payload: &mut UpdatePayload) -> Result<()> {
    for (key, slot) in [("id_front_photo_url", PhotoSlot::Front), ("id_back_photo_url", PhotoSlot::Back)] {
        let url = photos
            .get(slot)
            .ok_or_else(|| AppError::validation(PHOTOS_REQUIRED_MESSAGE))?;
        payload.insert(key, Value::from(url));
    }
    Ok(())
}
