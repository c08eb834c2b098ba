use crate::form_file::FormFile;
use card_service::api_client::SessionContext;
use card_service::biz_service::card_application_service::CardApplicationService;
use card_service::biz_service::edit_session::EditSession;
use card_service::entitys::auth_dto::{LoginRequest, RegisterRequest};
use card_service::entitys::card_application::PhotoSlot;
use card_service::manager::comment_classifier::classify;
use common::{AppError, ApplicationId, Result};
use log::info;
use std::path::Path;

pub fn print_help() {
    println!("用法: app_card [--config <file>] <command>");
    println!("  list                         查看我的申请");
    println!("  classify <comments>          查看驳回意见放开的字段");
    println!("  apply <form.json>            提交新申请");
    println!("  resubmit <id> <form.json>    修改被驳回的申请");
    println!("  cancel <id>                  取消申请");
    println!("  login <phone> <password>     登录并输出 token");
    println!("  register <form.json>         注册账号");
}

pub async fn list(session: &SessionContext) -> Result<()> {
    let items = CardApplicationService::get().list_applications(session).await?;
    if items.is_empty() {
        println!("您还没有任何申请记录");
        return Ok(());
    }
    for item in items {
        let actions: Vec<String> = item.actions.iter().map(|a| a.to_string()).collect();
        println!(
            "[{}] 安心卡申请 - {}  申请编号: {}  {}",
            item.status_label(),
            item.application.name,
            item.application.id,
            actions.join(" / ")
        );
        if let Some(comments) = item.application.rejection_comments() {
            println!("      驳回原因: {}", comments);
        }
    }
    Ok(())
}

pub fn classify_comments(comments: &str) {
    let editable = classify(Some(comments));
    if editable.is_empty() {
        println!("没有可修改的字段");
        return;
    }
    for field in editable.editable_fields() {
        println!("{} ({})", field.label(), field);
    }
}

pub async fn apply(session: &SessionContext, form_path: &Path) -> Result<()> {
    let service = CardApplicationService::get();
    let form = FormFile::load(form_path)?;
    let mut edit = service.open_create(session).await?;
    form.apply_to(edit.values_mut())?;
    upload_photos(session, &mut edit, &form).await?;
    service.submit(session, &edit).await?;
    println!("申请提交成功！");
    Ok(())
}

pub async fn resubmit(session: &SessionContext, id: ApplicationId, form_path: &Path) -> Result<()> {
    let service = CardApplicationService::get();
    let form = FormFile::load(form_path)?;
    let items = service.list_applications(session).await?;
    let application = items.iter().map(|item| &item.application).find(|app| app.id == id);
    let mut edit = service.open_update(application)?;
    if let Some(comments) = edit.comments() {
        println!("驳回原因: {}", comments);
    }
    form.apply_to(edit.values_mut())?;
    upload_photos(session, &mut edit, &form).await?;
    service.submit(session, &edit).await?;
    println!("申请修改成功！");
    Ok(())
}

async fn upload_photos(session: &SessionContext, edit: &mut EditSession, form: &FormFile) -> Result<()> {
    let slots = [(PhotoSlot::Front, &form.front_photo), (PhotoSlot::Back, &form.back_photo)];
    for (slot, path) in slots {
        let Some(path) = path else { continue };
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::validation(format!("非法的文件路径: {}", path.display())))?
            .to_string();
        CardApplicationService::get().upload_photo(session, edit, slot, &file_name, bytes).await?;
        println!("上传成功: {}", file_name);
    }
    Ok(())
}

pub async fn cancel(session: &SessionContext, id: ApplicationId) -> Result<()> {
    let service = CardApplicationService::get();
    let items = service.list_applications(session).await?;
    let item = items
        .iter()
        .find(|item| item.application.id == id)
        .ok_or_else(|| AppError::validation(format!("申请 {} 不存在", id)))?;
    service.cancel(session, &item.application).await?;
    println!("申请已取消");
    Ok(())
}

pub async fn login(phone_number: &str, password: &str) -> Result<()> {
    let request = LoginRequest { phone_number: phone_number.to_string(), password: password.to_string() };
    let session = CardApplicationService::get().login(&request).await?;
    info!("登录成功");
    if let Some(token) = session.token() {
        println!("{}", token);
    }
    Ok(())
}

pub async fn register(form_path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(form_path)?;
    let request: RegisterRequest = serde_json::from_str(&text)?;
    CardApplicationService::get().register(&request).await?;
    println!("注册成功！请使用新账户登录。");
    Ok(())
}
