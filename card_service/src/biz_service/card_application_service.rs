use crate::api_client::{CardApi, SessionContext};
use crate::biz_service::edit_session::EditSession;
use crate::entitys::auth_dto::{LoginRequest, RegisterRequest};
use crate::entitys::card_application::{ApplicationStatus, CardApplication, PhotoSlot};
use crate::entitys::payload::{CancelRequest, OutboundRequest};
use crate::manager::application_state::{ApplicantAction, available_actions, ensure_cancellable};
use crate::manager::form_prefill::{PrefillContext, resolve};
use crate::manager::upload_gate::PHOTOS_LOCKED_MESSAGE;
use common::{AppError, Result};
use log::{info, warn};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use validator::Validate;

/// 列表页的一行：申请 + 可用操作
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationListItem {
    pub application: CardApplication,
    pub actions: Vec<ApplicantAction>,
}

impl ApplicationListItem {
    pub fn new(application: CardApplication) -> Self {
        let actions = available_actions(application.status);
        Self { application, actions }
    }

    pub fn status_label(&self) -> &'static str {
        self.application.status.label()
    }

    /// 仍在流程中（审核中或驳回待处理）
    pub fn is_active(&self) -> bool {
        matches!(self.application.status, ApplicationStatus::Pending | ApplicationStatus::Rejected)
    }
}

pub struct CardApplicationService {
    api: Arc<dyn CardApi>,
}

impl CardApplicationService {
    pub fn new(api: Arc<dyn CardApi>) -> Self {
        Self { api }
    }

    pub fn init(api: Arc<dyn CardApi>) {
        let instance = Self::new(api);
        if INSTANCE.set(Arc::new(instance)).is_err() {
            warn!("CardApplicationService already initialized");
        }
    }

    /// 获取单例
    pub fn get() -> Arc<Self> {
        INSTANCE.get().expect("CardApplicationService is not initialized").clone()
    }

    fn require_login(session: &SessionContext) -> Result<()> {
        if session.is_authenticated() { Ok(()) } else { Err(AppError::Unauthorized("missing session token".to_string())) }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<SessionContext> {
        request.validate()?;
        let data = self.api.login(request).await?.into_data()?;
        info!("login succeeded for {}", request.phone_number);
        Ok(SessionContext::new(data.token))
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        request.validate()?;
        self.api.register(request).await?.into_result()?;
        info!("registered {}", request.phone_number);
        Ok(())
    }

    /// 后端用 404 表示没有任何记录
    pub async fn list_applications(&self, session: &SessionContext) -> Result<Vec<ApplicationListItem>> {
        Self::require_login(session)?;
        let applications = match self.api.query_applications(session).await {
            Ok(resp) => resp.into_result()?.unwrap_or_default(),
            Err(AppError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e),
        };
        Ok(applications.into_iter().map(ApplicationListItem::new).collect())
    }

    /// 新建申请：个人资料取不到时仍然打开空表单
    pub async fn open_create(&self, session: &SessionContext) -> Result<EditSession> {
        Self::require_login(session)?;
        let profile = match self.api.fetch_profile(session).await.and_then(|resp| resp.into_data()) {
            Ok(profile) => Some(profile),
            Err(AppError::Unauthorized(msg)) => return Err(AppError::Unauthorized(msg)),
            Err(e) => {
                warn!("无法获取用户信息: {}", e.user_message());
                None
            }
        };
        Ok(resolve(PrefillContext::Create { profile: profile.as_ref() })?.into())
    }

    pub fn open_update(&self, application: Option<&CardApplication>) -> Result<EditSession> {
        Ok(resolve(PrefillContext::Update { application })?.into())
    }

    /// 上传成功才写入槽位；失败时槽位保持原样
    pub async fn upload_photo(
        &self,
        session: &SessionContext,
        edit: &mut EditSession,
        slot: PhotoSlot,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String> {
        Self::require_login(session)?;
        if !edit.can_upload() {
            return Err(AppError::validation(PHOTOS_LOCKED_MESSAGE));
        }
        let uploaded = self.api.upload_file(session, file_name, bytes).await?.into_data()?;
        edit.set_photo(slot, uploaded.url.clone())?;
        info!("uploaded {} photo: {}", slot, uploaded.url);
        Ok(uploaded.url)
    }

    /// 校验并发出新建或修改请求；失败时表单内容保持不变
    pub async fn submit(&self, session: &SessionContext, edit: &EditSession) -> Result<()> {
        Self::require_login(session)?;
        match edit.build_request()? {
            OutboundRequest::Submit(payload) => {
                self.api.submit(session, &payload).await?.into_result()?;
                info!("申请提交成功");
            }
            OutboundRequest::Update(payload) => {
                self.api.update(session, &payload).await?.into_result()?;
                info!("申请修改成功: {:?}", payload.application_id());
            }
        }
        Ok(())
    }

    pub async fn cancel(&self, session: &SessionContext, application: &CardApplication) -> Result<()> {
        Self::require_login(session)?;
        ensure_cancellable(application.status)?;
        let request = CancelRequest { application_id: application.id };
        self.api.cancel(session, &request).await?.into_result()?;
        info!("申请已取消: {}", application.id);
        Ok(())
    }
}

static INSTANCE: OnceCell<Arc<CardApplicationService>> = OnceCell::new();

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::UploadedFile;
    use crate::entitys::auth_dto::LoginData;
    use crate::entitys::card_application::{Gender, IdType, PhotoRefs, UserProfile};
    use crate::entitys::editable_field::{EditableField, EditableFieldSet};
    use crate::entitys::payload::{SubmitPayload, UpdatePayload};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use common::result::{AckResponse, ApiResponse};
    use serde_json::{Value, json};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeCardApi {
        applications: Mutex<Vec<CardApplication>>,
        profile: Option<UserProfile>,
        reject_with: Option<String>,
        fail_transport: bool,
        uploads: Mutex<u32>,
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl FakeCardApi {
        fn record(&self, endpoint: &str, body: Value) {
            self.calls.lock().unwrap().push((endpoint.to_string(), body));
        }

        fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().unwrap().clone()
        }

        fn ack(&self) -> Result<AckResponse> {
            if self.fail_transport {
                return Err(AppError::Transport(None));
            }
            Ok(match &self.reject_with {
                Some(msg) => ApiResponse::rejected(msg.clone()),
                None => ApiResponse::ok(Value::Null),
            })
        }
    }

    #[async_trait]
    impl CardApi for FakeCardApi {
        async fn fetch_profile(&self, _: &SessionContext) -> Result<ApiResponse<UserProfile>> {
            self.record("profile", Value::Null);
            match &self.profile {
                Some(profile) => Ok(ApiResponse::ok(profile.clone())),
                None => Err(AppError::Transport(None)),
            }
        }

        async fn query_applications(&self, _: &SessionContext) -> Result<ApiResponse<Vec<CardApplication>>> {
            self.record("query", Value::Null);
            let list = self.applications.lock().unwrap().clone();
            if list.is_empty() { Err(AppError::NotFound(None)) } else { Ok(ApiResponse::ok(list)) }
        }

        async fn submit(&self, _: &SessionContext, payload: &SubmitPayload) -> Result<AckResponse> {
            self.record("submit", serde_json::to_value(payload)?);
            self.ack()
        }

        async fn update(&self, _: &SessionContext, payload: &UpdatePayload) -> Result<AckResponse> {
            self.record("update", serde_json::to_value(payload)?);
            self.ack()
        }

        async fn cancel(&self, _: &SessionContext, request: &CancelRequest) -> Result<AckResponse> {
            self.record("cancel", serde_json::to_value(request)?);
            for app in self.applications.lock().unwrap().iter_mut() {
                if app.id == request.application_id {
                    app.status = ApplicationStatus::Cancelled;
                }
            }
            self.ack()
        }

        async fn upload_file(&self, _: &SessionContext, file_name: &str, _: Vec<u8>) -> Result<ApiResponse<UploadedFile>> {
            self.record("upload", json!(file_name));
            if self.fail_transport {
                return Err(AppError::Transport(None));
            }
            let mut count = self.uploads.lock().unwrap();
            *count += 1;
            Ok(ApiResponse::ok(UploadedFile { url: format!("http://files/upload-{}-{}", count, file_name) }))
        }

        async fn login(&self, request: &LoginRequest) -> Result<ApiResponse<LoginData>> {
            self.record("login", serde_json::to_value(request)?);
            Ok(ApiResponse::ok(LoginData { token: "token-1".to_string(), user: None }))
        }

        async fn register(&self, request: &RegisterRequest) -> Result<AckResponse> {
            self.record("register", serde_json::to_value(request)?);
            self.ack()
        }
    }

    fn session() -> SessionContext {
        SessionContext::new("token-1")
    }

    fn application(id: i64, status: ApplicationStatus, comments: Option<&str>) -> CardApplication {
        CardApplication {
            id,
            status,
            name: "张三".to_string(),
            gender: Some(Gender::Male),
            birthday: NaiveDate::from_ymd_opt(1990, 1, 2),
            phone_number: "13800138000".to_string(),
            address: "北京市朝阳区".to_string(),
            id_type: IdType::ResidentId,
            id_number: "110101199001020011".to_string(),
            photos: PhotoRefs::new("http://files/f.jpg", "http://files/b.jpg"),
            comments: comments.map(str::to_string),
        }
    }

    fn service(api: &Arc<FakeCardApi>) -> CardApplicationService {
        CardApplicationService::new(api.clone())
    }

    #[tokio::test]
    async fn phone_rejection_resubmits_only_phone() {
        let api = Arc::new(FakeCardApi::default());
        let svc = service(&api);
        let app = application(5, ApplicationStatus::Rejected, Some("请修改您的手机号码"));

        let mut edit = svc.open_update(Some(&app)).unwrap();
        assert_eq!(*edit.editable(), EditableFieldSet::only(&[EditableField::PhoneNumber]));
        assert_eq!(edit.comments(), Some("请修改您的手机号码"));
        edit.values_mut().phone_number = "13700137000".to_string();
        edit.values_mut().address = "不应提交".to_string();

        svc.submit(&session(), &edit).await.unwrap();
        assert_eq!(api.calls(), vec![("update".to_string(), json!({"application_id": 5, "phone_number": "13700137000"}))]);
    }

    #[tokio::test]
    async fn photo_rejection_requires_new_uploads() {
        let api = Arc::new(FakeCardApi::default());
        let svc = service(&api);
        let app = application(6, ApplicationStatus::Rejected, Some("照片模糊，请重新上传"));

        let mut edit = svc.open_update(Some(&app)).unwrap();
        assert!(edit.photos().is_empty());
        let err = svc.submit(&session(), &edit).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(api.calls().is_empty());

        svc.upload_photo(&session(), &mut edit, PhotoSlot::Front, "front.jpg", vec![1, 2]).await.unwrap();
        svc.upload_photo(&session(), &mut edit, PhotoSlot::Back, "back.jpg", vec![3, 4]).await.unwrap();
        svc.submit(&session(), &edit).await.unwrap();

        let (endpoint, body) = api.calls().pop().unwrap();
        assert_eq!(endpoint, "update");
        assert_eq!(
            body,
            json!({
                "application_id": 6,
                "id_front_photo_url": "http://files/upload-1-front.jpg",
                "id_back_photo_url": "http://files/upload-2-back.jpg"
            })
        );
    }

    #[tokio::test]
    async fn locked_photos_refuse_upload_before_any_call() {
        let api = Arc::new(FakeCardApi::default());
        let svc = service(&api);
        let app = application(7, ApplicationStatus::Rejected, Some("住址不详"));
        let mut edit = svc.open_update(Some(&app)).unwrap();

        let err = svc.upload_photo(&session(), &mut edit, PhotoSlot::Front, "f.jpg", vec![0]).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(api.calls().is_empty());
        assert_eq!(edit.photos(), &app.photos);
    }

    #[tokio::test]
    async fn failed_upload_leaves_slot_untouched() {
        let api = Arc::new(FakeCardApi { fail_transport: true, ..Default::default() });
        let svc = service(&api);
        let mut edit = svc.open_update(Some(&application(8, ApplicationStatus::Rejected, Some("照片反光")))).unwrap();
        let err = svc.upload_photo(&session(), &mut edit, PhotoSlot::Back, "b.jpg", vec![0]).await.unwrap_err();
        assert_eq!(err.user_message(), common::errors::GENERIC_FAILURE_MESSAGE);
        assert!(edit.photos().get(PhotoSlot::Back).is_none());
    }

    #[tokio::test]
    async fn create_prefills_profile_and_submits_everything() {
        let profile = UserProfile {
            name: Some("张三".to_string()),
            gender: Some(Gender::Male),
            birthday: NaiveDate::from_ymd_opt(1990, 1, 2),
            phone_number: Some("13800138000".to_string()),
            address: Some("北京市".to_string()),
        };
        let api = Arc::new(FakeCardApi { profile: Some(profile), ..Default::default() });
        let svc = service(&api);

        let mut edit = svc.open_create(&session()).await.unwrap();
        assert_eq!(edit.values().name, "张三");
        assert_eq!(edit.values().gender, Some(Gender::Male));
        edit.values_mut().id_number = "110101199001020011".to_string();
        svc.upload_photo(&session(), &mut edit, PhotoSlot::Front, "f.jpg", vec![1]).await.unwrap();
        svc.upload_photo(&session(), &mut edit, PhotoSlot::Back, "b.jpg", vec![2]).await.unwrap();
        svc.submit(&session(), &edit).await.unwrap();

        let (endpoint, body) = api.calls().pop().unwrap();
        assert_eq!(endpoint, "submit");
        assert_eq!(body["name"], "张三");
        assert_eq!(body["id_type"], "居民身份证");
        assert_eq!(body["id_front_photo_url"], "http://files/upload-1-f.jpg");
        assert_eq!(body["id_back_photo_url"], "http://files/upload-2-b.jpg");
    }

    #[tokio::test]
    async fn create_survives_profile_failure() {
        let api = Arc::new(FakeCardApi::default());
        let edit = service(&api).open_create(&session()).await.unwrap();
        assert!(edit.values().name.is_empty());
        assert!(edit.is_field_enabled(EditableField::IdType));
    }

    #[tokio::test]
    async fn update_without_application_is_missing_context() {
        let api = Arc::new(FakeCardApi::default());
        assert!(matches!(service(&api).open_update(None), Err(AppError::MissingContext(_))));
    }

    #[tokio::test]
    async fn approved_application_is_never_resubmitted_or_cancelled() {
        let api = Arc::new(FakeCardApi::default());
        let svc = service(&api);
        let app = application(9, ApplicationStatus::Approved, None);

        let mut edit = svc.open_update(Some(&app)).unwrap();
        edit.values_mut().name = "新名字".to_string();
        assert!(svc.submit(&session(), &edit).await.unwrap_err().is_local());
        assert!(matches!(svc.cancel(&session(), &app).await, Err(AppError::IllegalTransition { .. })));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn cancel_pending_removes_it_from_active_list() {
        let api = Arc::new(FakeCardApi::default());
        api.applications.lock().unwrap().extend([
            application(1, ApplicationStatus::Pending, None),
            application(2, ApplicationStatus::Approved, None),
        ]);
        let svc = service(&api);

        let items = svc.list_applications(&session()).await.unwrap();
        assert_eq!(items[0].actions, vec![ApplicantAction::Cancel]);
        assert!(items[1].actions.is_empty());
        assert_eq!(items[0].status_label(), "审核中");

        svc.cancel(&session(), &items[0].application).await.unwrap();
        let active: Vec<_> = svc.list_applications(&session()).await.unwrap().into_iter().filter(|i| i.is_active()).collect();
        assert!(active.is_empty());
    }

    #[tokio::test]
    async fn empty_history_is_not_an_error() {
        let api = Arc::new(FakeCardApi::default());
        assert!(service(&api).list_applications(&session()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn business_rejection_is_surfaced_and_form_kept() {
        let api = Arc::new(FakeCardApi { reject_with: Some("证件号码已被使用".to_string()), ..Default::default() });
        let svc = service(&api);
        let mut edit = svc.open_update(Some(&application(3, ApplicationStatus::Rejected, Some("证件号码错误")))).unwrap();
        edit.values_mut().id_number = "110101199001020022".to_string();

        let err = svc.submit(&session(), &edit).await.unwrap_err();
        assert_eq!(err.user_message(), "证件号码已被使用");
        assert_eq!(edit.values().id_number, "110101199001020022");
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn anonymous_session_is_refused_upstream() {
        let api = Arc::new(FakeCardApi::default());
        let err = service(&api).list_applications(&SessionContext::anonymous()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn register_checks_confirmation_locally() {
        let api = Arc::new(FakeCardApi::default());
        let svc = service(&api);
        let mut request = RegisterRequest {
            name: "王五".to_string(),
            gender: Gender::Female,
            address: String::new(),
            phone_number: "13600136000".to_string(),
            password: "abcdef".to_string(),
            confirm_password: "abcdeg".to_string(),
        };
        assert!(matches!(svc.register(&request).await, Err(AppError::Validation(_))));
        assert!(api.calls().is_empty());

        request.confirm_password = "abcdef".to_string();
        svc.register(&request).await.unwrap();
        let session = svc
            .login(&LoginRequest { phone_number: "13600136000".to_string(), password: "abcdef".to_string() })
            .await
            .unwrap();
        assert_eq!(session.token(), Some("token-1"));
    }
}
