use crate::entitys::card_application::ApplicationStatus;
use common::{AppError, Result};
use log::warn;
use strum_macros::{AsRefStr, Display};

/// 驱动状态变化的动作：前三个由申请人发起，后两个由审核方发起
#[derive(Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApplicationEvent {
    Submit,
    Resubmit,
    Cancel,
    Approve,
    Reject,
}

/// 列表页上申请人可用的按钮
#[derive(Display)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApplicantAction {
    #[strum(to_string = "修改")]
    Modify,
    #[strum(to_string = "取消申请")]
    Cancel,
}

/// 状态迁移表；`current` 为 None 表示尚未创建
pub fn next_status(current: Option<ApplicationStatus>, event: ApplicationEvent) -> Result<ApplicationStatus> {
    use ApplicationEvent as E;
    use ApplicationStatus as S;
    let next = match (current, event) {
        (None, E::Submit) => Some(S::Pending),
        (Some(S::Rejected), E::Resubmit) => Some(S::Pending),
        (Some(S::Pending | S::Rejected), E::Cancel) => Some(S::Cancelled),
        (Some(S::Pending), E::Approve) => Some(S::Approved),
        (Some(S::Pending), E::Reject) => Some(S::Rejected),
        _ => None,
    };
    next.ok_or_else(|| {
        let status = current.map(|s| s.to_string()).unwrap_or_else(|| "NEW".to_string());
        warn!("illegal transition: {} on {}", event, status);
        AppError::IllegalTransition { status, action: event.to_string() }
    })
}

/// 只有驳回的申请可以重新提交
pub fn ensure_resubmittable(status: ApplicationStatus) -> Result<()> {
    next_status(Some(status), ApplicationEvent::Resubmit).map(|_| ())
}

/// 审核中或驳回的申请可以取消
pub fn ensure_cancellable(status: ApplicationStatus) -> Result<()> {
    next_status(Some(status), ApplicationEvent::Cancel).map(|_| ())
}

pub fn is_editable(status: ApplicationStatus) -> bool {
    ensure_resubmittable(status).is_ok()
}

pub fn available_actions(status: ApplicationStatus) -> Vec<ApplicantAction> {
    let mut actions = Vec::new();
    if is_editable(status) {
        actions.push(ApplicantAction::Modify);
    }
    if ensure_cancellable(status).is_ok() {
        actions.push(ApplicantAction::Cancel);
    }
    actions
}
