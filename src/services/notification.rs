//! 用户通知与表单提交结果
//! 工作流只返回结果，由调用方决定发出哪条通知、是否重定向

use crate::models::form::{FormState, FormView};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// 面向用户的通知出口
pub trait NotificationSink {
    fn success(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// 单个请求内收集到的通知，随响应一起返回
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Notifications(Vec<Notification>);

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.0.iter()
    }
}

impl NotificationSink for Notifications {
    fn success(&mut self, message: &str) {
        self.0.push(Notification {
            level: NotificationLevel::Success,
            message: message.to_string(),
        });
    }

    fn error(&mut self, message: &str) {
        self.0.push(Notification {
            level: NotificationLevel::Error,
            message: message.to_string(),
        });
    }
}

/// 表单提交结果
#[derive(Debug, Clone)]
pub enum Submission {
    /// 已持久化：成功通知 + 重定向
    Committed { message: String, redirect: String },
    /// 校验或名称错误：重新展示表单；`notification` 非空时以错误通知而非内联方式呈现
    Invalid {
        form: FormView,
        notification: Option<String>,
    },
    /// 持久化失败：重新展示表单，不发通知
    Failed { form: FormView },
}

impl Submission {
    /// 写入失败：`Persisting` 状态的表单转为 `Failed` 重新展示
    pub fn failed(mut form: FormView) -> Self {
        form.state = FormState::Failed;
        Submission::Failed { form }
    }

    pub fn state(&self) -> FormState {
        match self {
            Submission::Committed { .. } => FormState::Committed,
            Submission::Invalid { .. } => FormState::Invalid,
            Submission::Failed { .. } => FormState::Failed,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, Submission::Committed { .. })
    }

    pub fn form(&self) -> Option<&FormView> {
        match self {
            Submission::Committed { .. } => None,
            Submission::Invalid { form, .. } | Submission::Failed { form } => Some(form),
        }
    }

    pub fn redirect(&self) -> Option<&str> {
        match self {
            Submission::Committed { redirect, .. } => Some(redirect),
            _ => None,
        }
    }

    /// 按结果发出通知：成功一条 success，名称错误（删除流程）一条 error，持久化失败不发
    pub fn notify(&self, sink: &mut dyn NotificationSink) {
        match self {
            Submission::Committed { message, .. } => sink.success(message),
            Submission::Invalid {
                notification: Some(message),
                ..
            } => sink.error(message),
            Submission::Invalid { .. } | Submission::Failed { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_submission_emits_nothing() {
        let mut sink = Notifications::new();
        Submission::Failed {
            form: FormView::new("form_role", "Create Role"),
        }
        .notify(&mut sink);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_failed_moves_persisting_form_to_failed() {
        let mut form = FormView::new("form_role", "Update Role");
        form.state = FormState::Persisting;

        let submission = Submission::failed(form);
        assert_eq!(submission.state(), FormState::Failed);
        assert_eq!(submission.form().unwrap().state, FormState::Failed);
    }

    #[test]
    fn test_committed_submission_emits_success() {
        let mut sink = Notifications::new();
        let submission = Submission::Committed {
            message: "Role created".to_string(),
            redirect: "/permissions".to_string(),
        };
        submission.notify(&mut sink);

        let all: Vec<_> = sink.iter().collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].level, NotificationLevel::Success);
        assert_eq!(submission.redirect(), Some("/permissions"));
        assert_eq!(submission.state(), FormState::Committed);
    }

    #[test]
    fn test_invalid_with_notification_emits_error() {
        let mut sink = Notifications::new();
        Submission::Invalid {
            form: FormView::new("form_confirm_removal", "Remove Role"),
            notification: Some("Role \"x\" does not exist".to_string()),
        }
        .notify(&mut sink);
        assert_eq!(sink.iter().next().unwrap().level, NotificationLevel::Error);
    }
}
