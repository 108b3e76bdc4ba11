//! HTTP 处理器模块

pub mod health;
pub mod permissions;
pub mod preferences;

use crate::{
    models::form::{FormState, FormView},
    services::{Notifications, Submission},
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

/// 表单类页面的统一响应
#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub state: FormState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<FormView>,
    #[serde(skip_serializing_if = "Notifications::is_empty")]
    pub notifications: Notifications,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl FormResponse {
    /// 尚未提交的表单
    pub fn unsubmitted(form: FormView) -> Self {
        Self {
            state: form.state,
            form: Some(form),
            notifications: Notifications::new(),
            redirect: None,
        }
    }

    /// 按提交结果生成响应，通知在这里发出
    pub fn from_submission(submission: Submission) -> Self {
        let mut notifications = Notifications::new();
        submission.notify(&mut notifications);

        let state = submission.state();
        let redirect = submission.redirect().map(str::to_string);
        let form = match submission {
            Submission::Committed { .. } => None,
            Submission::Invalid { form, .. } | Submission::Failed { form } => Some(form),
        };

        Self {
            state,
            form,
            notifications,
            redirect,
        }
    }

    fn status(&self) -> StatusCode {
        match self.state {
            FormState::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
            FormState::Failed => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::OK,
        }
    }
}

impl IntoResponse for FormResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
