//! 角色的创建/更新/删除流程
//! 每个流程提供一个 `submit`，返回 [`Submission`]，通知与重定向由调用方处理

use crate::{
    error::AppError,
    models::{
        form::{FormState, FormView},
        role::{RoleForm, RoleRequest},
    },
    services::{notification::Submission, role_manager::RoleManager},
};
use validator::{Validate, ValidationErrors};

/// 角色变更成功后的重定向目标
pub const SECURITY_REDIRECT: &str = "/permissions";

fn record_outcome(action: &'static str, submission: &Submission) {
    let outcome = match submission.state() {
        FormState::Committed => "committed",
        FormState::Failed => "failed",
        _ => "invalid",
    };
    metrics::counter!("role_workflow_total", "action" => action, "outcome" => outcome).increment(1);
}

/// validator 错误转为 (字段, 消息)
fn validation_messages(errors: &ValidationErrors) -> Vec<(String, String)> {
    let mut messages = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value for {}", field));
            messages.push((field.to_string(), message));
        }
    }
    messages
}

/// 以用户提交的值重建表单并附上错误
fn redisplay(req: &RoleRequest, submit_label: &str, state: FormState) -> FormView {
    let (name, values) = req.normalized();
    let mut form = RoleForm { name, values }.to_view(submit_label);
    form.state = state;
    form
}

fn invalid(req: &RoleRequest, submit_label: &str, error: &AppError) -> Submission {
    let mut form = redisplay(req, submit_label, FormState::Invalid);
    form.add_field_error("name", error.user_message());
    Submission::Invalid {
        form,
        notification: None,
    }
}

fn check_request(req: &RoleRequest, submit_label: &str) -> Option<Submission> {
    let errors = req.validate().err()?;
    let mut form = redisplay(req, submit_label, FormState::Invalid);
    for (field, message) in validation_messages(&errors) {
        form.add_field_error(&field, message);
    }
    Some(Submission::Invalid {
        form,
        notification: None,
    })
}

/// 新建角色
pub struct CreateRole {
    manager: RoleManager,
}

impl CreateRole {
    pub const SUBMIT_LABEL: &'static str = "Create Role";

    pub fn new(manager: RoleManager) -> Self {
        Self { manager }
    }

    /// 空表单
    pub fn form(&self) -> FormView {
        RoleForm::empty().to_view(Self::SUBMIT_LABEL)
    }

    pub fn submit(mut self, req: &RoleRequest) -> Submission {
        let submission = self.run(req);
        record_outcome("create", &submission);
        submission
    }

    fn run(&mut self, req: &RoleRequest) -> Submission {
        if let Some(rejected) = check_request(req, Self::SUBMIT_LABEL) {
            return rejected;
        }

        let (name, values) = req.normalized();
        if let Err(e) = self.manager.add(&name, values) {
            tracing::info!(role = %name, error = %e, "Role creation rejected");
            return invalid(req, Self::SUBMIT_LABEL, &e);
        }

        let form = redisplay(req, Self::SUBMIT_LABEL, FormState::Persisting);
        match self.manager.save() {
            Ok(()) => {
                tracing::info!(role = %name, "Role created");
                Submission::Committed {
                    message: "Role created".to_string(),
                    redirect: SECURITY_REDIRECT.to_string(),
                }
            }
            Err(e) => {
                tracing::error!(role = %name, error = %e, "Failed to persist new role");
                Submission::failed(form)
            }
        }
    }
}

/// 更新（可能重命名）已有角色
pub struct UpdateRole {
    manager: RoleManager,
    name: String,
    form: RoleForm,
}

impl UpdateRole {
    pub const SUBMIT_LABEL: &'static str = "Update Role";

    /// 载入待编辑角色，角色不存在时返回 `InvalidName`
    pub fn open(manager: RoleManager, name: &str) -> Result<Self, AppError> {
        let form = manager.load(name)?;
        Ok(Self {
            manager,
            name: name.to_string(),
            form,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 预填了现有授权的表单
    pub fn form(&self) -> FormView {
        self.form.to_view(Self::SUBMIT_LABEL)
    }

    pub fn submit(mut self, req: &RoleRequest) -> Submission {
        let submission = self.run(req);
        record_outcome("update", &submission);
        submission
    }

    fn run(&mut self, req: &RoleRequest) -> Submission {
        if let Some(rejected) = check_request(req, Self::SUBMIT_LABEL) {
            return rejected;
        }

        let old_name = self.name.clone();
        let (name, values) = req.normalized();
        if let Err(e) = self.manager.update(&name, values, &old_name) {
            tracing::info!(role = %old_name, new_name = %name, error = %e, "Role update rejected");
            return invalid(req, Self::SUBMIT_LABEL, &e);
        }

        let form = redisplay(req, Self::SUBMIT_LABEL, FormState::Persisting);
        match self.manager.save() {
            Ok(()) => {
                tracing::info!(role = %old_name, new_name = %name, "Role updated");
                Submission::Committed {
                    message: "Role updated".to_string(),
                    redirect: SECURITY_REDIRECT.to_string(),
                }
            }
            Err(e) => {
                tracing::error!(role = %old_name, error = %e, "Failed to persist role update");
                Submission::failed(form)
            }
        }
    }
}

/// 删除角色（需要确认提交）
pub struct RemoveRole {
    manager: RoleManager,
    name: String,
}

impl RemoveRole {
    pub const SUBMIT_LABEL: &'static str = "Remove Role";

    pub fn open(manager: RoleManager, name: &str) -> Result<Self, AppError> {
        manager.load(name)?;
        Ok(Self {
            manager,
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 确认表单，没有字段
    pub fn form(&self) -> FormView {
        FormView::new("form_confirm_removal", Self::SUBMIT_LABEL)
    }

    pub fn submit(mut self) -> Submission {
        let submission = self.run();
        record_outcome("remove", &submission);
        submission
    }

    fn run(&mut self) -> Submission {
        if let Err(e) = self.manager.remove(&self.name) {
            tracing::info!(role = %self.name, error = %e, "Role removal rejected");
            let mut form = self.form();
            form.state = FormState::Invalid;
            return Submission::Invalid {
                form,
                notification: Some(e.user_message()),
            };
        }

        let mut form = self.form();
        form.state = FormState::Persisting;
        match self.manager.save() {
            Ok(()) => {
                tracing::info!(role = %self.name, "Role removed");
                Submission::Committed {
                    message: "Role removed".to_string(),
                    redirect: SECURITY_REDIRECT.to_string(),
                }
            }
            Err(e) => {
                tracing::error!(role = %self.name, error = %e, "Failed to persist role removal");
                Submission::failed(form)
            }
        }
    }
}
