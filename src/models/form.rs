//! 表单视图模型
//! 字段的显示值、可编辑/必填标记与内联错误，交给前端渲染

use serde::Serialize;

/// 表单生命周期
///
/// `Unsubmitted → Validating → {Invalid, Valid → Persisting → {Failed, Committed}}`，
/// Invalid 与 Failed 都会回到重新展示的表单。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    Unsubmitted,
    Validating,
    Invalid,
    Valid,
    Persisting,
    Failed,
    Committed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Select,
    Checkbox,
}

/// 单个表单字段
#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: String,
    pub required: bool,
    /// false 时前端禁用该字段，服务端也忽略其提交值
    pub editable: bool,
    /// 值变化时立即重新提交表单以刷新计算出的默认值
    pub auto_submit: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl FieldView {
    pub fn new(name: &str, label: &str, kind: FieldKind, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            value: value.into(),
            required: false,
            editable: true,
            auto_submit: false,
            options: Vec::new(),
            help_text: None,
            errors: Vec::new(),
        }
    }

    pub fn checkbox(name: &str, label: &str, checked: bool) -> Self {
        Self::new(name, label, FieldKind::Checkbox, bool_marker(checked))
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn auto_submit(mut self) -> Self {
        self.auto_submit = true;
        self
    }

    pub fn options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }
}

/// 整个表单
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub name: String,
    pub state: FormState,
    pub submit_label: String,
    pub fields: Vec<FieldView>,
    /// 不属于任何字段的错误
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl FormView {
    pub fn new(name: &str, submit_label: &str) -> Self {
        Self {
            name: name.to_string(),
            state: FormState::Unsubmitted,
            submit_label: submit_label.to_string(),
            fields: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn push(&mut self, field: FieldView) {
        self.fields.push(field);
    }

    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldView> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// 给字段追加内联错误；字段不存在时记为表单级错误
    pub fn add_field_error(&mut self, name: &str, message: impl Into<String>) {
        let message = message.into();
        match self.field_mut(name) {
            Some(field) => field.errors.push(message),
            None => self.errors.push(message),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.fields.iter().any(|f| !f.errors.is_empty())
    }
}

/// 复选框提交值："1" 为选中
pub const CHECKBOX_CHECKED: &str = "1";

pub fn bool_marker(value: bool) -> &'static str {
    if value {
        CHECKBOX_CHECKED
    } else {
        "0"
    }
}

/// 将复选框/布尔请求参数解析为 bool
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("true"));
        assert!(parse_flag(" On "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("false"));
    }

    #[test]
    fn test_field_error_falls_back_to_form() {
        let mut form = FormView::new("form_role", "Create Role");
        form.push(FieldView::new("name", "Role Name", FieldKind::Text, ""));
        form.add_field_error("name", "Role name is required");
        form.add_field_error("missing", "Something else");

        assert_eq!(form.field("name").unwrap().errors.len(), 1);
        assert_eq!(form.errors, vec!["Something else".to_string()]);
        assert!(form.has_errors());
    }
}
