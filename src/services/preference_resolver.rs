//! 通用偏好表单
//! 计算语言、时区、日期格式、时间格式的显示值与“使用默认值”开关，
//! 校验提交并产出 `app.*` 偏好映射。本模块不负责持久化。

use crate::{
    datetime::{validate_date_format, validate_time_format, DateFormatter},
    error::AppError,
    i18n::{LocaleCatalog, TimezoneCatalog},
    models::{
        form::{parse_flag, FieldKind, FieldView, FormState, FormView, CHECKBOX_CHECKED},
        preference::{PreferenceKey, PreferenceSet, UserPreferences},
    },
    repository::IniSection,
    request::RequestParams,
};

pub const DEFAULT_DATE_FORMAT: &str = "d/m/Y";
pub const DEFAULT_TIME_FORMAT: &str = "g:i A";

/// 四个可覆盖的偏好
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverridableField {
    Language,
    Timezone,
    DateFormat,
    TimeFormat,
}

impl OverridableField {
    pub const ALL: [OverridableField; 4] = [
        OverridableField::Language,
        OverridableField::Timezone,
        OverridableField::DateFormat,
        OverridableField::TimeFormat,
    ];

    pub fn key(self) -> PreferenceKey {
        match self {
            OverridableField::Language => PreferenceKey::Language,
            OverridableField::Timezone => PreferenceKey::Timezone,
            OverridableField::DateFormat => PreferenceKey::DateFormat,
            OverridableField::TimeFormat => PreferenceKey::TimeFormat,
        }
    }

    /// 值字段的请求参数名
    pub fn field_name(self) -> &'static str {
        match self {
            OverridableField::Language => "language",
            OverridableField::Timezone => "timezone",
            OverridableField::DateFormat => "date_format",
            OverridableField::TimeFormat => "time_format",
        }
    }

    /// 开关的请求参数名
    pub fn toggle_name(self) -> &'static str {
        match self {
            OverridableField::Language => "default_language",
            OverridableField::Timezone => "default_timezone",
            OverridableField::DateFormat => "default_date_format",
            OverridableField::TimeFormat => "default_time_format",
        }
    }

    fn label(self) -> &'static str {
        match self {
            OverridableField::Language => "Your Current Language",
            OverridableField::Timezone => "Your Current Timezone",
            OverridableField::DateFormat => "Preferred Date Format",
            OverridableField::TimeFormat => "Preferred Time Format",
        }
    }

    fn toggle_label(self) -> &'static str {
        match self {
            OverridableField::Language => "Use Default Language",
            OverridableField::Timezone => "Use Default Timezone",
            OverridableField::DateFormat => "Use Default Date Format",
            OverridableField::TimeFormat => "Use Default Time Format",
        }
    }
}

/// 单个偏好的计算结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub use_default: bool,
    pub value: String,
}

impl ResolvedField {
    pub fn required(&self) -> bool {
        !self.use_default
    }

    pub fn editable(&self) -> bool {
        !self.use_default
    }
}

/// 校验通过的提交值
#[derive(Debug, Clone, Default)]
pub struct SubmittedPreferences {
    pub default_language: bool,
    pub language: String,
    pub default_timezone: bool,
    pub timezone: String,
    pub default_date_format: bool,
    pub date_format: String,
    pub default_time_format: bool,
    pub time_format: String,
    pub show_benchmark: String,
}

/// 提交值 -> 偏好映射：开关为真的字段记为 None
pub fn get_preferences(values: &SubmittedPreferences) -> PreferenceSet {
    fn pick(use_default: bool, value: &str) -> Option<String> {
        (!use_default).then(|| value.to_string())
    }

    PreferenceSet {
        language: pick(values.default_language, &values.language),
        timezone: pick(values.default_timezone, &values.timezone),
        date_format: pick(values.default_date_format, &values.date_format),
        time_format: pick(values.default_time_format, &values.time_format),
        show_benchmark: values.show_benchmark == CHECKBOX_CHECKED,
    }
}

/// 偏好解析器
///
/// 显示值的优先级：请求值（仅在字段可编辑时）→ 用户偏好 → 全局配置 → 内置默认值。
pub struct PreferenceResolver<'a> {
    preferences: &'a UserPreferences,
    global: &'a IniSection,
    locales: &'a dyn LocaleCatalog,
    timezones: &'a dyn TimezoneCatalog,
    formatter: &'a dyn DateFormatter,
    system_timezone: &'a str,
    now: i64,
}

impl<'a> PreferenceResolver<'a> {
    pub fn new(
        preferences: &'a UserPreferences,
        global: &'a IniSection,
        locales: &'a dyn LocaleCatalog,
        timezones: &'a dyn TimezoneCatalog,
        formatter: &'a dyn DateFormatter,
    ) -> Self {
        Self {
            preferences,
            global,
            locales,
            timezones,
            formatter,
            system_timezone: "UTC",
            now: chrono::Utc::now().timestamp(),
        }
    }

    /// 全局配置未设置时区时的回退值
    pub fn with_system_timezone(mut self, timezone: &'a str) -> Self {
        self.system_timezone = timezone;
        self
    }

    /// 帮助文本示例所用的时间戳
    pub fn with_now(mut self, timestamp: i64) -> Self {
        self.now = timestamp;
        self
    }

    fn fallback(&self, field: OverridableField) -> &str {
        match field {
            OverridableField::Language => self.locales.default_code(),
            OverridableField::Timezone => self.system_timezone,
            OverridableField::DateFormat => DEFAULT_DATE_FORMAT,
            OverridableField::TimeFormat => DEFAULT_TIME_FORMAT,
        }
    }

    /// 计算开关与显示值
    pub fn resolve(&self, field: OverridableField, params: &dyn RequestParams) -> ResolvedField {
        let key = field.key();
        let use_default = params
            .get_param(field.toggle_name())
            .map(parse_flag)
            .unwrap_or_else(|| !self.preferences.has(key));

        // 禁用字段的提交值一律忽略
        let submitted = params
            .get_param(field.field_name())
            .filter(|v| !use_default && !v.is_empty());

        let value = submitted
            .or_else(|| self.preferences.get(key))
            .or_else(|| self.global.get(key.local_key()).map(String::as_str))
            .unwrap_or_else(|| self.fallback(field))
            .to_string();

        ResolvedField { use_default, value }
    }

    fn show_benchmark(&self, params: &dyn RequestParams) -> bool {
        match params.get_param("show_benchmark") {
            Some(v) => v == CHECKBOX_CHECKED,
            None => self
                .preferences
                .get(PreferenceKey::ShowBenchmark)
                .map(parse_flag)
                .unwrap_or(false),
        }
    }

    fn example(&self, pattern: &str) -> String {
        format!(
            "Example result: {}",
            self.formatter.format(self.now, pattern)
        )
    }

    fn field_view(&self, field: OverridableField, resolved: &ResolvedField) -> FieldView {
        let kind = match field {
            OverridableField::Language | OverridableField::Timezone => FieldKind::Select,
            OverridableField::DateFormat | OverridableField::TimeFormat => FieldKind::Text,
        };
        let view = FieldView::new(field.field_name(), field.label(), kind, resolved.value.clone())
            .required(resolved.required())
            .editable(resolved.editable());

        match field {
            OverridableField::Language => view
                .options(self.locales.options())
                .help_text("Use the following language to display texts and messages"),
            OverridableField::Timezone => view
                .options(self.timezones.identifiers().to_vec())
                .help_text("Use the following timezone for dates and times"),
            OverridableField::DateFormat => view.help_text(format!(
                "Display dates according to this format. {}",
                self.example(&resolved.value)
            )),
            OverridableField::TimeFormat => view.help_text(format!(
                "Display times according to this format. {}",
                self.example(&resolved.value)
            )),
        }
    }

    /// 构建表单视图；开关字段带 auto-submit 标记
    pub fn render(&self, params: &dyn RequestParams) -> FormView {
        let mut form = FormView::new("form_preference_set", "Save Changes");
        for field in OverridableField::ALL {
            let resolved = self.resolve(field, params);
            form.push(
                FieldView::checkbox(field.toggle_name(), field.toggle_label(), resolved.use_default)
                    .auto_submit(),
            );
            form.push(self.field_view(field, &resolved));
        }
        form.push(FieldView::checkbox(
            "show_benchmark",
            "Use benchmark",
            self.show_benchmark(params),
        ));
        form
    }

    fn validate_field(&self, field: OverridableField, value: &str) -> Result<(), AppError> {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Value is required and can't be empty".to_string(),
            ));
        }
        match field {
            OverridableField::Language if !self.locales.contains(value) => Err(
                AppError::BadRequest(format!("\"{}\" is not an available language", value)),
            ),
            OverridableField::Timezone if !self.timezones.contains(value) => Err(
                AppError::BadRequest(format!("\"{}\" is not a valid timezone", value)),
            ),
            OverridableField::DateFormat => validate_date_format(value),
            OverridableField::TimeFormat => validate_time_format(value),
            _ => Ok(()),
        }
    }

    /// 校验提交；失败时返回带内联错误、保留输入值的表单
    pub fn submit(&self, params: &dyn RequestParams) -> Result<PreferenceSet, FormView> {
        let mut form = self.render(params);
        form.state = FormState::Validating;

        let mut submitted = SubmittedPreferences {
            show_benchmark: params
                .get_param("show_benchmark")
                .unwrap_or_default()
                .to_string(),
            ..Default::default()
        };

        for field in OverridableField::ALL {
            let resolved = self.resolve(field, params);
            if !resolved.use_default {
                if let Err(e) = self.validate_field(field, &resolved.value) {
                    form.add_field_error(field.field_name(), e.user_message());
                }
            }

            let (toggle, value) = match field {
                OverridableField::Language => {
                    (&mut submitted.default_language, &mut submitted.language)
                }
                OverridableField::Timezone => {
                    (&mut submitted.default_timezone, &mut submitted.timezone)
                }
                OverridableField::DateFormat => {
                    (&mut submitted.default_date_format, &mut submitted.date_format)
                }
                OverridableField::TimeFormat => {
                    (&mut submitted.default_time_format, &mut submitted.time_format)
                }
            };
            *toggle = resolved.use_default;
            *value = resolved.value;
        }

        if form.has_errors() {
            form.state = FormState::Invalid;
            return Err(form);
        }

        form.state = FormState::Valid;
        Ok(get_preferences(&submitted))
    }
}
