//! 用户偏好服务
//! 读取用户偏好与全局默认值，驱动 [`PreferenceResolver`]，并在提交通过后写回

use crate::{
    datetime::PhpDateFormatter,
    error::AppError,
    i18n::{LocaleCatalog, TimezoneCatalog},
    models::{
        form::{FormState, FormView},
        preference::{PreferenceKey, UserPreferences},
    },
    repository::{ConfigBackend, IniSection, APP_DOCUMENT, GLOBAL_SECTION},
    request::RequestParams,
    services::{notification::Submission, preference_resolver::PreferenceResolver},
};
use chrono_tz::Tz;
use std::sync::Arc;

pub const PREFERENCES_REDIRECT: &str = "/preferences";

pub struct PreferenceService {
    /// 每个用户一个文档
    preferences: Arc<dyn ConfigBackend>,
    /// config.ini 所在后端
    app_config: Arc<dyn ConfigBackend>,
    locales: Arc<dyn LocaleCatalog>,
    timezones: Arc<dyn TimezoneCatalog>,
    system_timezone: String,
}

impl PreferenceService {
    pub fn new(
        preferences: Arc<dyn ConfigBackend>,
        app_config: Arc<dyn ConfigBackend>,
        locales: Arc<dyn LocaleCatalog>,
        timezones: Arc<dyn TimezoneCatalog>,
        system_timezone: impl Into<String>,
    ) -> Self {
        Self {
            preferences,
            app_config,
            locales,
            timezones,
            system_timezone: system_timezone.into(),
        }
    }

    /// 读取用户已保存的偏好
    pub fn load(&self, user: &str) -> Result<UserPreferences, AppError> {
        Ok(UserPreferences::from_document(self.preferences.load(user)?))
    }

    /// 全局配置中的默认值；缺少 [global] 节时视为空
    pub fn global_defaults(&self) -> Result<IniSection, AppError> {
        let document = self.app_config.load(APP_DOCUMENT)?;
        Ok(document.section(GLOBAL_SECTION).cloned().unwrap_or_default())
    }

    /// 示例输出使用用户当前生效的时区
    fn formatter_for(&self, prefs: &UserPreferences, global: &IniSection) -> PhpDateFormatter {
        let timezone = prefs
            .get(PreferenceKey::Timezone)
            .or_else(|| global.get(PreferenceKey::Timezone.local_key()).map(String::as_str))
            .unwrap_or(self.system_timezone.as_str());
        PhpDateFormatter::new(timezone.parse::<Tz>().unwrap_or(Tz::UTC))
    }

    /// 展示表单（包括开关切换后的自动重新提交）
    pub fn render(&self, user: &str, params: &dyn RequestParams) -> Result<FormView, AppError> {
        let prefs = self.load(user)?;
        let global = self.global_defaults()?;
        let formatter = self.formatter_for(&prefs, &global);
        let resolver = PreferenceResolver::new(
            &prefs,
            &global,
            self.locales.as_ref(),
            self.timezones.as_ref(),
            &formatter,
        )
        .with_system_timezone(&self.system_timezone);

        Ok(resolver.render(params))
    }

    /// 校验并保存偏好
    pub fn submit(&self, user: &str, params: &dyn RequestParams) -> Result<Submission, AppError> {
        let mut prefs = self.load(user)?;
        let global = self.global_defaults()?;
        let formatter = self.formatter_for(&prefs, &global);
        let result = PreferenceResolver::new(
            &prefs,
            &global,
            self.locales.as_ref(),
            self.timezones.as_ref(),
            &formatter,
        )
        .with_system_timezone(&self.system_timezone)
        .submit(params);

        let set = match result {
            Ok(set) => set,
            Err(form) => {
                tracing::info!(user = %user, "Preference submission rejected");
                metrics::counter!("preference_submit_total", "outcome" => "invalid").increment(1);
                return Ok(Submission::Invalid {
                    form,
                    notification: None,
                });
            }
        };

        let mut form = self.render(user, params)?;
        form.state = FormState::Persisting;
        prefs.apply(&set);
        let document = prefs.into_document();

        match self.preferences.save(user, &document) {
            Ok(()) => {
                tracing::info!(user = %user, "Preferences saved");
                metrics::counter!("preference_submit_total", "outcome" => "committed").increment(1);
                Ok(Submission::Committed {
                    message: "Preferences updated successfully".to_string(),
                    redirect: PREFERENCES_REDIRECT.to_string(),
                })
            }
            Err(e) => {
                tracing::error!(user = %user, error = %e, "Failed to persist preferences");
                metrics::counter!("preference_submit_total", "outcome" => "failed").increment(1);
                Ok(Submission::failed(form))
            }
        }
    }
}
