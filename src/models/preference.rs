//! 用户偏好模型
//! 固定的 `app.*` 键集合，以及表单提交后产出的偏好映射

use crate::repository::IniDocument;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// 偏好键所在的节
pub const PREFERENCE_SECTION: &str = "app";

/// 偏好键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    Language,
    Timezone,
    DateFormat,
    TimeFormat,
    ShowBenchmark,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 5] = [
        PreferenceKey::Language,
        PreferenceKey::Timezone,
        PreferenceKey::DateFormat,
        PreferenceKey::TimeFormat,
        PreferenceKey::ShowBenchmark,
    ];

    /// 完整键名，例如 `app.dateFormat`
    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceKey::Language => "app.language",
            PreferenceKey::Timezone => "app.timezone",
            PreferenceKey::DateFormat => "app.dateFormat",
            PreferenceKey::TimeFormat => "app.timeFormat",
            PreferenceKey::ShowBenchmark => "app.show_benchmark",
        }
    }

    /// `app` 节内的键名，同时也是全局配置 `[global]` 节中的键名
    pub fn local_key(self) -> &'static str {
        match self {
            PreferenceKey::Language => "language",
            PreferenceKey::Timezone => "timezone",
            PreferenceKey::DateFormat => "dateFormat",
            PreferenceKey::TimeFormat => "timeFormat",
            PreferenceKey::ShowBenchmark => "show_benchmark",
        }
    }
}

/// 某个用户已保存的偏好
#[derive(Debug, Clone, Default)]
pub struct UserPreferences {
    document: IniDocument,
}

impl UserPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: IniDocument) -> Self {
        Self { document }
    }

    pub fn into_document(self) -> IniDocument {
        self.document
    }

    pub fn has(&self, key: PreferenceKey) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: PreferenceKey) -> Option<&str> {
        self.document.get(PREFERENCE_SECTION, key.local_key())
    }

    pub fn set(&mut self, key: PreferenceKey, value: impl Into<String>) {
        self.document
            .set(PREFERENCE_SECTION, key.local_key(), value.into());
    }

    pub fn remove(&mut self, key: PreferenceKey) {
        self.document.remove(PREFERENCE_SECTION, key.local_key());
    }

    pub fn with(mut self, key: PreferenceKey, value: &str) -> Self {
        self.set(key, value);
        self
    }

    /// 写入表单产出的偏好；None 表示删除该键以恢复继承
    pub fn apply(&mut self, set: &PreferenceSet) {
        for key in PreferenceKey::ALL {
            match set.get(key) {
                Some(value) => self.set(key, value),
                None => self.remove(key),
            }
        }
    }
}

/// 偏好表单提交后的结果映射
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreferenceSet {
    pub language: Option<String>,
    pub timezone: Option<String>,
    pub date_format: Option<String>,
    pub time_format: Option<String>,
    pub show_benchmark: bool,
}

impl PreferenceSet {
    /// 以字符串形式读取某个键的值；show_benchmark 为 false 时视为未设置
    pub fn get(&self, key: PreferenceKey) -> Option<String> {
        match key {
            PreferenceKey::Language => self.language.clone(),
            PreferenceKey::Timezone => self.timezone.clone(),
            PreferenceKey::DateFormat => self.date_format.clone(),
            PreferenceKey::TimeFormat => self.time_format.clone(),
            PreferenceKey::ShowBenchmark => self.show_benchmark.then(|| "1".to_string()),
        }
    }
}

impl Serialize for PreferenceSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry(PreferenceKey::Language.as_str(), &self.language)?;
        map.serialize_entry(PreferenceKey::Timezone.as_str(), &self.timezone)?;
        map.serialize_entry(PreferenceKey::DateFormat.as_str(), &self.date_format)?;
        map.serialize_entry(PreferenceKey::TimeFormat.as_str(), &self.time_format)?;
        map.serialize_entry(PreferenceKey::ShowBenchmark.as_str(), &self.show_benchmark)?;
        map.end()
    }
}
