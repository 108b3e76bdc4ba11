//! 语言与时区枚举
//! 偏好表单的下拉选项来源

use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};

/// 未安装任何语言包时使用的 locale
pub const DEFAULT_LOCALE: &str = "en_US";

/// 可用语言
pub trait LocaleCatalog: Send + Sync {
    /// 已安装的 locale 代码（不一定包含默认 locale）
    fn available_codes(&self) -> Vec<String>;

    fn default_code(&self) -> &str {
        DEFAULT_LOCALE
    }

    /// 下拉选项：已安装的代码加上默认代码，排序去重
    fn options(&self) -> Vec<String> {
        let mut codes = self.available_codes();
        codes.push(self.default_code().to_string());
        codes.sort();
        codes.dedup();
        codes
    }

    fn contains(&self, code: &str) -> bool {
        code == self.default_code() || self.available_codes().iter().any(|c| c == code)
    }
}

/// 扫描语言包目录：每个形如 `de_DE` 的子目录即一个 locale
#[derive(Debug, Clone)]
pub struct DirectoryLocales {
    dir: PathBuf,
}

impl DirectoryLocales {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl LocaleCatalog for DirectoryLocales {
    fn available_codes(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(dir = %self.dir.display(), error = %e, "Locale directory not readable");
                return Vec::new();
            }
        };

        let mut codes: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| is_locale_code(name))
            .collect();
        codes.sort();
        codes
    }
}

/// 固定列表（测试用）
#[derive(Debug, Clone, Default)]
pub struct StaticLocales {
    codes: Vec<String>,
}

impl StaticLocales {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }
}

impl LocaleCatalog for StaticLocales {
    fn available_codes(&self) -> Vec<String> {
        self.codes.clone()
    }
}

/// `ll_CC` 形式
fn is_locale_code(name: &str) -> bool {
    let mut parts = name.split('_');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(lang), Some(country), None) => {
            lang.len() == 2
                && country.len() == 2
                && lang.chars().all(|c| c.is_ascii_lowercase())
                && country.chars().all(|c| c.is_ascii_uppercase())
        }
        _ => false,
    }
}

/// 可用时区
pub trait TimezoneCatalog: Send + Sync {
    fn identifiers(&self) -> &[String];

    fn contains(&self, identifier: &str) -> bool {
        self.identifiers().iter().any(|tz| tz == identifier)
    }
}

static TZ_IDENTIFIERS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut names: Vec<String> = chrono_tz::TZ_VARIANTS
        .iter()
        .map(|tz| tz.name().to_string())
        .collect();
    names.sort();
    names
});

/// IANA 时区数据库中的全部标识符
#[derive(Debug, Clone, Copy, Default)]
pub struct IanaTimezones;

impl TimezoneCatalog for IanaTimezones {
    fn identifiers(&self) -> &[String] {
        &TZ_IDENTIFIERS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_include_default_once() {
        let locales = StaticLocales::new(["de_DE", "en_US", "fr_FR"]);
        assert_eq!(locales.options(), vec!["de_DE", "en_US", "fr_FR"]);
        assert!(locales.contains("en_US"));
        assert!(!locales.contains("xx_XX"));
    }

    #[test]
    fn test_directory_locales() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("de_DE")).unwrap();
        std::fs::create_dir(dir.path().join("templates")).unwrap();
        std::fs::write(dir.path().join("fr_FR"), "not a directory").unwrap();

        let locales = DirectoryLocales::new(dir.path());
        assert_eq!(locales.available_codes(), vec!["de_DE".to_string()]);
        assert_eq!(locales.options(), vec!["de_DE", "en_US"]);
    }

    #[test]
    fn test_missing_locale_directory() {
        let locales = DirectoryLocales::new("/nonexistent/locale");
        assert!(locales.available_codes().is_empty());
        assert_eq!(locales.options(), vec![DEFAULT_LOCALE]);
    }

    #[test]
    fn test_iana_timezones() {
        let tz = IanaTimezones;
        assert!(tz.contains("Europe/Berlin"));
        assert!(tz.contains("UTC"));
        assert!(!tz.contains("Mars/Olympus_Mons"));
    }
}
