//! 配置系统
//! 从环境变量加载所有配置

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址，例如 "0.0.0.0:8080"
    pub addr: String,
    /// 优雅关闭超时时间（秒）
    pub graceful_shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 存放 config.ini 与 roles.ini 的目录
    pub config_dir: PathBuf,
    /// 每个用户一个 <user>.ini 的偏好目录
    pub preferences_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct I18nConfig {
    /// 语言包目录，每个子目录名即一个可用的 locale 代码
    pub locale_dir: PathBuf,
    /// 全局配置未设置时区时使用的系统时区
    pub default_timezone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub i18n: I18nConfig,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        // 添加默认配置
        settings = settings
            .set_default("server.addr", "0.0.0.0:8080")?
            .set_default("server.graceful_shutdown_timeout_secs", 10)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("storage.config_dir", "/etc/monitor-console")?
            .set_default("storage.preferences_dir", "/etc/monitor-console/preferences")?
            .set_default("i18n.locale_dir", "/usr/share/monitor-console/locale")?
            .set_default("i18n.default_timezone", "UTC")?;

        // 从环境变量加载配置（前缀为 CONSOLE_）
        settings = settings.add_source(
            Environment::with_prefix("CONSOLE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = settings.build()?.try_deserialize()?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    fn validate(&self) -> Result<(), ConfigError> {
        // 验证端口范围
        if let Some(port_str) = self.server.addr.split(':').next_back() {
            if let Ok(port) = port_str.parse::<u16>() {
                if port < 1024 {
                    return Err(ConfigError::Message("Server port should be >= 1024".to_string()));
                }
            }
        }

        // 验证日志级别
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        // 验证日志格式
        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty",
                    self.logging.format
                )))
            }
        }

        // 验证系统时区
        if self.i18n.default_timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(ConfigError::Message(format!(
                "Invalid default timezone: {}",
                self.i18n.default_timezone
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("CONSOLE_SERVER__ADDR");
        std::env::remove_var("CONSOLE_LOGGING__LEVEL");
        std::env::remove_var("CONSOLE_LOGGING__FORMAT");
        std::env::remove_var("CONSOLE_STORAGE__CONFIG_DIR");
        std::env::remove_var("CONSOLE_I18N__DEFAULT_TIMEZONE");
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        clear_env();

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.server.addr, "0.0.0.0:8080");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.i18n.default_timezone, "UTC");
    }

    #[test]
    #[serial]
    fn test_config_storage_override() {
        clear_env();
        std::env::set_var("CONSOLE_STORAGE__CONFIG_DIR", "/tmp/console");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.storage.config_dir, PathBuf::from("/tmp/console"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_config_validation_invalid_port() {
        clear_env();
        std::env::set_var("CONSOLE_SERVER__ADDR", "0.0.0.0:80");

        let result = AppConfig::from_env();
        assert!(result.is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_config_validation_invalid_timezone() {
        clear_env();
        std::env::set_var("CONSOLE_I18N__DEFAULT_TIMEZONE", "Mars/Olympus_Mons");

        let result = AppConfig::from_env();
        assert!(result.is_err());

        clear_env();
    }
}
