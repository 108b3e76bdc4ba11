//! 请求参数来源

use crate::error::AppError;
use std::collections::HashMap;

/// 只读的请求参数
pub trait RequestParams {
    fn get_param(&self, name: &str) -> Option<&str>;
}

impl RequestParams for HashMap<String, String> {
    fn get_param(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// 取必需参数；缺失或为空时返回 `MissingParameter`
pub fn require_param<'a>(params: &'a dyn RequestParams, name: &str) -> Result<&'a str, AppError> {
    match params.get_param(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::missing_parameter(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_param() {
        let mut params = HashMap::new();
        params.insert("role".to_string(), "admins".to_string());
        params.insert("empty".to_string(), "  ".to_string());

        assert_eq!(require_param(&params, "role").unwrap(), "admins");
        assert!(matches!(
            require_param(&params, "empty"),
            Err(AppError::MissingParameter(_))
        ));
        assert!(matches!(
            require_param(&params, "absent"),
            Err(AppError::MissingParameter(_))
        ));
    }
}
