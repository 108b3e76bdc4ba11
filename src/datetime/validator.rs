//! 日期/时间格式串校验
//! 只接受格式化器词表中的日期（或时间）记号与常用分隔符

use crate::error::AppError;

const DATE_TOKENS: &str = "dDjlNSwzWFmMntLoYycrU";
const TIME_TOKENS: &str = "aABgGhHisuv";
/// 时区记号对日期与时间格式都有效
const ZONE_TOKENS: &str = "eTOPZ";
const SEPARATORS: &str = ".:-/;, ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormatKind {
    Date,
    Time,
}

impl FormatKind {
    fn tokens(self) -> &'static str {
        match self {
            FormatKind::Date => DATE_TOKENS,
            FormatKind::Time => TIME_TOKENS,
        }
    }

    fn label(self) -> &'static str {
        match self {
            FormatKind::Date => "date",
            FormatKind::Time => "time",
        }
    }

    fn accepts(self, c: char) -> bool {
        self.tokens().contains(c) || ZONE_TOKENS.contains(c) || SEPARATORS.contains(c)
    }
}

/// 校验格式串，出现词表外的字符时返回 `InvalidFormat`
///
/// `\` 转义的下一个字符按字面输出，总是合法；结尾孤立的 `\` 不合法。
fn validate_format(kind: FormatKind, pattern: &str) -> Result<(), AppError> {
    let mut valid = true;
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        let ok = match c {
            '\\' => chars.next().is_some(),
            other => kind.accepts(other),
        };
        if !ok {
            valid = false;
            break;
        }
    }

    if valid {
        Ok(())
    } else {
        Err(AppError::invalid_format(format!(
            "Invalid {} format \"{}\": only the tokens \"{}{}\", separators \"{}\" and \\-escaped literals are allowed",
            kind.label(),
            pattern,
            kind.tokens(),
            ZONE_TOKENS,
            SEPARATORS
        )))
    }
}

pub fn validate_date_format(pattern: &str) -> Result<(), AppError> {
    validate_format(FormatKind::Date, pattern)
}

pub fn validate_time_format(pattern: &str) -> Result<(), AppError> {
    validate_format(FormatKind::Time, pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_date_formats() {
        assert!(validate_date_format("d/m/Y").is_ok());
        assert!(validate_date_format("Y-m-d").is_ok());
        assert!(validate_date_format("D, j. F Y").is_ok());
    }

    #[test]
    fn test_invalid_date_format() {
        let err = validate_date_format("not-a-format").unwrap_err();
        assert!(matches!(err, AppError::InvalidFormat(_)));
        // 时间记号不属于日期词表
        assert!(validate_date_format("Y-m-d H:i").is_err());
    }

    #[test]
    fn test_time_formats() {
        assert!(validate_time_format("g:i A").is_ok());
        assert!(validate_time_format("H:i:s").is_ok());
        assert!(validate_time_format("H:i Y").is_err());
    }

    #[test]
    fn test_formatter_only_tokens_accepted() {
        assert!(validate_date_format("\\W\\e\\e\\k W, Y").is_ok());
        assert!(validate_date_format("c").is_ok());
        assert!(validate_date_format("d.m.Y T").is_ok());
        assert!(validate_time_format("H:i:s.v P").is_ok());
        assert!(validate_time_format("\\a\\t H:i").is_ok());
        // 结尾孤立的反斜杠
        assert!(validate_time_format("H:i\\").is_err());
    }
}
