//! 日期时间工具

pub mod formatter;
pub mod validator;

pub use formatter::{DateFormatter, PhpDateFormatter};
pub use validator::{validate_date_format, validate_time_format};
