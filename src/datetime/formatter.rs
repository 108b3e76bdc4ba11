//! 日期格式化
//! 以 PHP `date()` 风格的单字符记号渲染时间戳，用于帮助文本中的示例输出

use chrono::{DateTime, Datelike, NaiveDate, Offset, Timelike, Utc};
use chrono_tz::Tz;

/// 按格式串渲染 Unix 时间戳
pub trait DateFormatter: Send + Sync {
    fn format(&self, timestamp: i64, pattern: &str) -> String;
}

/// 在指定时区下渲染的格式化器
#[derive(Debug, Clone, Copy)]
pub struct PhpDateFormatter {
    timezone: Tz,
}

impl PhpDateFormatter {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn utc() -> Self {
        Self::new(Tz::UTC)
    }
}

impl Default for PhpDateFormatter {
    fn default() -> Self {
        Self::utc()
    }
}

impl DateFormatter for PhpDateFormatter {
    fn format(&self, timestamp: i64, pattern: &str) -> String {
        let Some(utc) = DateTime::<Utc>::from_timestamp(timestamp, 0) else {
            return String::new();
        };
        let dt = utc.with_timezone(&self.timezone);

        let mut out = String::with_capacity(pattern.len() * 2);
        let mut chars = pattern.chars();
        while let Some(c) = chars.next() {
            match c {
                // 反斜杠转义下一个字符
                '\\' => {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                'd' => out.push_str(&format!("{:02}", dt.day())),
                'D' => out.push_str(&dt.format("%a").to_string()),
                'j' => out.push_str(&dt.day().to_string()),
                'l' => out.push_str(&dt.format("%A").to_string()),
                'N' => out.push_str(&dt.weekday().number_from_monday().to_string()),
                'S' => out.push_str(ordinal_suffix(dt.day())),
                'w' => out.push_str(&dt.weekday().num_days_from_sunday().to_string()),
                'z' => out.push_str(&dt.ordinal0().to_string()),
                'W' => out.push_str(&format!("{:02}", dt.iso_week().week())),
                'F' => out.push_str(&dt.format("%B").to_string()),
                'm' => out.push_str(&format!("{:02}", dt.month())),
                'M' => out.push_str(&dt.format("%b").to_string()),
                'n' => out.push_str(&dt.month().to_string()),
                't' => out.push_str(&days_in_month(dt.year(), dt.month()).to_string()),
                'L' => out.push(if is_leap_year(dt.year()) { '1' } else { '0' }),
                'o' => out.push_str(&dt.iso_week().year().to_string()),
                'Y' => out.push_str(&dt.year().to_string()),
                'y' => out.push_str(&format!("{:02}", dt.year().rem_euclid(100))),
                'a' => out.push_str(if dt.hour() < 12 { "am" } else { "pm" }),
                'A' => out.push_str(if dt.hour() < 12 { "AM" } else { "PM" }),
                'B' => out.push_str(&format!("{:03}", swatch_beat(timestamp))),
                'g' => out.push_str(&dt.hour12().1.to_string()),
                'G' => out.push_str(&dt.hour().to_string()),
                'h' => out.push_str(&format!("{:02}", dt.hour12().1)),
                'H' => out.push_str(&format!("{:02}", dt.hour())),
                'i' => out.push_str(&format!("{:02}", dt.minute())),
                's' => out.push_str(&format!("{:02}", dt.second())),
                'u' => out.push_str(&format!("{:06}", dt.nanosecond() / 1_000)),
                'v' => out.push_str(&format!("{:03}", dt.nanosecond() / 1_000_000)),
                'e' => out.push_str(self.timezone.name()),
                'T' => out.push_str(&dt.format("%Z").to_string()),
                'O' => out.push_str(&dt.format("%z").to_string()),
                'P' => out.push_str(&dt.format("%:z").to_string()),
                'Z' => out.push_str(&dt.offset().fix().local_minus_utc().to_string()),
                'c' => out.push_str(&dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string()),
                'r' => out.push_str(&dt.to_rfc2822()),
                'U' => out.push_str(&timestamp.to_string()),
                other => out.push(other),
            }
        }
        out
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(30)
}

/// Swatch Internet Time（以 UTC+1 为基准）
fn swatch_beat(timestamp: i64) -> i64 {
    let seconds = (timestamp + 3600).rem_euclid(86_400);
    (seconds * 10) / 864
}
