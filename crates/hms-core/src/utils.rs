//! 通用工具函数

use chrono::{Local, NaiveDate};
use uuid::Uuid;

/// 日期字符串格式 (YYYY-MM-DD)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 生成新的记录标识符
pub fn generate_record_id() -> Uuid {
    Uuid::new_v4()
}

/// 本地时区的当天日期，格式为 `YYYY-MM-DD`
pub fn today() -> String {
    format_date(Local::now().date_naive())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 解析记录中的ID字符串，无法解析时返回 `None`
pub fn parse_record_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
