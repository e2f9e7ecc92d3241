//! 通知文案的日期格式化
//!
//! 产品面向单一地区，所有通知中的时间一律按 Asia/Shanghai 呈现。

use chrono::{DateTime, Utc};
use chrono_tz::Asia::Shanghai;

/// 格式化为"几月几日 几点几分"，用于时间变更通知
pub fn format_datetime(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Shanghai)
        .format("%m月%d日 %H:%M")
        .to_string()
}

/// 格式化为"几月几日"，用于取消/移除类通知
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Shanghai).format("%m月%d日").to_string()
}
