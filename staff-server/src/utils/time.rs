//! 时间工具函数 — 业务时区转换
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 层只接收 `i64` Unix millis。

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 业务时区的当前日期
pub fn current_date(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// 日期 + 时分秒 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn date_hms_to_millis(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(hour, min, sec).unwrap();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, 0, 0, 0, tz)
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_hms_to_millis(next_day, 0, 0, 0, tz)
}

/// 当前日历月的边界 [start, end) Unix millis (业务时区)
pub fn month_bounds_millis(date: NaiveDate, tz: Tz) -> (i64, i64) {
    let month_start =
        NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
    .unwrap_or(month_start);
    (
        day_start_millis(month_start, tz),
        day_start_millis(next_month, tz),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates() {
        assert!(parse_date("2025-01-31").is_ok());
        assert!(parse_date("31/01/2025").is_err());
        assert!(parse_date("not-a-date").is_err());
    }

    #[test]
    fn day_bounds_are_midnight_to_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let start = day_start_millis(date, Tz::UTC);
        let end = day_end_millis(date, Tz::UTC);
        assert_eq!(end - start, 24 * 60 * 60 * 1000);
    }

    #[test]
    fn day_start_respects_timezone() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let utc = day_start_millis(date, Tz::UTC);
        let madrid = day_start_millis(date, chrono_tz::Europe::Madrid);
        // Madrid is UTC+2 in June, so its midnight is 2h before UTC midnight
        assert_eq!(utc - madrid, 2 * 60 * 60 * 1000);
    }

    #[test]
    fn month_bounds_cover_calendar_month() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
        let (start, end) = month_bounds_millis(date, Tz::UTC);
        let dec_first = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let jan_first = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(start, day_start_millis(dec_first, Tz::UTC));
        assert_eq!(end, day_start_millis(jan_first, Tz::UTC));
    }
}
