#![forbid(unsafe_code)]

use chrono::NaiveDate;

pub(in crate::store) fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration,
        Err(_) => return 0,
    };

    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}

pub(in crate::store) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
