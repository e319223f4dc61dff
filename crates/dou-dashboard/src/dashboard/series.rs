use std::collections::HashMap;

use chrono::{Days, NaiveDate};

use crate::publications::DayBucket;

/// Zero-filled rows for the `days` days before `today`, oldest first.
/// `today` itself is not part of the window.
pub fn day_template(today: NaiveDate, days: u32) -> Vec<DayBucket> {
    (1..=days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
        .map(DayBucket::empty)
        .collect()
}

/// Overlay sparse aggregate rows onto `template`.
///
/// Output keeps the template's length and order. A slot is replaced by the
/// sparse row carrying the identical date string; for repeated dates the last
/// row wins. Sparse rows outside the template are dropped.
pub fn complete_day_series(template: Vec<DayBucket>, sparse: Vec<DayBucket>) -> Vec<DayBucket> {
    let by_date: HashMap<String, DayBucket> = sparse
        .into_iter()
        .map(|row| (row.date.clone(), row))
        .collect();

    template
        .into_iter()
        .map(|slot| by_date.get(&slot.date).cloned().unwrap_or(slot))
        .collect()
}
