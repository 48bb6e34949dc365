use chrono::{Local, NaiveDateTime, Timelike};

/// Current local wall-clock time truncated to whole seconds, the precision stored in SQLite.
/// Daily grouping works on these local calendar dates.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
