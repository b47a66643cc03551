//! Relative date formatting for app cards.

use chrono::NaiveDate;

/// Format a date relative to `today` the way the cards display it:
/// "Today", "Yesterday", "N days ago" inside the last week, otherwise the
/// plain date. Future dates (store clock skew) fall through to the plain
/// form as well.
pub fn smart_date(date: NaiveDate, today: NaiveDate) -> String {
    let diff_days = (today - date).num_days();
    match diff_days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{diff_days} days ago"),
        _ => format_date(date),
    }
}

/// Plain `Mon DD, YYYY` form used beyond the relative window.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
