use chrono::NaiveDate;

#[must_use]
pub fn format_date(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

#[must_use]
pub fn format_window(starts_on: NaiveDate, ends_on: NaiveDate) -> String {
    format!("{} to {}", format_date(starts_on), format_date(ends_on))
}

#[must_use]
pub fn format_minutes(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h} h"),
        (h, m) => format!("{h} h {m} min"),
    }
}
