use chrono::Local;

/// Joins parts with `.` into a stable identifier, e.g.
/// `abcd-1234.county.2026-08-29` for a field-level row id.
pub fn stable_id(parts: &[&str]) -> String {
    parts.join(".")
}

/// Today's date formatted the way the reporting datasets accept it.
pub fn today_string() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
