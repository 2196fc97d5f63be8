//! Small helpers shared across the dashboard.
//!
//! - Capitalization for chart labels and strategy types
//! - String truncation for log fields
//! - Audio reference parsing for the speech player
//! - Wall-clock formatting for the status log

use chrono::{DateTime, Local};

/// Capitalize the first character of a string.
///
/// Used for category chart labels ("politics" -> "Politics") and mitigation
/// strategy types.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(upcase("hello"), "Hello");
/// assert_eq!(upcase(""), "");
/// ```
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and byte
/// count appended. Cuts on a character boundary.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Extract the file name the backend serves audio under.
///
/// The backend reports the path it wrote the audio to (for example
/// `data/summary_20250506.mp3`); only the last path segment is served
/// under `/audio/`. A reference without separators is returned as-is.
///
/// # Returns
///
/// `None` when the last segment is empty, `.` or `..`, since such a name
/// points at a directory rather than an audio file.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(audio_file_name("data/summary.mp3"), Some("summary.mp3"));
/// assert_eq!(audio_file_name("data/"), None);
/// ```
pub fn audio_file_name(reference: &str) -> Option<&str> {
    let name = reference.rsplit('/').next().unwrap_or(reference);
    match name {
        "" | "." | ".." => None,
        name => Some(name),
    }
}

/// Format a timestamp as `HH:MM:SS` for the status log.
pub fn clock_time(at: &DateTime<Local>) -> String {
    at.format("%H:%M:%S").to_string()
}
