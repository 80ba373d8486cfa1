use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    fn app_name(self) -> &'static str {
        match self {
            Profile::Dev => "studydesk-dev",
            Profile::Prod => "studydesk",
        }
    }
}

/// Get the configuration directory path for studydesk
/// If profile is Dev, uses "studydesk-dev" instead of "studydesk"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "studydesk", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path for studydesk
/// If profile is Dev, uses "studydesk-dev" instead of "studydesk"
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "studydesk", profile.app_name())
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<chrono::NaiveDate, chrono::ParseError> {
    chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
}

/// Parse a reminder/due timestamp.
///
/// Accepts RFC 3339 (`2024-05-01T09:30:00Z`), a local `YYYY-MM-DD HH:MM`
/// form interpreted as UTC, or a bare date (midnight UTC).
pub fn parse_datetime(value: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let value = value.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&chrono::Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M") {
        return Some(naive.and_utc());
    }
    parse_date(value)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format a timestamp the way records store it (ISO 8601, millisecond precision)
pub fn format_iso(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Generate a record id from the current time in milliseconds.
///
/// Ids are strictly increasing within the process, so two records created
/// in the same millisecond never collide.
pub fn generate_id() -> String {
    let now = chrono::Utc::now().timestamp_millis();
    let mut prev = LAST_ID.load(Ordering::Relaxed);
    loop {
        let next = if now > prev { now } else { prev + 1 };
        match LAST_ID.compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next.to_string(),
            Err(actual) => prev = actual,
        }
    }
}

/// True if the string is empty after trimming whitespace
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_increasing() {
        let ids: Vec<i64> = (0..500)
            .map(|_| generate_id().parse().expect("numeric id"))
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn parse_datetime_accepts_supported_forms() {
        let rfc = parse_datetime("2024-05-01T09:30:00Z").expect("rfc3339");
        assert_eq!(format_iso(&rfc), "2024-05-01T09:30:00.000Z");

        let spaced = parse_datetime("2024-05-01 09:30").expect("spaced");
        assert_eq!(spaced, rfc);

        let date_only = parse_datetime("2024-05-01").expect("date");
        assert_eq!(format_iso(&date_only), "2024-05-01T00:00:00.000Z");

        assert!(parse_datetime("tomorrow").is_none());
    }

    #[test]
    fn expand_path_leaves_absolute_paths_alone() {
        assert_eq!(expand_path("/tmp/app.db"), PathBuf::from("/tmp/app.db"));
    }
}
