use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

const FALLBACK_FORMATS: [&str; 2] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

pub fn parse_timestamp(given: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(given) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(parsed) = DateTime::parse_from_str(given, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(parsed.with_timezone(&Utc));
    }

    for fmt in FALLBACK_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(given, fmt) {
            return Some(parsed.and_utc());
        }
    }

    None
}

/// timestamps the server sends in a format we do not know are treated as
/// missing instead of failing the whole payload
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>
{
    let given: Option<String> = Option::deserialize(deserializer)?;

    Ok(given.as_deref().and_then(parse_timestamp))
}
