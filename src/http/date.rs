//! HTTP date module
//!
//! Formats `Last-Modified` values and parses `If-Modified-Since` (RFC 9110 §5.6.7).

use chrono::{DateTime, NaiveDateTime, Utc};

const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";
const RFC850_DATE: &str = "%A, %d-%b-%y %H:%M:%S GMT";
const ASCTIME_DATE: &str = "%a %b %e %H:%M:%S %Y";

/// Format a timestamp as IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: DateTime<Utc>) -> String {
    time.format(IMF_FIXDATE).to_string()
}

/// Parse any of the three HTTP date forms
///
/// Returns `None` for anything unparseable; callers treat that as "no validator".
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }

    [IMF_FIXDATE, RFC850_DATE, ASCTIME_DATE]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}
