//! Display helpers for the timestamps carried on the wire.

use chrono::NaiveDateTime;

const WIRE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";

/// Parses a `yyyy-MM-ddTHH:mm:ss` timestamp. Trailing input such as a zone
/// offset is ignored.
pub fn parse_wire_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_and_remainder(raw.trim(), WIRE_TIMESTAMP_FORMAT)
        .map(|(timestamp, _rest)| timestamp)
        .ok()
}

/// Formats a wire timestamp as `dd.MM.yyyy`, returning the input unchanged
/// when it cannot be parsed.
pub fn to_display_date(raw: &str) -> String {
    match parse_wire_timestamp(raw) {
        Some(timestamp) => timestamp.format(DISPLAY_DATE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}
