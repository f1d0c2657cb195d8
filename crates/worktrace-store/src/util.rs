use chrono::{DateTime, SecondsFormat, Utc};

use crate::{Error, Result};

/// Encode an instant for a TEXT column.
///
/// Fixed microsecond precision keeps the lexicographic order of stored
/// strings identical to chronological order, so `ORDER BY timestamp`
/// works without parsing.
pub(crate) fn encode_ts(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn encode_opt_ts(at: Option<DateTime<Utc>>) -> Option<String> {
    at.map(encode_ts)
}

pub(crate) fn decode_ts(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|err| Error::Corrupt(format!("bad timestamp '{}': {}", raw, err)))
}

pub(crate) fn decode_opt_ts(raw: Option<String>) -> Result<Option<DateTime<Utc>>> {
    raw.map(|s| decode_ts(&s)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_round_trip() {
        let at = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
            + chrono::Duration::milliseconds(1500);
        assert_eq!(decode_ts(&encode_ts(at)).unwrap(), at);
    }

    #[test]
    fn test_lexicographic_order_matches_chronological() {
        let base = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let earlier = encode_ts(base);
        let later = encode_ts(base + chrono::Duration::microseconds(1));
        assert!(earlier < later);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_ts("yesterday").is_err());
    }
}
