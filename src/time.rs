use chrono::Duration;
use crate::constants::MS_TO_KMH;

/// Format a duration as an ISO 8601 duration string (`PT1H30M`, `PT45S`, `PT0S`)
#[must_use]
pub fn format_iso_duration(duration: Duration) -> String {
    let total_ms = duration.num_milliseconds();
    let sign = if total_ms < 0 { "-" } else { "" };
    let total_ms = total_ms.unsigned_abs();

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;

    let mut out = format!("{sign}PT");
    if hours > 0 {
        out.push_str(&format!("{hours}H"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}M"));
    }
    if millis > 0 {
        let fraction = format!("{millis:03}");
        out.push_str(&format!("{seconds}.{}S", fraction.trim_end_matches('0')));
    } else if seconds > 0 || (hours == 0 && minutes == 0) {
        out.push_str(&format!("{seconds}S"));
    }
    out
}

/// Parse an ISO 8601 duration string such as `PT1H30M`, `P1DT2H` or `PT12.5S`
///
/// Years and months are rejected since they have no fixed length.
///
/// # Errors
///
/// Returns an error if the string is not a valid day/time ISO 8601 duration.
pub fn parse_iso_duration(s: &str) -> Result<Duration, String> {
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let rest = rest
        .strip_prefix('P')
        .ok_or_else(|| format!("Invalid ISO 8601 duration '{s}': missing 'P'"))?;
    if rest.is_empty() {
        return Err(format!("Invalid ISO 8601 duration '{s}': empty"));
    }

    let mut total_ms: i64 = 0;
    let mut in_time = false;
    let mut number = String::new();
    let mut saw_component = false;

    for c in rest.chars() {
        match c {
            'T' if !in_time && number.is_empty() => in_time = true,
            '0'..='9' | '.' => number.push(c),
            unit => {
                if number.is_empty() {
                    return Err(format!("Invalid ISO 8601 duration '{s}': missing value before '{unit}'"));
                }
                let value: f64 = number
                    .parse()
                    .map_err(|e| format!("Invalid ISO 8601 duration '{s}': {e}"))?;
                let unit_ms = match (in_time, unit) {
                    (false, 'W') => 604_800_000.0,
                    (false, 'D') => 86_400_000.0,
                    (true, 'H') => 3_600_000.0,
                    (true, 'M') => 60_000.0,
                    (true, 'S') => 1000.0,
                    _ => return Err(format!("Invalid ISO 8601 duration '{s}': unsupported unit '{unit}'")),
                };
                let scaled = (value * unit_ms).round();
                #[allow(clippy::cast_precision_loss)]
                let max_ms = i64::MAX as f64;
                if !scaled.is_finite() || scaled >= max_ms {
                    return Err(format!("Invalid ISO 8601 duration '{s}': out of range"));
                }
                #[allow(clippy::cast_possible_truncation)]
                let component = scaled as i64;
                total_ms = total_ms
                    .checked_add(component)
                    .ok_or_else(|| format!("Invalid ISO 8601 duration '{s}': out of range"))?;
                number.clear();
                saw_component = true;
            }
        }
    }

    if !number.is_empty() || !saw_component {
        return Err(format!("Invalid ISO 8601 duration '{s}': trailing or missing component"));
    }

    let duration = Duration::try_milliseconds(total_ms)
        .ok_or_else(|| format!("Invalid ISO 8601 duration '{s}': out of range"))?;
    Ok(if negative { -duration } else { duration })
}

/// Convert a speed in m/s to km/h, rounded to one decimal
#[must_use]
pub fn ms_to_kmh(speed: f64) -> f64 {
    (speed * MS_TO_KMH * 10.0).round() / 10.0
}

/// Convert a speed in km/h to m/s
#[must_use]
pub fn kmh_to_ms(speed: f64) -> f64 {
    speed / MS_TO_KMH
}

/// Serde helpers storing a `Duration` as an ISO 8601 string
pub mod iso_duration_serde {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_iso_duration(*duration))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_iso_duration(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde helpers storing an `Option<Duration>` as an optional ISO 8601 string
pub mod option_iso_duration_serde {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&super::format_iso_duration(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| super::parse_iso_duration(&s))
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_iso_duration_zero() {
        assert_eq!(format_iso_duration(Duration::zero()), "PT0S");
    }

    #[test]
    fn test_format_iso_duration_hours_minutes() {
        let duration = Duration::hours(1) + Duration::minutes(30);
        assert_eq!(format_iso_duration(duration), "PT1H30M");
    }

    #[test]
    fn test_format_iso_duration_fractional_seconds() {
        assert_eq!(format_iso_duration(Duration::milliseconds(12_500)), "PT12.5S");
    }

    #[test]
    fn test_parse_iso_duration_time_components() {
        let duration = parse_iso_duration("PT2H5M30S").expect("should parse");
        assert_eq!(duration, Duration::seconds(2 * 3600 + 5 * 60 + 30));
    }

    #[test]
    fn test_parse_iso_duration_days() {
        let duration = parse_iso_duration("P1DT1H").expect("should parse");
        assert_eq!(duration, Duration::hours(25));
    }

    #[test]
    fn test_parse_iso_duration_fractional() {
        let duration = parse_iso_duration("PT0.25S").expect("should parse");
        assert_eq!(duration, Duration::milliseconds(250));
    }

    #[test]
    fn test_parse_iso_duration_minutes_vs_months() {
        assert!(parse_iso_duration("P1M").is_err());
        assert_eq!(parse_iso_duration("PT1M").expect("should parse"), Duration::minutes(1));
    }

    #[test]
    fn test_parse_iso_duration_invalid() {
        assert!(parse_iso_duration("").is_err());
        assert!(parse_iso_duration("P").is_err());
        assert!(parse_iso_duration("PT").is_err());
        assert!(parse_iso_duration("1H").is_err());
        assert!(parse_iso_duration("PT5").is_err());
        assert!(parse_iso_duration("PTH").is_err());
    }

    #[test]
    fn test_parse_iso_duration_out_of_range() {
        assert!(parse_iso_duration("P99999999999999999DT99999999999999999H").is_err());
        assert!(parse_iso_duration("P100000000000DT2000000000000H").is_err());
        assert!(parse_iso_duration(&format!("PT{}S", "9".repeat(400))).is_err());
        assert_eq!(
            parse_iso_duration("P100000000000D").expect("should parse"),
            Duration::days(100_000_000_000)
        );
    }

    #[test]
    fn test_parse_format_agree() {
        let duration = Duration::seconds(5400);
        let formatted = format_iso_duration(duration);
        assert_eq!(parse_iso_duration(&formatted).expect("should parse"), duration);
    }

    #[test]
    fn test_ms_to_kmh_rounds_to_one_decimal() {
        assert_eq!(ms_to_kmh(10.0), 36.0);
        assert_eq!(ms_to_kmh(27.777_78), 100.0);
        assert_eq!(ms_to_kmh(12.345), 44.4);
    }

    #[test]
    fn test_kmh_to_ms() {
        assert!((kmh_to_ms(36.0) - 10.0).abs() < 1e-9);
    }
}
