//! Focus session records and minute normalization.
//!
//! A [`SessionRecord`] is one logged focus attempt as it arrives from the
//! session feed. Only `"completed"` is a distinguished status; every other
//! value (`"failed"`, `"in_progress"`, ...) is treated the same way and
//! credited with the time actually elapsed.
//!
//! Parsing is lenient on purpose: malformed `minutes` or `elapsedSeconds`
//! values read as absent, and [`normalize`] turns absent values into a zero
//! contribution instead of an error.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, ValidationError};

/// Wire value of the only status that is treated specially.
pub const COMPLETED_STATUS: &str = "completed";

/// Completion state of a session.
///
/// The feed does not define a closed set of statuses, so anything other
/// than `"completed"` is kept verbatim in [`SessionStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Completed,
    Other(String),
}

impl SessionStatus {
    pub fn parse(raw: &str) -> Self {
        if raw == COMPLETED_STATUS {
            SessionStatus::Completed
        } else {
            SessionStatus::Other(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SessionStatus::Completed => COMPLETED_STATUS,
            SessionStatus::Other(raw) => raw,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, SessionStatus::Completed)
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::Other(String::new())
    }
}

impl Serialize for SessionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One logged focus attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// When the session was logged
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_status")]
    pub status: SessionStatus,
    /// Planned length, consulted only for completed sessions
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub minutes: Option<f64>,
    /// Time actually spent, consulted only for non-completed sessions
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub elapsed_seconds: Option<f64>,
}

impl SessionRecord {
    /// A completed session credited with `minutes`.
    pub fn completed(timestamp: DateTime<Utc>, minutes: f64) -> Self {
        Self {
            timestamp,
            status: SessionStatus::Completed,
            minutes: Some(minutes),
            elapsed_seconds: None,
        }
    }

    /// A session that ended with any other status after `elapsed_seconds`.
    pub fn unfinished(timestamp: DateTime<Utc>, status: &str, elapsed_seconds: f64) -> Self {
        Self {
            timestamp,
            status: SessionStatus::parse(status),
            minutes: None,
            elapsed_seconds: Some(elapsed_seconds),
        }
    }
}

/// Which field a [`Contribution`] was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContributionSource {
    /// `minutes` of a completed session
    CompletedMinutes,
    /// `floor(elapsedSeconds / 60)` of a non-completed session
    ElapsedSeconds,
    /// The consulted field was absent or unusable
    Missing,
}

/// Whole minutes a single session adds to its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub minutes: u64,
    pub source: ContributionSource,
}

impl Contribution {
    fn missing() -> Self {
        Self {
            minutes: 0,
            source: ContributionSource::Missing,
        }
    }
}

/// Map a session to its minute contribution.
///
/// Completed sessions contribute `minutes`; every other status contributes
/// `floor(elapsed_seconds / 60)`. The field that is not consulted is ignored
/// even when present. Never fails: absent, negative or non-finite values
/// yield a zero contribution tagged [`ContributionSource::Missing`].
pub fn normalize(record: &SessionRecord) -> Contribution {
    // Chart values are whole minutes: fractional `minutes` are floored here,
    // the same integer coercion applied to elapsed seconds.
    if record.status.is_completed() {
        match record.minutes.and_then(whole_units) {
            Some(minutes) => Contribution {
                minutes,
                source: ContributionSource::CompletedMinutes,
            },
            None => Contribution::missing(),
        }
    } else {
        match record.elapsed_seconds.and_then(whole_units) {
            Some(seconds) => Contribution {
                minutes: seconds / 60,
                source: ContributionSource::ElapsedSeconds,
            },
            None => Contribution::missing(),
        }
    }
}

fn whole_units(value: f64) -> Option<u64> {
    if value.is_finite() && value >= 0.0 {
        Some(value.floor() as u64)
    } else {
        None
    }
}

/// Parse a JSON session feed.
///
/// A top-level `null` is an empty feed. Array elements that cannot be read
/// as a session (most often a missing or unparseable `timestamp`) are
/// skipped and logged.
///
/// # Errors
///
/// Returns an error if `json` is not valid JSON or is neither an array nor
/// `null`.
pub fn parse_sessions(json: &str) -> Result<Vec<SessionRecord>> {
    let value: Value = serde_json::from_str(json)?;
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => {
            return Err(ValidationError::InvalidValue {
                field: "sessions".to_string(),
                message: format!("expected an array of session records, got {}", json_kind(&other)),
            }
            .into())
        }
    };

    let total = items.len();
    let mut sessions = Vec::with_capacity(total);
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<SessionRecord>(item) {
            Ok(record) => sessions.push(record),
            Err(err) => warn!(index, error = %err, "skipping unreadable session record"),
        }
    }

    debug!(total, kept = sessions.len(), "parsed session feed");
    Ok(sessions)
}

/// Read and parse a JSON session feed from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or [`parse_sessions`] fails.
pub fn read_sessions(path: &Path) -> Result<Vec<SessionRecord>> {
    let content = std::fs::read_to_string(path)?;
    parse_sessions(&content)
}

/// Interpret a JSON timestamp.
///
/// Accepts RFC 3339 strings, offset-less `YYYY-MM-DDTHH:MM:SS[.fff]` (read
/// as UTC), bare `YYYY-MM-DD` dates (UTC midnight) and epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => parse_timestamp_str(raw),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    parse_timestamp(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("unusable timestamp: {value}")))
}

fn deserialize_status<'de, D>(deserializer: D) -> std::result::Result<SessionStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => SessionStatus::parse(&raw),
        Some(Value::Null) | None => SessionStatus::default(),
        Some(other) => SessionStatus::Other(other.to_string()),
    })
}

fn deserialize_lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(lenient_number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_completed_session_contributes_its_minutes() {
        let c = normalize(&SessionRecord::completed(ts(), 45.0));
        assert_eq!(c.minutes, 45);
        assert_eq!(c.source, ContributionSource::CompletedMinutes);
    }

    #[test]
    fn test_unfinished_session_contributes_whole_elapsed_minutes() {
        let c = normalize(&SessionRecord::unfinished(ts(), "failed", 125.0));
        assert_eq!(c.minutes, 2);
        assert_eq!(c.source, ContributionSource::ElapsedSeconds);

        let c = normalize(&SessionRecord::unfinished(ts(), "in_progress", 59.0));
        assert_eq!(c.minutes, 0);
    }

    #[test]
    fn test_completed_session_without_minutes_contributes_zero() {
        let record = SessionRecord {
            timestamp: ts(),
            status: SessionStatus::Completed,
            minutes: None,
            elapsed_seconds: Some(600.0),
        };
        let c = normalize(&record);
        assert_eq!(c.minutes, 0);
        assert_eq!(c.source, ContributionSource::Missing);
    }

    #[test]
    fn test_unfinished_session_ignores_minutes_field() {
        let record = SessionRecord {
            timestamp: ts(),
            status: SessionStatus::parse("failed"),
            minutes: Some(25.0),
            elapsed_seconds: None,
        };
        assert_eq!(normalize(&record), Contribution::missing());
    }

    #[test]
    fn test_negative_and_fractional_values() {
        assert_eq!(normalize(&SessionRecord::completed(ts(), -3.0)).minutes, 0);
        assert_eq!(normalize(&SessionRecord::completed(ts(), 12.9)).minutes, 12);
        assert_eq!(
            normalize(&SessionRecord::unfinished(ts(), "failed", -120.0)).source,
            ContributionSource::Missing
        );
    }

    #[test]
    fn test_every_non_completed_status_is_treated_alike() {
        for status in ["failed", "abandoned", "in_progress", "", "Completed"] {
            let c = normalize(&SessionRecord::unfinished(ts(), status, 185.0));
            assert_eq!(c.minutes, 3, "status {status:?}");
        }
    }

    #[test]
    fn test_deserializes_wire_shape() {
        let json = r#"{
            "id": "1705312800000",
            "type": "house",
            "minutes": 25,
            "elapsedSeconds": 1500,
            "timestamp": "2024-01-15T10:00:00.000Z",
            "status": "completed"
        }"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.timestamp, ts());
        assert!(record.status.is_completed());
        assert_eq!(record.minutes, Some(25.0));
        assert_eq!(record.elapsed_seconds, Some(1500.0));
    }

    #[test]
    fn test_lenient_fields_read_as_absent() {
        let json = r#"{"timestamp": 1705312800000, "status": 7, "minutes": "abc", "elapsedSeconds": "185"}"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.timestamp, ts());
        assert_eq!(record.status, SessionStatus::Other("7".to_string()));
        assert_eq!(record.minutes, None);
        assert_eq!(record.elapsed_seconds, Some(185.0));
    }

    #[test]
    fn test_missing_status_is_not_completed() {
        let record: SessionRecord =
            serde_json::from_str(r#"{"timestamp": "2024-01-15", "minutes": 30}"#).unwrap();
        assert!(!record.status.is_completed());
        assert_eq!(normalize(&record).minutes, 0);
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = ts();
        for raw in [
            r#""2024-01-15T10:00:00Z""#,
            r#""2024-01-15T11:00:00+01:00""#,
            r#""2024-01-15T10:00:00""#,
            r#""2024-01-15 10:00:00.000""#,
            "1705312800000",
        ] {
            let value: Value = serde_json::from_str(raw).unwrap();
            assert_eq!(parse_timestamp(&value), Some(expected), "input {raw}");
        }

        let date_only = parse_timestamp(&Value::String("2024-01-15".into())).unwrap();
        assert_eq!(date_only, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());

        assert_eq!(parse_timestamp(&Value::String("yesterday".into())), None);
        assert_eq!(parse_timestamp(&Value::Bool(true)), None);
    }

    #[test]
    fn test_parse_sessions_skips_unreadable_records() {
        let json = r#"[
            {"timestamp": "2024-01-15T10:00:00Z", "status": "completed", "minutes": 25},
            {"status": "completed", "minutes": 25},
            {"timestamp": "not a date", "status": "failed", "elapsedSeconds": 300},
            {"timestamp": "2024-01-15T12:00:00Z", "status": "failed", "elapsedSeconds": 300}
        ]"#;
        let sessions = parse_sessions(json).unwrap();
        assert_eq!(sessions.len(), 2);
        assert!(sessions[0].status.is_completed());
        assert_eq!(sessions[1].elapsed_seconds, Some(300.0));
    }

    #[test]
    fn test_parse_sessions_treats_null_as_empty() {
        assert!(parse_sessions("null").unwrap().is_empty());
        assert!(parse_sessions("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_sessions_rejects_non_arrays() {
        let err = parse_sessions(r#"{"sessions": []}"#).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::InvalidValue { .. })));

        let err = parse_sessions("[{").unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));
    }

    #[test]
    fn test_read_sessions_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sessions.json");
        std::fs::write(&path, r#"[{"timestamp": "2024-01-15T10:00:00Z", "status": "completed", "minutes": 25}]"#)
            .unwrap();

        let sessions = read_sessions(&path).unwrap();
        assert_eq!(sessions, vec![SessionRecord::completed(ts(), 25.0)]);

        let err = read_sessions(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }

    #[test]
    fn test_serialization_uses_wire_names() {
        let record = SessionRecord::unfinished(ts(), "failed", 90.0);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["elapsedSeconds"], 90.0);
        assert!(json.get("minutes").is_none());

        let back: SessionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
