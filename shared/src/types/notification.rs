use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Notification kind
// ---------------------------------------------------------------------------

/// Severity/category of a notification. Opaque to the stream logic; the view
/// layer maps it to an icon and styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
    /// Anything the backend sends that we don't recognise. Rendered with a
    /// generic icon rather than rejected.
    Unknown,
}

impl NotificationKind {
    /// Parse a wire string, falling back to [`Unknown`](Self::Unknown).
    pub fn parse(raw: &str) -> Self {
        match raw {
            "success" => Self::Success,
            "info" => Self::Info,
            "warning" => Self::Warning,
            "error" => Self::Error,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

// Hand-rolled serde: unknown wire strings must degrade to `Unknown`, which
// derive cannot express for a plain string enum.
impl Serialize for NotificationKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NotificationKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

// ---------------------------------------------------------------------------
// Notification record
// ---------------------------------------------------------------------------

/// One notification as held in the in-memory history list.
///
/// Deserializes directly from the backend's `GET /notifications/` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(with = "lenient_utc")]
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    #[serde(default)]
    pub action_url: Option<String>,
    #[serde(default)]
    pub action_text: Option<String>,
}

// ---------------------------------------------------------------------------
// Pushed stream message
// ---------------------------------------------------------------------------

/// Wire shape of one pushed SSE payload.
///
/// Two cases share this shape:
/// - the handshake sentinel `{"type": "connected", ...}` — no other fields
///   guaranteed;
/// - a live notification — carries `id_db` (the server-assigned row id) plus
///   the display fields.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub id_db: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "lenient_utc::opt")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub action_url: Option<String>,
    #[serde(default)]
    pub action_text: Option<String>,
}

impl StreamMessage {
    /// `true` for the connection-acknowledgment sentinel, which is consumed
    /// by the client and never becomes a record.
    pub fn is_handshake(&self) -> bool {
        self.kind == "connected"
    }

    /// Convert a live message into a fresh (unread) record.
    ///
    /// Returns `None` when `id_db` is missing — without a server-assigned id
    /// the record could never be marked read or deduplicated, so the message
    /// is treated as malformed.
    pub fn into_record(self) -> Option<NotificationRecord> {
        let id = self.id_db?;
        Some(NotificationRecord {
            id,
            kind: NotificationKind::parse(&self.kind),
            title: self.title,
            message: self.message,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            read: false,
            action_url: self.action_url,
            action_text: self.action_text,
        })
    }
}

// ---------------------------------------------------------------------------
// Timestamp parsing
// ---------------------------------------------------------------------------

/// The backend emits RFC 3339 timestamps, but older rows were written with a
/// naive UTC `isoformat()` (no offset suffix). Accept both; emit RFC 3339.
pub mod lenient_utc {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| raw.parse::<NaiveDateTime>().map(|naive| naive.and_utc()))
    }

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Variant for optional fields (`#[serde(default, deserialize_with = ...)]`).
    pub fn opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw).map(Some).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handshake_sentinel_is_detected() {
        let msg: StreamMessage =
            serde_json::from_str(r#"{"type":"connected","message":"Notification stream connected"}"#)
                .unwrap();
        assert!(msg.is_handshake());
        assert!(msg.id_db.is_none());
    }

    #[test]
    fn live_message_becomes_unread_record() {
        let msg: StreamMessage = serde_json::from_str(
            r#"{"type":"info","id_db":42,"title":"Hi","message":"Hello","timestamp":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        let record = msg.into_record().unwrap();
        assert_eq!(record.id, 42);
        assert_eq!(record.kind, NotificationKind::Info);
        assert!(!record.read);
        assert_eq!(record.timestamp.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn message_without_id_db_is_rejected() {
        let msg: StreamMessage = serde_json::from_str(
            r#"{"type":"info","title":"Hi","message":"no id here"}"#,
        )
        .unwrap();
        assert!(!msg.is_handshake());
        assert!(msg.into_record().is_none());
    }

    #[test]
    fn naive_utc_timestamps_are_accepted() {
        // Legacy rows written with datetime.utcnow().isoformat()
        let parsed = lenient_utc::parse("2024-06-15T10:30:00.123456").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-06-15T10:30:00.123456+00:00");
    }

    #[test]
    fn unknown_kind_falls_back() {
        assert_eq!(NotificationKind::parse("promo"), NotificationKind::Unknown);
        let record: NotificationRecord = serde_json::from_str(
            r#"{"id":1,"type":"promo","title":"t","message":"m","timestamp":"2024-01-01T00:00:00Z","read":true}"#,
        )
        .unwrap();
        assert_eq!(record.kind, NotificationKind::Unknown);
    }
}
