/// Integration-level tests for the `shared` crate.
///
/// Each section tests one module; unit tests that are tightly coupled to
/// private helpers live inside the modules themselves (see `#[cfg(test)]`
/// blocks in `notification.rs`).
// ---------------------------------------------------------------------------
// Notification records
// ---------------------------------------------------------------------------
#[cfg(test)]
mod notification_tests {
    use shared::types::*;

    fn sample_record_json() -> &'static str {
        r#"{
            "id": 7,
            "type": "warning",
            "title": "Budget exceeded",
            "message": "Groceries is 12% over budget this month",
            "timestamp": "2024-03-01T09:15:00Z",
            "read": false,
            "action_url": "/budgets",
            "action_text": "Review"
        }"#
    }

    #[test]
    fn record_deserializes_from_backend_json() {
        let r: NotificationRecord = serde_json::from_str(sample_record_json()).unwrap();
        assert_eq!(r.id, 7);
        assert_eq!(r.kind, NotificationKind::Warning);
        assert_eq!(r.title, "Budget exceeded");
        assert!(!r.read);
        assert_eq!(r.action_url.as_deref(), Some("/budgets"));
        assert_eq!(r.action_text.as_deref(), Some("Review"));
    }

    #[test]
    fn record_action_fields_default_to_none() {
        let json = r#"{"id":1,"type":"info","title":"t","message":"m",
                       "timestamp":"2024-01-01T00:00:00Z","read":true}"#;
        let r: NotificationRecord = serde_json::from_str(json).unwrap();
        assert!(r.action_url.is_none());
        assert!(r.action_text.is_none());
    }

    #[test]
    fn record_serializes_timestamp_as_rfc3339() {
        let r: NotificationRecord = serde_json::from_str(sample_record_json()).unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["timestamp"], "2024-03-01T09:15:00+00:00");
        // `kind` goes back out under its wire name
        assert_eq!(json["type"], "warning");
    }

    #[test]
    fn history_array_deserializes_in_given_order() {
        let json = r#"[
            {"id":3,"type":"info","title":"c","message":"m","timestamp":"2024-01-03T00:00:00Z","read":false},
            {"id":2,"type":"info","title":"b","message":"m","timestamp":"2024-01-02T00:00:00Z","read":true},
            {"id":1,"type":"info","title":"a","message":"m","timestamp":"2024-01-01T00:00:00Z","read":true}
        ]"#;
        let records: Vec<NotificationRecord> = serde_json::from_str(json).unwrap();
        // Backend pre-orders newest-first; we must not re-sort.
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn kind_round_trips_lowercase() {
        for (kind, wire) in [
            (NotificationKind::Success, "\"success\""),
            (NotificationKind::Info, "\"info\""),
            (NotificationKind::Warning, "\"warning\""),
            (NotificationKind::Error, "\"error\""),
        ] {
            assert_eq!(serde_json::to_string(&kind).unwrap(), wire);
            let back: NotificationKind = serde_json::from_str(wire).unwrap();
            assert_eq!(back, kind);
        }
    }
}

// ---------------------------------------------------------------------------
// Stream messages
// ---------------------------------------------------------------------------

#[cfg(test)]
mod stream_message_tests {
    use shared::types::*;

    #[test]
    fn handshake_with_only_type_and_message_parses() {
        let msg: StreamMessage = serde_json::from_str(
            r#"{"type":"connected","message":"Notification stream connected"}"#,
        )
        .unwrap();
        assert!(msg.is_handshake());
    }

    #[test]
    fn full_message_converts_with_all_fields() {
        let msg: StreamMessage = serde_json::from_str(
            r#"{"type":"success","id_db":9,"title":"Saved","message":"Layout saved",
                "timestamp":"2024-02-02T12:00:00Z","action_url":"/dash","action_text":"Open"}"#,
        )
        .unwrap();
        let r = msg.into_record().unwrap();
        assert_eq!(r.id, 9);
        assert_eq!(r.kind, NotificationKind::Success);
        assert_eq!(r.action_url.as_deref(), Some("/dash"));
        assert!(!r.read);
    }

    #[test]
    fn missing_timestamp_does_not_reject_the_message() {
        let msg: StreamMessage =
            serde_json::from_str(r#"{"type":"error","id_db":5,"title":"t","message":"m"}"#)
                .unwrap();
        // Conversion stamps "now" rather than dropping the notification.
        assert!(msg.into_record().is_some());
    }

    #[test]
    fn garbage_json_is_a_parse_error() {
        let res: Result<StreamMessage, _> = serde_json::from_str("not json at all");
        assert!(res.is_err());
    }
}

// ---------------------------------------------------------------------------
// Connection state
// ---------------------------------------------------------------------------

#[cfg(test)]
mod connection_tests {
    use shared::types::*;

    #[test]
    fn only_connected_reports_connected() {
        assert!(ConnectionState::Connected.is_connected());
        assert!(!ConnectionState::Connecting.is_connected());
        assert!(!ConnectionState::Disconnected.is_connected());
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(ConnectionState::Disconnected.to_string(), "disconnected");
        assert_eq!(ConnectionState::Connecting.to_string(), "connecting");
        assert_eq!(ConnectionState::Connected.to_string(), "connected");
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[cfg(test)]
mod config_tests {
    use shared::config::load_config;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    const MINIMAL: &str = r#"
        [server]
        base_url = "http://127.0.0.1:8000/api"

        [auth]
        token_path = "/tmp/3f-token"
    "#;

    #[test]
    fn minimal_config_loads_with_defaults() {
        let f = write_config(MINIMAL);
        let cfg = load_config(f.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.stream_path, "/notifications/stream");
        assert_eq!(cfg.stream.max_reconnect_attempts, 5);
        assert_eq!(cfg.stream.reconnect_base_delay_ms, 3000);
        assert_eq!(cfg.stream.history_limit, 20);
    }

    #[test]
    fn stream_endpoint_joins_without_double_slash() {
        let f = write_config(
            r#"
            [server]
            base_url = "http://127.0.0.1:8000/api/"

            [auth]
            token_path = "/tmp/3f-token"
        "#,
        );
        let cfg = load_config(f.path().to_str().unwrap()).unwrap();
        assert_eq!(
            cfg.server.stream_endpoint(),
            "http://127.0.0.1:8000/api/notifications/stream"
        );
    }

    #[test]
    fn empty_file_is_rejected() {
        let f = write_config("   \n");
        assert!(load_config(f.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let f = write_config(
            r#"
            [server]
            base_url = "ftp://example.com"

            [auth]
            token_path = "/tmp/3f-token"
        "#,
        );
        assert!(load_config(f.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn zero_reconnect_attempts_is_rejected() {
        let f = write_config(
            r#"
            [server]
            base_url = "http://127.0.0.1:8000/api"

            [auth]
            token_path = "/tmp/3f-token"

            [stream]
            max_reconnect_attempts = 0
        "#,
        );
        assert!(load_config(f.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(load_config("/nonexistent/notify.toml").is_err());
    }
}
