// shared/src/types/connection.rs
// Connection state machine vocabulary - minimal, no external dependencies

/// State of the one push connection a client owns.
///
/// Transitions:
/// ```text
/// Disconnected ──connect()──▶ Connecting ──Opened──▶ Connected
///       ▲                          │                     │
///       └────────ErrorOccurred─────┴─────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
        }
    }
}

/// Named events that drive the client's state machine, independent of any
/// particular push-transport API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// The transport handshake completed (HTTP 200, event stream open).
    Opened,
    /// One raw pushed payload (the `data:` field of an SSE frame).
    MessageReceived(String),
    /// The transport reported an error or the stream ended.
    ErrorOccurred,
    /// The hosting surface became foreground-visible again. Sole recovery
    /// path once automatic retries are exhausted.
    VisibilityRestored,
}
