//! Pure view-model layer.
//!
//! Turning records + connection state into renderable data is a pure
//! function here; actually drawing it is the job of whatever implements
//! [`Renderer`]. Nothing in this module touches the network or the store.

use chrono::{DateTime, Utc};
use std::time::Duration;

use shared::types::{ConnectionState, NotificationKind, NotificationRecord};

/// How long a toast should stay on screen before auto-dismissing.
pub const TOAST_DISMISS: Duration = Duration::from_millis(5000);

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLink {
    pub url: String,
    pub label: String,
}

/// One row of the history panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub id: i64,
    pub icon: &'static str,
    pub title: String,
    pub message: String,
    pub time_label: String,
    pub read: bool,
    pub action: Option<ActionLink>,
}

/// The whole history panel plus the unread badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryView {
    pub items: Vec<HistoryItem>,
    pub unread: usize,
    /// Badge text; `None` means the badge is hidden (zero unread).
    pub badge: Option<String>,
    pub connection: ConnectionState,
}

impl HistoryView {
    /// Render the "no notifications" placeholder instead of a list.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A transient toast alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub kind: NotificationKind,
    pub icon: &'static str,
    pub title: String,
    pub message: String,
    pub action: Option<ActionLink>,
    pub dismiss_after: Duration,
}

// ---------------------------------------------------------------------------
// Pure builders
// ---------------------------------------------------------------------------

/// Icon name per notification kind (the dashboard's Font Awesome glyphs,
/// minus the `fa-` prefix).
pub fn icon_for(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "circle-check",
        NotificationKind::Info => "circle-info",
        NotificationKind::Warning => "triangle-exclamation",
        NotificationKind::Error => "circle-xmark",
        NotificationKind::Unknown => "bell",
    }
}

/// Compact relative time: "now" under a minute, then minutes, then hours,
/// then the plain date.
pub fn relative_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(ts).num_seconds();
    if secs < 60 {
        "now".to_string()
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        format!("{}h", secs / 3600)
    } else {
        ts.format("%Y-%m-%d").to_string()
    }
}

fn action_link(record: &NotificationRecord) -> Option<ActionLink> {
    record.action_url.as_ref().map(|url| ActionLink {
        url: url.clone(),
        label: record
            .action_text
            .clone()
            .unwrap_or_else(|| "View".to_string()),
    })
}

/// Build the history panel view. `now` is passed in so the result is a pure
/// function of its inputs.
pub fn history_view(
    records: &[NotificationRecord],
    connection: ConnectionState,
    now: DateTime<Utc>,
) -> HistoryView {
    let items = records
        .iter()
        .map(|r| HistoryItem {
            id: r.id,
            icon: icon_for(r.kind),
            title: r.title.clone(),
            message: r.message.clone(),
            time_label: relative_time(r.timestamp, now),
            read: r.read,
            action: action_link(r),
        })
        .collect();

    let unread = records.iter().filter(|r| !r.read).count();

    HistoryView {
        items,
        unread,
        badge: (unread > 0).then(|| unread.to_string()),
        connection,
    }
}

/// Build a toast for a freshly pushed record. Returns `None` when title or
/// message is empty — there is nothing meaningful to flash.
pub fn toast_view(record: &NotificationRecord) -> Option<ToastView> {
    if record.title.is_empty() || record.message.is_empty() {
        return None;
    }
    Some(ToastView {
        kind: record.kind,
        icon: icon_for(record.kind),
        title: record.title.clone(),
        message: record.message.clone(),
        action: action_link(record),
        dismiss_after: TOAST_DISMISS,
    })
}

// ---------------------------------------------------------------------------
// Renderer seam
// ---------------------------------------------------------------------------

/// Presentation boundary. The stream client re-renders synchronously after
/// every mutation; implementations decide what that means on their surface.
pub trait Renderer: Send {
    fn render_history(&mut self, view: &HistoryView);
    fn render_toast(&mut self, toast: &ToastView);
    /// Optional audio cue for a new notification.
    fn notification_cue(&mut self) {}
}
