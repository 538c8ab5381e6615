//! The notification stream client.
//!
//! Owns one push connection, the in-memory history, and the connection state
//! machine. Everything — pushed messages, reconnect timers, user actions —
//! is serialized through [`NotificationStreamClient::run`]'s single event
//! loop, so no record is ever mutated by two code paths at once.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use shared::types::client_config::StreamConfig;
use shared::types::{ConnectionState, StreamEvent, StreamMessage};

use crate::api::NotificationApi;
use crate::backoff::ReconnectPolicy;
use crate::store::NotificationStore;
use crate::token::TokenSource;
use crate::transport::{PushHandle, PushTransport, TransportEvent};
use crate::view::{self, Renderer};

// ---------------------------------------------------------------------------
// External inputs
// ---------------------------------------------------------------------------

/// User/host actions multiplexed into the client's event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// The hosting surface became foreground-visible again.
    VisibilityRestored,
    MarkAsRead(i64),
    MarkAllAsRead,
    /// Clear the whole history. The caller is responsible for any user
    /// confirmation before sending this.
    ClearAll,
    Shutdown,
}

enum Wakeup {
    Stream(StreamEvent),
    Command(ClientCommand),
    ReconnectDue,
    Closed,
}

// ---------------------------------------------------------------------------
// NotificationStreamClient
// ---------------------------------------------------------------------------

pub struct NotificationStreamClient {
    api: Arc<dyn NotificationApi>,
    transport: Arc<dyn PushTransport>,
    tokens: Arc<dyn TokenSource>,
    renderer: Box<dyn Renderer>,
    store: NotificationStore,
    state: ConnectionState,
    policy: ReconnectPolicy,
    history_limit: u32,
    handle: Option<PushHandle>,
    reconnect_at: Option<Instant>,
}

impl NotificationStreamClient {
    pub fn new(
        api: Arc<dyn NotificationApi>,
        transport: Arc<dyn PushTransport>,
        tokens: Arc<dyn TokenSource>,
        renderer: Box<dyn Renderer>,
        config: &StreamConfig,
    ) -> Self {
        Self {
            api,
            transport,
            tokens,
            renderer,
            store: NotificationStore::new(),
            state: ConnectionState::Disconnected,
            policy: ReconnectPolicy::new(
                config.max_reconnect_attempts,
                std::time::Duration::from_millis(config.reconnect_base_delay_ms),
            ),
            history_limit: config.history_limit,
            handle: None,
            reconnect_at: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn records(&self) -> &[shared::types::NotificationRecord] {
        self.store.records()
    }

    pub fn unread_count(&self) -> usize {
        self.store.unread_count()
    }

    pub fn reconnect_attempts(&self) -> u32 {
        self.policy.attempts()
    }

    pub fn reconnect_scheduled(&self) -> bool {
        self.reconnect_at.is_some()
    }

    // -----------------------------------------------------------------------
    // Public operations
    // -----------------------------------------------------------------------

    /// Fetch the full history; the result replaces the in-memory list.
    /// Failure is logged and leaves the list at its prior value — no retry.
    pub async fn load_history(&mut self) {
        match self.api.history(self.history_limit).await {
            Ok(records) => {
                info!("Loaded {} notifications", records.len());
                self.store.replace_all(records);
                self.render();
            }
            Err(e) => error!("Error loading notification history: {}", e),
        }
    }

    /// Establish the push connection.
    ///
    /// No token is a deliberate skip, not an error: no stream is opened and
    /// no retry is scheduled. An existing connection is discarded first, so
    /// re-connecting is idempotent and supersedes any pending timer.
    pub async fn connect(&mut self) {
        self.handle = None;
        self.reconnect_at = None;

        let Some(token) = self.tokens.load() else {
            warn!("No auth token, skipping notification stream");
            self.state = ConnectionState::Disconnected;
            self.render();
            return;
        };

        self.state = ConnectionState::Connecting;
        self.render();

        match self.transport.open(&token).await {
            Ok(handle) => {
                self.handle = Some(handle);
                self.handle_stream_event(StreamEvent::Opened).await;
            }
            Err(e) => {
                error!("Error connecting to notification stream: {}", e);
                self.handle_stream_event(StreamEvent::ErrorOccurred).await;
            }
        }
    }

    /// Advance the connection state machine by one named event.
    pub async fn handle_stream_event(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Opened => {
                info!("Notification stream connected");
                self.state = ConnectionState::Connected;
                self.policy.reset();
                self.render();
            }
            StreamEvent::MessageReceived(payload) => self.on_message(&payload),
            StreamEvent::ErrorOccurred => {
                self.state = ConnectionState::Disconnected;
                self.handle = None;
                match self.policy.next_delay() {
                    Some(delay) => {
                        info!(
                            "Reconnecting in {}ms (attempt {}/{})",
                            delay.as_millis(),
                            self.policy.attempts(),
                            self.policy.max_attempts()
                        );
                        self.reconnect_at = Some(Instant::now() + delay);
                    }
                    None => {
                        // stay down until an external trigger; no timer may linger
                        self.reconnect_at = None;
                        warn!("Reconnect attempts exhausted; waiting for an external trigger");
                    }
                }
                self.render();
            }
            StreamEvent::VisibilityRestored => {
                if !self.state.is_connected() {
                    // async recursion through connect() needs one box
                    Box::pin(self.connect()).await;
                }
            }
        }
    }

    /// Mark one record read locally, then persist. A backend failure is
    /// logged but the local flag stays set — the next full history load
    /// re-syncs any divergence.
    pub async fn mark_as_read(&mut self, id: i64) {
        if !self.store.mark_read(id) {
            debug!("Mark-as-read for unknown notification id {}", id);
        }
        self.render();

        if let Err(e) = self.api.mark_read(id).await {
            error!("Error marking notification as read: {}", e);
        }
    }

    /// Mark everything read locally, then persist with a single call. Same
    /// no-rollback policy as [`mark_as_read`](Self::mark_as_read).
    pub async fn mark_all_as_read(&mut self) {
        self.store.mark_all_read();
        self.render();

        if let Err(e) = self.api.mark_all_read().await {
            error!("Error marking all notifications as read: {}", e);
        }
    }

    /// Delete the server-side history, then empty the local list. If the
    /// delete fails the local list is left untouched.
    pub async fn clear(&mut self) {
        match self.api.clear_all().await {
            Ok(()) => {
                self.store.clear();
                self.render();
            }
            Err(e) => error!("Error clearing notifications: {}", e),
        }
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    /// Run until the command channel closes or [`ClientCommand::Shutdown`]
    /// arrives: initial history load, first connect, then a single loop
    /// serializing transport events, the reconnect timer, and commands.
    pub async fn run(&mut self, mut commands: mpsc::Receiver<ClientCommand>) {
        self.load_history().await;
        self.connect().await;

        loop {
            match self.next_wakeup(&mut commands).await {
                Wakeup::Stream(event) => self.handle_stream_event(event).await,
                Wakeup::Command(ClientCommand::VisibilityRestored) => {
                    self.handle_stream_event(StreamEvent::VisibilityRestored)
                        .await
                }
                Wakeup::Command(ClientCommand::MarkAsRead(id)) => self.mark_as_read(id).await,
                Wakeup::Command(ClientCommand::MarkAllAsRead) => self.mark_all_as_read().await,
                Wakeup::Command(ClientCommand::ClearAll) => self.clear().await,
                Wakeup::Command(ClientCommand::Shutdown) | Wakeup::Closed => break,
                Wakeup::ReconnectDue => self.connect().await,
            }
        }

        info!("Notification client stopped");
    }

    async fn next_wakeup(&mut self, commands: &mut mpsc::Receiver<ClientCommand>) -> Wakeup {
        let reconnect_at = self.reconnect_at;
        tokio::select! {
            event = Self::transport_recv(&mut self.handle) => Wakeup::Stream(event),
            _ = async { tokio::time::sleep_until(reconnect_at.unwrap()).await },
                if reconnect_at.is_some() => Wakeup::ReconnectDue,
            command = commands.recv() => match command {
                Some(cmd) => Wakeup::Command(cmd),
                None => Wakeup::Closed,
            },
        }
    }

    /// Pends forever while no connection is open, so the select above only
    /// ever wakes for the timer or a command in that state.
    async fn transport_recv(handle: &mut Option<PushHandle>) -> StreamEvent {
        match handle {
            Some(h) => match h.recv().await {
                Some(TransportEvent::Message(payload)) => StreamEvent::MessageReceived(payload),
                Some(TransportEvent::Error(reason)) => {
                    warn!("Notification stream error: {}", reason);
                    StreamEvent::ErrorOccurred
                }
                None => StreamEvent::ErrorOccurred,
            },
            None => std::future::pending().await,
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn on_message(&mut self, payload: &str) {
        let msg: StreamMessage = match serde_json::from_str(payload) {
            Ok(msg) => msg,
            Err(e) => {
                // malformed payloads are dropped; the connection is unaffected
                error!("Error parsing stream message: {}", e);
                return;
            }
        };

        if msg.is_handshake() {
            debug!("Stream handshake acknowledged");
            return;
        }

        let Some(record) = msg.into_record() else {
            warn!("Dropping pushed notification without id_db");
            return;
        };

        if self.store.push_front(record.clone()) {
            if let Some(toast) = view::toast_view(&record) {
                self.renderer.render_toast(&toast);
                self.renderer.notification_cue();
            }
            self.render();
        } else {
            debug!("Duplicate notification id {} ignored", record.id);
        }
    }

    /// Synchronous re-render after every mutation; only the owning surface
    /// renders this state, so no batching window is needed.
    fn render(&mut self) {
        let view = view::history_view(self.store.records(), self.state, Utc::now());
        self.renderer.render_history(&view);
    }
}
