//! Client side of the 3F dashboard's notification feature: a resilient SSE
//! push-stream client with bounded exponential-backoff reconnection, an
//! in-memory notification store reconciled against pushed events, a REST
//! client for the history/read/clear endpoints, and a pure view-model layer.
//!
//! State/logic and presentation are kept apart: [`manager`] owns the record
//! list and connection state machine, [`view`] turns them into renderable
//! data, and anything implementing [`view::Renderer`] can display them.

pub mod api;
pub mod backoff;
pub mod manager;
pub mod sse;
pub mod store;
pub mod token;
pub mod transport;
pub mod view;

pub use manager::{ClientCommand, NotificationStreamClient};
