pub mod client_config;
pub mod connection;
pub mod notification;
pub mod stream_error;

pub use self::client_config::{AppConfig, ConfigError};
pub use self::connection::{ConnectionState, StreamEvent};
pub use self::notification::{NotificationKind, NotificationRecord, StreamMessage};
pub use self::stream_error::{StreamError, StreamResult};
