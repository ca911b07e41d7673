//! webview-bridge: message correlation and dispatch between a sandboxed
//! webview surface and its privileged host.
//!
//! The surface can only talk to its host through one asynchronous, ordered,
//! opaque channel. This crate multiplexes every logical sub-protocol over that
//! channel and gives callers request/response semantics where they need them.
//!
//! # Architecture
//!
//! ```text
//!              ┌──────────────────────────────────┐
//!              │            HostBridge            │
//!              ├──────────────────────────────────┤
//!              │  transport: Arc<T>               │
//!              │  pending: CorrelationTable       │
//!              │    (id -> oneshot::Sender)       │
//!              │  resource_loader / socket_relay  │
//!              └───────────────┬──────────────────┘
//!                              │
//!                on_message_from_channel(tag, body)
//!                              │
//!      ┌───────────────────────┼───────────────────────┐
//!      │                       │                       │
//!  getState?               getUrl?                websocket?
//!      │                       │                       │
//! ┌────▼─────────┐   ┌─────────▼─────────┐   ┌─────────▼────────┐
//! │ resolve id,  │   │ forward (id,      │   │ forward (event,  │
//! │ wake waiter  │   │ content) to       │   │ message) to      │
//! │              │   │ resource loader   │   │ socket relay     │
//! └──────────────┘   └───────────────────┘   └──────────────────┘
//! ```
//!
//! Frames with unrecognized tags are ignored so newer hosts can add channels
//! without breaking older surfaces; responses with no pending waiter are
//! dropped the same way. Both are counted in [`BridgeStats`].
//!
//! # Usage
//!
//! ```ignore
//! let bridge = Arc::new(HostBridge::new(transport, resource_loader));
//!
//! // Request/response: the reply arrives via the dispatcher, never
//! // synchronously with the send.
//! let theme = bridge.get_preference("uiTheme").await?;
//!
//! // Fire-and-forget.
//! bridge.set_preference("uiTheme", "dark")?;
//! bridge.record_performance_histogram("DevTools.Launch.Console", 500)?;
//!
//! // Host -> surface frames are fed in by the embedding layer.
//! bridge.on_message_from_channel(tag, body)?;
//! ```

mod channel;
mod correlation;
mod diagnostic;
mod error;
mod host;
mod transport;

pub use channel::{
    Channel, OutboundEnvelope, Preference, PreferenceReply, ResolvedUrl, SocketFrame,
    REQUEST_ID_FIELD,
};
pub use correlation::CorrelationTable;
pub use diagnostic::BridgeStats;
pub use error::BridgeError;
pub use host::{HostBridge, ResourceLoader, SocketRelay};
pub use transport::Transport;
