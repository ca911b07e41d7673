//! HostBridge: encoder, dispatcher, and typed facade over the transport.
//!
//! The bridge owns the correlation table and is the only component that
//! decodes inbound frames. Request-style sends register a waiter before
//! posting; the dispatcher delivers the response by id. Everything else is a
//! mechanical encode-and-send.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::channel::{
    Channel, OutboundEnvelope, Preference, PreferenceReply, ResolvedUrl, SocketFrame,
    REQUEST_ID_FIELD,
};
use crate::correlation::CorrelationTable;
use crate::diagnostic::{BridgeCounters, BridgeStats};
use crate::error::BridgeError;
use crate::transport::Transport;

/// Consumer of resolved-URL pushes from the host.
///
/// The resource loader issues its own URL requests (with its own ids) through
/// the bridge; the host answers them on the `getUrl` channel and the bridge
/// forwards each answer here.
pub trait ResourceLoader: Send + Sync {
    fn on_resolved_url_from_channel(&self, id: u64, content: &str);
}

/// Consumer of socket frames relayed by the host.
///
/// The relay is bound after construction because the logical socket object is
/// created lazily, once the surface actually opens a connection.
pub trait SocketRelay: Send + Sync {
    fn on_message_from_channel(&self, event: &str, message: &str);
}

#[derive(Debug, Serialize)]
struct SetPreferenceArgs<'a> {
    name: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct TelemetryBody<'a> {
    name: &'a str,
    data: u64,
    event: &'static str,
    /// Enum bound for enumerated histograms, absent for performance ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    bucket: Option<u32>,
}

/// The bridge between the sandboxed surface and its privileged host.
///
/// One instance per surface. All state (id counter, pending map, counters) is
/// owned here; nothing is ambient or global.
pub struct HostBridge<T: Transport> {
    transport: Arc<T>,
    pending: CorrelationTable,
    resource_loader: Arc<dyn ResourceLoader>,
    socket_relay: Mutex<Option<Arc<dyn SocketRelay>>>,
    counters: BridgeCounters,
}

impl<T: Transport> HostBridge<T> {
    /// Create a bridge over the given transport.
    pub fn new(transport: Arc<T>, resource_loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            transport,
            pending: CorrelationTable::new(),
            resource_loader,
            socket_relay: Mutex::new(None),
            counters: BridgeCounters::default(),
        }
    }

    /// Bind the socket relay. Frames arriving on the `websocket` channel
    /// before this is called are dropped with a warning.
    pub fn set_socket_relay(&self, relay: Arc<dyn SocketRelay>) {
        *self.socket_relay.lock() = Some(relay);
    }

    /// Whether the surface is running inside a privileged host. Always true
    /// for this bridge; the standalone fallback has no host to talk to.
    pub fn is_hosted_mode(&self) -> bool {
        true
    }

    /// Snapshot of the bridge's diagnostic counters.
    pub fn stats(&self) -> BridgeStats {
        self.counters.snapshot(self.pending.pending())
    }

    // ------------------------------------------------------------------
    // Encoder
    // ------------------------------------------------------------------

    /// Encode `{channel, args}` and hand it to the transport.
    fn post<A: Serialize>(&self, channel: Channel, args: &A) -> Result<(), BridgeError> {
        let encoded = serde_json::to_string(&OutboundEnvelope { channel, args })
            .map_err(BridgeError::Encode)?;
        self.transport.post(encoded);
        Ok(())
    }

    /// Fire-and-forget send. Registers no completion; there is no delivery
    /// confirmation.
    pub fn send_notification<A: Serialize>(
        &self,
        channel: Channel,
        args: &A,
    ) -> Result<(), BridgeError> {
        self.post(channel, args)
    }

    /// Request-style send: registers a waiter, merges the allocated id into
    /// `args` under the reserved `id` key, posts, and awaits the response.
    ///
    /// The response is only ever delivered through [`Self::on_message_from_channel`],
    /// so it is never observed synchronously with the send. Callers must rely
    /// on id correlation, never on arrival order.
    pub async fn send_request(
        &self,
        channel: Channel,
        mut args: serde_json::Map<String, Value>,
    ) -> Result<Value, BridgeError> {
        let (id, rx) = self.pending.register();
        args.insert(REQUEST_ID_FIELD.to_owned(), Value::from(id));
        self.post(channel, &args)?;
        rx.await.map_err(|_| BridgeError::ChannelClosed)
    }

    // ------------------------------------------------------------------
    // Inbound dispatcher
    // ------------------------------------------------------------------

    /// Route one inbound frame by its discriminator tag.
    ///
    /// Unknown tags and unmatched response ids are ignored (counted, never
    /// errors) so that a newer host can add channels without breaking older
    /// surfaces. A body that fails to decode for a recognized tag is a
    /// protocol fault and is returned to the caller.
    pub fn on_message_from_channel(&self, tag: &str, body: &str) -> Result<(), BridgeError> {
        let Some(channel) = Channel::from_tag(tag) else {
            self.counters.ignored_frames.fetch_add(1, Ordering::Relaxed);
            debug!(tag, "ignoring frame for unknown channel");
            return Ok(());
        };

        match channel {
            Channel::GetState => {
                let response: Value =
                    serde_json::from_str(body).map_err(|e| BridgeError::malformed(channel, e))?;
                let id = response
                    .get(REQUEST_ID_FIELD)
                    .and_then(Value::as_u64)
                    .ok_or(BridgeError::MissingRequestId { channel })?;
                if !self.pending.resolve(id, response) {
                    self.counters
                        .unmatched_responses
                        .fetch_add(1, Ordering::Relaxed);
                    debug!(id, "dropping response with no pending request");
                }
            }
            Channel::GetUrl => {
                let push: ResolvedUrl =
                    serde_json::from_str(body).map_err(|e| BridgeError::malformed(channel, e))?;
                self.resource_loader
                    .on_resolved_url_from_channel(push.id, &push.content);
            }
            Channel::WebSocket => {
                let frame: SocketFrame =
                    serde_json::from_str(body).map_err(|e| BridgeError::malformed(channel, e))?;
                let relay = self.socket_relay.lock().clone();
                match relay {
                    Some(relay) => relay.on_message_from_channel(&frame.event, &frame.message),
                    None => {
                        self.counters.ignored_frames.fetch_add(1, Ordering::Relaxed);
                        warn!("websocket frame arrived before a relay was bound");
                    }
                }
            }
            // Outbound-only channels; the host never sends frames here.
            Channel::SetState | Channel::Telemetry => {
                self.counters.ignored_frames.fetch_add(1, Ordering::Relaxed);
                debug!(tag, "ignoring inbound frame on outbound-only channel");
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Typed facade
    // ------------------------------------------------------------------

    /// Read one persisted preference from the host.
    pub async fn get_preference(&self, name: &str) -> Result<Preference, BridgeError> {
        let mut args = serde_json::Map::new();
        args.insert("name".to_owned(), Value::from(name));
        let response = self.send_request(Channel::GetState, args).await?;
        let reply: PreferenceReply = serde_json::from_value(response)
            .map_err(|e| BridgeError::malformed(Channel::GetState, e))?;
        Ok(reply.preferences)
    }

    /// Persist one preference on the host. No confirmation.
    pub fn set_preference(&self, name: &str, value: &str) -> Result<(), BridgeError> {
        self.send_notification(Channel::SetState, &SetPreferenceArgs { name, value })
    }

    /// Record a sample in an enumerated histogram.
    pub fn record_enumerated_histogram(
        &self,
        name: &str,
        value: u64,
        enum_size: u32,
    ) -> Result<(), BridgeError> {
        self.send_notification(
            Channel::Telemetry,
            &TelemetryBody {
                name,
                data: value,
                event: "enumerated",
                bucket: Some(enum_size),
            },
        )
    }

    /// Record a sample in a performance histogram.
    pub fn record_performance_histogram(&self, name: &str, value: u64) -> Result<(), BridgeError> {
        self.send_notification(
            Channel::Telemetry,
            &TelemetryBody {
                name,
                data: value,
                event: "performance",
                bucket: None,
            },
        )
    }
}
