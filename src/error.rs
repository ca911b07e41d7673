//! Error types for the webview bridge.

use std::fmt;

use crate::channel::Channel;

/// Errors surfaced by the bridge.
///
/// Unmatched response ids and unknown inbound tags are deliberately NOT
/// represented here: both are permissive no-ops on the wire (see the
/// dispatcher), observable only through [`crate::BridgeStats`].
#[derive(Debug)]
pub enum BridgeError {
    /// An inbound body on a recognized channel failed to decode as the shape
    /// that channel requires. This is a protocol fault (version or
    /// serialization mismatch) and is surfaced rather than dropped.
    MalformedBody {
        /// The channel whose body failed to decode.
        channel: Channel,
        /// The underlying decode failure.
        source: serde_json::Error,
    },
    /// A response body decoded as JSON but carried no usable correlation id.
    MissingRequestId {
        /// The response-style channel the frame arrived on.
        channel: Channel,
    },
    /// The outbound envelope could not be serialized.
    Encode(serde_json::Error),
    /// The bridge was torn down while a request was still pending.
    ChannelClosed,
}

impl BridgeError {
    pub(crate) fn malformed(channel: Channel, source: serde_json::Error) -> Self {
        BridgeError::MalformedBody { channel, source }
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::MalformedBody { channel, source } => {
                write!(f, "malformed body on channel {}: {}", channel.as_tag(), source)
            }
            BridgeError::MissingRequestId { channel } => {
                write!(
                    f,
                    "response on channel {} carried no correlation id",
                    channel.as_tag()
                )
            }
            BridgeError::Encode(source) => {
                write!(f, "failed to encode outbound envelope: {source}")
            }
            BridgeError::ChannelClosed => {
                write!(f, "bridge closed before the response arrived")
            }
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::MalformedBody { source, .. } | BridgeError::Encode(source) => Some(source),
            BridgeError::MissingRequestId { .. } | BridgeError::ChannelClosed => None,
        }
    }
}
