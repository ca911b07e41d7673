//! Wire types for the webview bridge protocol.
//!
//! Every message crossing the webview boundary is JSON text. Outbound messages
//! are a single envelope shape (`{"channel": ..., "args": {...}}`); inbound
//! frames arrive pre-split as a discriminator tag plus a JSON-encoded body
//! whose shape depends on the tag.

use serde::{Deserialize, Serialize};

/// Reserved key under which request-style sends carry their correlation id.
pub const REQUEST_ID_FIELD: &str = "id";

/// A logical sub-protocol multiplexed over the single webview transport.
///
/// The tag strings are the wire discriminators; anything outside this set is
/// ignored by the dispatcher so that newer hosts can add channels without
/// breaking older surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Preference read (request/response).
    #[serde(rename = "getState")]
    GetState,
    /// Preference write (notification).
    #[serde(rename = "setState")]
    SetState,
    /// Histogram recording (notification).
    #[serde(rename = "telemetry")]
    Telemetry,
    /// Resolved asset URLs pushed by the host (inbound only).
    #[serde(rename = "getUrl")]
    GetUrl,
    /// Socket frames relayed by the host (inbound only).
    #[serde(rename = "websocket")]
    WebSocket,
}

impl Channel {
    /// The wire discriminator for this channel.
    pub fn as_tag(self) -> &'static str {
        match self {
            Channel::GetState => "getState",
            Channel::SetState => "setState",
            Channel::Telemetry => "telemetry",
            Channel::GetUrl => "getUrl",
            Channel::WebSocket => "websocket",
        }
    }

    /// Parse a wire discriminator. Unknown tags return `None` and are the
    /// dispatcher's forward-compatible ignore path.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "getState" => Channel::GetState,
            "setState" => Channel::SetState,
            "telemetry" => Channel::Telemetry,
            "getUrl" => Channel::GetUrl,
            "websocket" => Channel::WebSocket,
            _ => return None,
        })
    }
}

/// Outbound envelope handed to the transport: `{"channel": ..., "args": {...}}`.
#[derive(Debug, Serialize)]
pub struct OutboundEnvelope<'a, A: Serialize> {
    /// Target channel tag.
    pub channel: Channel,
    /// Channel-specific arguments object.
    pub args: &'a A,
}

/// A single persisted preference, as the host stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub name: String,
    pub value: String,
}

/// Body of a `getState` response frame.
#[derive(Debug, Deserialize)]
pub struct PreferenceReply {
    /// Correlation id echoed from the request.
    pub id: u64,
    pub preferences: Preference,
}

/// Body of a `getUrl` push frame.
#[derive(Debug, Deserialize)]
pub struct ResolvedUrl {
    /// Id of the URL request the resource loader issued.
    pub id: u64,
    /// The resolved content.
    pub content: String,
}

/// Body of a `websocket` push frame.
#[derive(Debug, Deserialize)]
pub struct SocketFrame {
    /// Socket lifecycle event (`open`, `message`, `error`, `close`).
    pub event: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for channel in [
            Channel::GetState,
            Channel::SetState,
            Channel::Telemetry,
            Channel::GetUrl,
            Channel::WebSocket,
        ] {
            assert_eq!(Channel::from_tag(channel.as_tag()), Some(channel));
        }
    }

    #[test]
    fn unknown_tag_is_none() {
        assert_eq!(Channel::from_tag("colorTheme"), None);
        assert_eq!(Channel::from_tag(""), None);
    }

    #[test]
    fn envelope_serializes_with_wire_tag() {
        let mut args = serde_json::Map::new();
        args.insert("name".to_owned(), "uiTheme".into());
        let envelope = OutboundEnvelope {
            channel: Channel::GetState,
            args: &args,
        };
        let encoded = serde_json::to_string(&envelope).unwrap();
        assert_eq!(encoded, r#"{"channel":"getState","args":{"name":"uiTheme"}}"#);
    }
}
