//! Wallet-session notification events.

use serde::Deserialize;
use serde_json::Value;

use crate::SessionError;

/// Event type announcing network state changes.
pub const NETWORK_EVENT: &str = "network";

/// Event type announcing a new block.
pub const BLOCK_EVENT: &str = "block";

/// A notification of the form `{"event": kind, kind: body}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event type.
    pub kind: String,

    /// Event body, stored as the latest event of its type.
    pub body: Value,
}

impl Event {
    /// Splits a raw notification into its type and body.
    pub fn parse(raw: &Value) -> Result<Self, SessionError> {
        let kind = raw
            .get("event")
            .and_then(Value::as_str)
            .ok_or_else(|| SessionError::MalformedEvent("missing event type".to_owned()))?;
        let body = raw
            .get(kind)
            .cloned()
            .ok_or_else(|| SessionError::MalformedEvent(format!("missing {kind} body")))?;

        Ok(Self {
            kind: kind.to_owned(),
            body,
        })
    }
}

/// Body of a [`NETWORK_EVENT`].
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct NetworkEvent {
    #[serde(default)]
    pub(crate) login_required: bool,
}

/// Body of a [`BLOCK_EVENT`].
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct BlockEvent {
    pub(crate) block_height: u32,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_type_and_body() {
        let event = Event::parse(&json!({
            "event": "block",
            "block": {"block_height": 101, "block_hash": "00"},
        }))
        .unwrap();
        assert_eq!(event.kind, BLOCK_EVENT);
        assert_eq!(event.body["block_height"], 101);
    }

    #[test]
    fn rejects_missing_parts() {
        assert!(Event::parse(&json!({"block": {}})).is_err());
        assert!(Event::parse(&json!({"event": "block"})).is_err());
        assert!(Event::parse(&json!({"event": 3})).is_err());
    }
}
