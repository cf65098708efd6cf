use std::time::Duration;

use thiserror::Error;

/// Errors raised by the session event mailbox.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No event of the requested type arrived in time.
    #[error("timed out after {timeout:?} waiting for a {kind} event")]
    Timeout {
        /// The awaited event type.
        kind: String,
        /// How long we waited.
        timeout: Duration,
    },

    /// The event does not have the `{"event": type, type: body}` shape, or its body is invalid.
    #[error("malformed event: {0}")]
    MalformedEvent(String),
}
