//! The session state shared between the notification thread and its readers.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use parking_lot::{Condvar, Mutex};
use serde_json::Value;
use tracing::{debug, error};

use crate::{
    event::{BlockEvent, NetworkEvent, BLOCK_EVENT, NETWORK_EVENT},
    Event, SessionError,
};

#[derive(Debug, Default)]
struct State {
    logged_in: bool,
    current_block_height: Option<u32>,
    latest_events: HashMap<String, Value>,
}

/// Wallet-session state plus a mailbox holding the latest event of each type.
///
/// Share it by reference (or in an `Arc`) between the thread delivering events and the threads
/// waiting on them.
#[derive(Debug, Default)]
pub struct Session {
    state: Mutex<State>,
    events: Condvar,
}

impl Session {
    /// A logged out session with no events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the session is logged in.
    pub fn logged_in(&self) -> bool {
        self.state.lock().logged_in
    }

    /// Records a successful login (or logout).
    pub fn set_logged_in(&self, logged_in: bool) {
        self.state.lock().logged_in = logged_in;
    }

    /// Height of the latest block announced by the wallet session.
    pub fn current_block_height(&self) -> Option<u32> {
        self.state.lock().current_block_height
    }

    /// The latest event body of type `kind`, if one has arrived.
    pub fn latest_event(&self, kind: &str) -> Option<Value> {
        self.state.lock().latest_events.get(kind).cloned()
    }

    /// Processes one notification and wakes everyone waiting for events.
    ///
    /// A `network` event requiring login clears the logged-in flag and a `block` event updates
    /// the block height. Malformed events change nothing.
    pub fn handle_event(&self, raw: &Value) -> Result<(), SessionError> {
        debug!(%raw, "received event");
        let event = Event::parse(raw).inspect_err(|e| error!(%e, "could not process event"))?;

        let network = if event.kind == NETWORK_EVENT {
            Some(Self::body::<NetworkEvent>(&event)?)
        } else {
            None
        };
        let block = if event.kind == BLOCK_EVENT {
            Some(Self::body::<BlockEvent>(&event)?)
        } else {
            None
        };

        let mut state = self.state.lock();
        if network.is_some_and(|n| n.login_required) {
            debug!("login required, logging out");
            state.logged_in = false;
        }
        if let Some(block) = block {
            state.current_block_height = Some(block.block_height);
            debug!(height = %block.block_height, "updated current block height");
        }
        state.latest_events.insert(event.kind, event.body);
        drop(state);

        self.events.notify_all();
        Ok(())
    }

    fn body<T: serde::de::DeserializeOwned>(event: &Event) -> Result<T, SessionError> {
        serde_json::from_value(event.body.clone()).map_err(|e| {
            error!(kind = %event.kind, %e, "could not process event");
            SessionError::MalformedEvent(format!("{} body: {e}", event.kind))
        })
    }

    /// Blocks until an event of type `kind` is available and returns its body.
    ///
    /// Returns immediately if one has already arrived. Fails with [`SessionError::Timeout`] once
    /// `timeout` has elapsed.
    pub fn wait_for_event(&self, kind: &str, timeout: Duration) -> Result<Value, SessionError> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        loop {
            if let Some(body) = state.latest_events.get(kind) {
                return Ok(body.clone());
            }
            if self.events.wait_until(&mut state, deadline).timed_out() {
                return state
                    .latest_events
                    .get(kind)
                    .cloned()
                    .ok_or_else(|| SessionError::Timeout {
                        kind: kind.to_owned(),
                        timeout,
                    });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use serde_json::json;

    use super::*;

    #[test]
    fn network_event_requiring_login_logs_out() {
        let session = Session::new();
        session.set_logged_in(true);

        session
            .handle_event(&json!({"event": "network", "network": {"connected": true}}))
            .unwrap();
        assert!(session.logged_in());

        session
            .handle_event(&json!({
                "event": "network",
                "network": {"connected": false, "login_required": true},
            }))
            .unwrap();
        assert!(!session.logged_in());
        assert_eq!(
            session.latest_event("network").unwrap()["login_required"],
            true
        );
    }

    #[test]
    fn block_event_updates_height() {
        let session = Session::new();
        assert_eq!(session.current_block_height(), None);

        session
            .handle_event(&json!({"event": "block", "block": {"block_height": 2_500_000}}))
            .unwrap();
        assert_eq!(session.current_block_height(), Some(2_500_000));
    }

    #[test]
    fn malformed_events_change_nothing() {
        let session = Session::new();
        assert!(matches!(
            session.handle_event(&json!({"event": "block", "block": {"height": 1}})),
            Err(SessionError::MalformedEvent(_))
        ));
        assert!(session.handle_event(&json!("block")).is_err());
        assert_eq!(session.current_block_height(), None);
        assert!(session.latest_event("block").is_none());
    }

    #[test]
    fn other_events_are_stored_verbatim() {
        let session = Session::new();
        let body = json!({"satoshi": {"btc": 1000}});
        session
            .handle_event(&json!({"event": "transaction", "transaction": body}))
            .unwrap();
        assert_eq!(session.latest_event("transaction"), Some(body));
    }

    #[test]
    fn waiter_wakes_on_event() {
        let session = Arc::new(Session::new());

        let waiter = {
            let session = Arc::clone(&session);
            thread::spawn(move || session.wait_for_event("tor", Duration::from_secs(10)))
        };

        thread::sleep(Duration::from_millis(50));
        session
            .handle_event(&json!({"event": "tor", "tor": {"progress": 100}}))
            .unwrap();

        let body = waiter.join().unwrap().unwrap();
        assert_eq!(body["progress"], 100);
    }

    #[test]
    fn wait_returns_stored_event_immediately() {
        let session = Session::new();
        session
            .handle_event(&json!({"event": "settings", "settings": {"altimeout": 5}}))
            .unwrap();
        assert_eq!(
            session
                .wait_for_event("settings", Duration::ZERO)
                .unwrap()["altimeout"],
            5
        );
    }

    #[test]
    fn wait_times_out() {
        let session = Session::new();
        assert!(matches!(
            session.wait_for_event("block", Duration::from_millis(20)),
            Err(SessionError::Timeout { .. })
        ));
    }
}
