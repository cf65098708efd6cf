//! # `soft-signer-session`
//!
//! Explicit state for a wallet session driving the software signer: whether the session is
//! logged in, the current block height, and the latest event of each type the wallet session
//! has delivered.
//!
//! Events arrive through [`Session::handle_event`], typically from the wallet session's
//! notification callback thread. Other threads block on [`Session::wait_for_event`].
//!
//! This is a library-only crate: the `soft-signer` binary reads one request per invocation and
//! never holds a session open. Embedders that keep a live wallet session own a [`Session`] and
//! feed it from their callback.

mod errors;
pub mod event;
mod session;

pub use errors::SessionError;
pub use event::Event;
pub use session::Session;
