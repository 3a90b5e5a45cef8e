//! Remote session
//!
//! The remote is a stateful procedure-call service: a logon yields a session
//! id and the cluster that serves the organisation, and every later call
//! carries that session id. [`Session`] makes that lifecycle explicit with
//! `open`/`close` and a typed closed state; [`Transport`] is the seam to the
//! wire protocol.

mod session;
mod transport;
mod types;

pub use session::Session;
pub use transport::Transport;
pub use types::{AuthContext, Credentials, SessionState};
