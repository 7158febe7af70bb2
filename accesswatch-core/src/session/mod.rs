//! Stream session control.
//!
//! A [`StreamSession`] owns one transport subscription per credential, the
//! recurring tick, and filter epochs. All aggregate mutation happens inside a
//! single driver task; callers and renderers only ever see published
//! snapshots through a [`ViewHandle`].

mod controller;
mod core;
mod credential;
mod driver;
mod guard;
mod publish;
mod state;

#[cfg(test)]
mod tests;

pub use controller::StreamSession;
pub use self::core::SessionCore;
pub use credential::Credential;
pub use publish::{ViewHandle, ViewsUpdated};
pub use state::{ConnectionState, DisconnectReason, SessionState};
