mod backend;
mod controller;
mod host;

pub use backend::{BackendCommand, BackendError, BackendEvent, BackendHandle, SimulatedBackend};
pub use controller::{InputOutcome, SessionController};
pub use host::{Host, NoticeLevel};

#[cfg(test)]
pub(crate) use host::testing;
