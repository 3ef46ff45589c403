mod arbiter;
mod bypass;
mod store;

pub use arbiter::{Flush, FlushArbiter, PassReason, Route};
pub use bypass::is_command_bypass;
pub use store::{Direction, QueueStore};
