mod buffered_message;
mod delivery;

pub use buffered_message::{BufferedMessage, DeliveryMode, MessageId};
pub use delivery::{BackendState, DeliveryTag, InputSource};
