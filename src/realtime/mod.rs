pub mod channel;
pub mod hub;
pub mod message;

pub use channel::{Channel, ChannelReceiver, DEFAULT_QUEUE_CAPACITY};
pub use hub::Hub;
pub use message::{events, Envelope, Inbound};
