//! Wire-level vocabulary shared with the transport: inbound commands and outbound events.

pub mod command;
pub mod event;

pub use command::*;
pub use event::*;
