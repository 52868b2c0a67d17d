use crate::error::CommandError;

/// What a [`KitchenClient`](super::KitchenClient) call can fail with.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum KitchenError {
    /// The kitchen refused the command. The sender was also sent a `request_failed` event.
    #[error("Command rejected: {0}")]
    Rejected(#[from] CommandError),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
}
