//! Error types for kitchen commands.

use crate::model::OrderId;
use thiserror::Error;

/// Why a command was refused.
///
/// Every variant is recoverable: the originating connection gets a `request_failed` event and the
/// kitchen state is left exactly as it was.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommandError {
    /// A required field is missing or has the wrong type.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// No order with this id exists.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The dish instance (or its menu definition) could not be resolved.
    #[error("Dish not found: {0}")]
    DishNotFound(String),

    /// A station worker tried to advance a dish cooked at another station.
    #[error("Station not authorized: {role} cannot handle dishes of station {station}")]
    StationNotAuthorized { role: String, station: String },

    /// The state machine rejects the requested event.
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

impl CommandError {
    /// Stable machine-readable tag carried by `request_failed` events.
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::MalformedRequest(_) => "malformed_request",
            CommandError::OrderNotFound(_) => "order_not_found",
            CommandError::DishNotFound(_) => "dish_not_found",
            CommandError::StationNotAuthorized { .. } => "station_not_authorized",
            CommandError::InvalidTransition(_) => "invalid_transition",
        }
    }
}
