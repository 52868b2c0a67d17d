//! Startup, shutdown and observability.
//!
//! - [`KitchenSystem`] wires configuration, menu and the kitchen actor together.
//! - [`setup_tracing`] installs the log subscriber.

pub mod kitchen_system;
pub mod tracing;

pub use self::kitchen_system::{KitchenSystem, SystemError};
pub use self::tracing::setup_tracing;
