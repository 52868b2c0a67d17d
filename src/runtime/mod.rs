//! Actor runtime around the kitchen core.
//!
//! - [`KitchenActor`] owns the [`Kitchen`](crate::kitchen::Kitchen) and processes
//!   [`KitchenRequest`]s sequentially.
//! - [`KitchenClient`] is the typed, cloneable handle everyone else uses.
//! - [`mock`] lets client-side code be tested without an actor.

pub mod actor;
pub mod client;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::KitchenActor;
pub use client::{KitchenClient, Session};
pub use error::KitchenError;
pub use message::{KitchenRequest, Response};
