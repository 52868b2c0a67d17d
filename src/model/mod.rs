//! Pure data structures: identifiers, the menu, orders and the dish state machine.

pub mod dish;
pub mod ids;
pub mod menu;
pub mod order;
pub mod role;

pub use dish::*;
pub use ids::*;
pub use menu::*;
pub use order::*;
pub use role::*;
