//! # Logging
//!
//! Everything logs through `tracing` with structured fields (`order_id`, `instance_id`,
//! `station`, `connection_id`), so a single order can be followed through the log with a grep.
//!
//! ```bash
//! # Commands, registrations, deliveries
//! RUST_LOG=info cargo run
//!
//! # Adds queue movements, dispatch fan-out and validation failures
//! RUST_LOG=debug cargo run
//! ```
//!
//! Client calls open a span per request; the actor logs what it did with it:
//!
//! ```text
//! DEBUG execute{origin=ConnectionId(1) kind=new_order}: Sending request payload={"dishes":[7,7,3]}
//! INFO Order registered order_id=order_1 dishes=3 skipped=0
//! INFO Dish in preparation order_id=order_1 instance_id=dish_1 station=grill
//! ```
//!
//! Rejected commands log at `warn` on the actor side, with the error code in the message.

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
