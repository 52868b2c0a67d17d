//! # Kitchen Orchestrator
//!
//! > **The order-orchestration core of a restaurant kitchen.**
//!
//! Receptionists place orders, kitchen stations cook dishes, a chef reviews new orders and a
//! ranking display shows what the dining room likes. All of them are connections to one shared
//! kitchen, and this crate is the part that keeps that kitchen consistent.
//!
//! ## 🏗️ Design
//!
//! ### One owner, no locks
//! All kitchen state lives in a single [`Kitchen`](kitchen::Kitchen) value owned by the
//! [`KitchenActor`](runtime::KitchenActor) task. Requests are processed one at a time, so every
//! command, registration and snapshot sees the result of the one before it and nothing else.
//!
//! ### Validate, then mutate
//! Every command first runs through a [`Pipeline`](pipeline::Pipeline) of validators (payload
//! extraction, order lookup, dish lookup, menu lookup, station authorization). Only when the whole
//! chain passes does the kitchen change anything, so a refused command leaves no trace except a
//! `request_failed` event to its sender.
//!
//! ### Notifications are data
//! The kitchen core never writes to a socket. Operations return
//! [`Notification`](kitchen::Notification)s (recipients plus [`Event`](protocol::Event)) and the
//! actor dispatches them to each connection's outbox before taking the next request.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`]: ids, menu catalog, dish state machine, orders.
//! - [`scheduler`]: per-station priority queues (shortest dish first).
//! - [`ranking`]: delivered-minus-returned popularity board.
//! - [`protocol`]: inbound commands and outbound events as JSON.
//! - [`pipeline`]: the validator chain.
//! - [`kitchen`]: the core and its connection registry.
//! - [`runtime`]: actor, client and test mocks.
//! - [`lifecycle`]: [`KitchenSystem`](lifecycle::KitchenSystem) startup/shutdown and tracing.
//! - [`config`]: JSON configuration and the menu it carries.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! # Run the tests
//! cargo test
//! ```

pub mod config;
pub mod error;
pub mod kitchen;
pub mod lifecycle;
pub mod model;
pub mod pipeline;
pub mod protocol;
pub mod ranking;
pub mod runtime;
pub mod scheduler;
