//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod message_relay;
pub mod stream_coordinator;
