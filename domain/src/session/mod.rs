//! Inference session domain.
//!
//! - [`stream::StreamFragment`] — one piece of generated text
//! - [`delivery::DeliveryResult`] — terminal outcome of one run

pub mod delivery;
pub mod stream;
