//! Push-delivery value objects.
//!
//! - [`destination::Destination`] — where a message goes
//! - [`message::RelayMessage`] — the frame a listener receives

pub mod destination;
pub mod message;
