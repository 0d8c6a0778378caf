//! Push transport adapters

pub mod api_gateway;
