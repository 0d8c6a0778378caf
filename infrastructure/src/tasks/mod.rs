//! Task submitter adapters

pub mod lambda;
