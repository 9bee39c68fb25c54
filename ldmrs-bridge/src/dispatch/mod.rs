//! Payload classification and dispatch

pub mod classifier;
pub mod dispatcher;

pub use classifier::{classify, Classification, UNKNOWN_LABEL};
pub use dispatcher::DataDispatcher;
