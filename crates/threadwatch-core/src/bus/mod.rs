//! Event bus — thread-created events flowing from the gateway to the relay loop.

pub mod queue;
pub mod types;
