//! Sink adapters.

pub mod projection_sink;
