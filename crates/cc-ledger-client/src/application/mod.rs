//! Application layer: submission policy over the raw connection.

pub mod submission;

pub use submission::{SubmissionClient, SubmissionConfig};
