//! Submission sinks for completed vendor forms

mod simulated;
mod traits;

pub use simulated::{SimulatedSink, DEFAULT_DELAY};
pub use traits::{SubmissionReceipt, SubmissionSink};

#[cfg(test)]
pub use traits::MockSubmissionSink;
