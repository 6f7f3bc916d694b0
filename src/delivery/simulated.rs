//! Placeholder sink that pretends to deliver after a fixed delay

use super::traits::{SubmissionReceipt, SubmissionSink};
use crate::state::FormValues;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Default simulated network latency
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Sink that waits `delay` and always succeeds; nothing leaves the process
#[derive(Debug, Clone)]
pub struct SimulatedSink {
    delay: Duration,
}

impl SimulatedSink {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedSink {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

#[async_trait]
impl SubmissionSink for SimulatedSink {
    async fn deliver(&self, values: &FormValues) -> Result<SubmissionReceipt> {
        tokio::time::sleep(self.delay).await;
        let receipt = SubmissionReceipt::now();
        tracing::info!(
            id = %receipt.id,
            legal_name = %values.legal_name,
            services = values.services.len(),
            "Vendor form delivered (simulated)"
        );
        Ok(receipt)
    }
}
