//! Trait abstraction for form delivery to enable mocking in tests

use crate::state::FormValues;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Acknowledgement returned by a successful delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionReceipt {
    pub fn now() -> Self {
        Self {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
        }
    }
}

/// Destination for completed vendor forms
///
/// A delivery is a single attempt: success or failure, never partial.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Deliver the captured form values
    async fn deliver(&self, values: &FormValues) -> Result<SubmissionReceipt>;
}
