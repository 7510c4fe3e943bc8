use serde::{Deserialize, Serialize};

use crate::JobRecord;

/// Run totals, always recomputed from the full record list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub timestamp: String,
    pub total_jobs: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_attachments: usize,
    pub failed_urls: Vec<String>,
}

impl Summary {
    pub fn from_records(records: &[JobRecord], timestamp: impl Into<String>) -> Self {
        let successful = records.iter().filter(|r| r.success).count();
        let failed_urls: Vec<String> = records
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.url.clone())
            .collect();
        Self {
            timestamp: timestamp.into(),
            total_jobs: records.len(),
            successful,
            failed: failed_urls.len(),
            total_attachments: records.iter().map(|r| r.attachments.len()).sum(),
            failed_urls,
        }
    }
}
