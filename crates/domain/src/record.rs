use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creation and last-modification instants of a persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTimestamps {
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

impl RecordTimestamps {
    /// Returns timestamps for a record created now.
    #[must_use]
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn touch(&mut self) {
        let now = Utc::now();
        // Clock skew between writers must not move updated_at before created_at.
        self.updated_at = now.max(self.created_at);
    }
}
