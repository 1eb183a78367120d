//! Schedule returned by the reasoning service

use serde::{Deserialize, Serialize};

/// New placement for one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: i64,
    pub timestamp: String,
}

impl ScheduledTask {
    pub fn new(id: i64, timestamp: impl Into<String>) -> Self {
        Self {
            id,
            timestamp: timestamp.into(),
        }
    }
}

/// Ordered placements, in the order the service returned them
///
/// Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReschedulingResult(pub Vec<ScheduledTask>);

impl ReschedulingResult {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledTask> {
        self.0.iter()
    }
}

impl From<Vec<ScheduledTask>> for ReschedulingResult {
    fn from(tasks: Vec<ScheduledTask>) -> Self {
        Self(tasks)
    }
}
