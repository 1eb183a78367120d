//! Response adaptation
//!
//! Projects the service result onto `[{id, timestamp}]` and serializes it
//! compactly, in service order.

use tracing::{debug, info};

use crate::domain::{ReschedulingRequest, ReschedulingResult};
use crate::error::{RescheduleError, ServiceError};
use crate::validate;

/// Turns a schedule into the text written to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseAdapter {
    strict: bool,
}

impl ResponseAdapter {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Serialize `result`, checking it against `request` first in strict mode
    pub fn adapt(&self, request: &ReschedulingRequest, result: &ReschedulingResult) -> Result<String, RescheduleError> {
        debug!(strict = self.strict, entries = result.len(), "ResponseAdapter::adapt: called");
        if self.strict {
            validate::validate_schedule(request, result)?;
            info!("Schedule passed strict validation");
        }
        Self::serialize(result)
    }

    /// Compact JSON array, field order `id`, `timestamp`
    pub fn serialize(result: &ReschedulingResult) -> Result<String, RescheduleError> {
        serde_json::to_string(result).map_err(|e| ServiceError::Schema(e.to_string()).into())
    }
}
