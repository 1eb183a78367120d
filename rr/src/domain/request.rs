//! The composed unit sent to the reasoning service

use super::Task;
use crate::rules::RuleSet;
use crate::time::{Clock, ClockRange};

/// One fully composed rescheduling request
#[derive(Debug, Clone)]
pub struct ReschedulingRequest {
    /// Tasks exactly as received
    pub tasks: Vec<Task>,

    /// Time the request was made
    pub current_time: Clock,

    /// Blocked ranges reduced to time of day
    pub blocked: Vec<ClockRange>,

    pub current_mood: Option<String>,

    /// Effective placement window
    pub window: ClockRange,

    /// Active rules
    pub rules: RuleSet,

    /// Rendered instruction text
    pub prompt: String,
}
