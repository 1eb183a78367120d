//! Task type

use serde::{Deserialize, Serialize};

/// One unit of work to place on today's schedule
///
/// `id` uniqueness and a positive `length` are expected but not checked; the
/// values are forwarded to the reasoning service as given. `length` must be a
/// whole number of minutes and `timestamp` must be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,

    /// Display name
    #[serde(alias = "name", default)]
    pub task: String,

    /// Affective tag(s) attached to the task
    #[serde(default)]
    pub mood: Mood,

    /// Previously scheduled time (ISO-8601)
    pub timestamp: String,

    /// Minutes the task occupies
    pub length: i64,

    #[serde(rename = "isLocked", default, skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,

    #[serde(rename = "isCompleted", default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

/// A single mood tag or a list of them
///
/// Older clients send one string, the mobile client sends a list. Either form
/// is forwarded unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Mood {
    One(String),
    Many(Vec<String>),
}

impl Default for Mood {
    fn default() -> Self {
        Mood::One(String::new())
    }
}
