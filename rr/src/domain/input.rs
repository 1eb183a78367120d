//! Input payload parsing

use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Task;
use crate::error::InputError;

/// A time range the new schedule must avoid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedSlot {
    pub start: String,
    pub end: String,
}

/// Everything a caller hands to one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleInput {
    pub tasks: Vec<Task>,

    #[serde(default)]
    pub blocked_slots: Vec<BlockedSlot>,

    #[serde(default)]
    pub current_mood: Option<String>,

    /// Day being rescheduled (`YYYY-MM-DD`), rendered as a hint only
    #[serde(default)]
    pub date: Option<String>,
}

impl RescheduleInput {
    /// Input made of tasks alone
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Default::default()
        }
    }

    /// Parse a JSON document
    ///
    /// An object must carry `tasks`; a bare array is taken as the task list.
    pub fn from_json(text: &str) -> Result<Self, InputError> {
        debug!(len = text.len(), "RescheduleInput::from_json: called");
        let value: serde_json::Value = serde_json::from_str(text).map_err(InputError::Syntax)?;

        match value {
            serde_json::Value::Array(_) => {
                debug!("RescheduleInput::from_json: bare task array");
                let tasks = serde_json::from_value(value).map_err(InputError::Payload)?;
                Ok(Self::from_tasks(tasks))
            }
            serde_json::Value::Object(_) => {
                debug!("RescheduleInput::from_json: object payload");
                serde_json::from_value(value).map_err(InputError::Payload)
            }
            serde_json::Value::Null => Err(InputError::UnexpectedShape("null")),
            serde_json::Value::Bool(_) => Err(InputError::UnexpectedShape("a boolean")),
            serde_json::Value::Number(_) => Err(InputError::UnexpectedShape("a number")),
            serde_json::Value::String(_) => Err(InputError::UnexpectedShape("a string")),
        }
    }

    /// Read the whole stream and parse it
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, InputError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::from_json(&text)
    }

    /// The current mood, if one was given and is not blank
    pub fn mood(&self) -> Option<&str> {
        self.current_mood.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_payload() {
        let json = r#"{
            "tasks":[{"id":1,"task":"Write report","mood":"Focused","timestamp":"2025-06-11T08:00:00","length":60}],
            "blockedSlots":[{"start":"2025-06-11T10:00:00","end":"2025-06-11T10:30:00"}],
            "currentMood":"Tired"
        }"#;
        let input = RescheduleInput::from_json(json).unwrap();

        assert_eq!(input.tasks.len(), 1);
        assert_eq!(input.blocked_slots.len(), 1);
        assert_eq!(input.blocked_slots[0].start, "2025-06-11T10:00:00");
        assert_eq!(input.mood(), Some("Tired"));
        assert!(input.date.is_none());
    }

    #[test]
    fn test_optional_fields_default() {
        let input = RescheduleInput::from_json(r#"{"tasks":[]}"#).unwrap();
        assert!(input.tasks.is_empty());
        assert!(input.blocked_slots.is_empty());
        assert!(input.mood().is_none());
    }

    #[test]
    fn test_blank_mood_is_none() {
        let input = RescheduleInput::from_json(r#"{"tasks":[],"currentMood":"   "}"#).unwrap();
        assert!(input.mood().is_none());
    }

    #[test]
    fn test_missing_tasks_is_input_error() {
        let err = RescheduleInput::from_json(r#"{"blockedSlots": []}"#).unwrap_err();
        assert!(matches!(err, InputError::Payload(_)));
        assert!(err.to_string().contains("tasks"));
    }

    #[test]
    fn test_invalid_json_is_input_error() {
        let err = RescheduleInput::from_json("{not json").unwrap_err();
        assert!(matches!(err, InputError::Syntax(_)));
    }

    #[test]
    fn test_bare_array_is_task_list() {
        let json = r#"[{"id":3,"task":"Read","mood":"Creative","timestamp":"2025-06-11T11:00:00","length":20}]"#;
        let input = RescheduleInput::from_json(json).unwrap();
        assert_eq!(input.tasks.len(), 1);
        assert_eq!(input.tasks[0].id, 3);
        assert!(input.blocked_slots.is_empty());
    }

    #[test]
    fn test_scalar_is_rejected() {
        let err = RescheduleInput::from_json("42").unwrap_err();
        assert!(matches!(err, InputError::UnexpectedShape("a number")));
    }

    #[test]
    fn test_from_reader() {
        let input = RescheduleInput::from_reader(r#"{"tasks":[]}"#.as_bytes()).unwrap();
        assert!(input.tasks.is_empty());
    }
}
