//! Reasoning invocation
//!
//! The [`Scheduler`] trait is the capability boundary: hand it a composed
//! request, get back a schedule or a [`ServiceError`]. [`LlmScheduler`] is the
//! production implementation; tests substitute canned schedulers.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::{ReschedulingRequest, ReschedulingResult, ScheduledTask};
use crate::error::ServiceError;
use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, Message, ResponseSchema};

/// Fixed sampling temperature; rule-following beats variety here
pub const TEMPERATURE: f64 = 0.2;

/// Name of the structured-output schema
pub const SCHEMA_NAME: &str = "schedule";

/// Longest slice of off-schema text quoted back in an error
const EXCERPT_CHARS: usize = 200;

/// Anything that can turn a composed request into a schedule
#[async_trait]
pub trait Scheduler: Send + Sync {
    async fn schedule(&self, request: &ReschedulingRequest) -> Result<ReschedulingResult, ServiceError>;
}

/// Top-level structured payload; providers want an object, not a bare array
#[derive(Debug, Deserialize)]
struct ScheduleEnvelope {
    schedule: Vec<ScheduledTask>,
}

/// Schema the reasoning service must answer with
pub fn schedule_schema() -> ResponseSchema {
    ResponseSchema::new(
        SCHEMA_NAME,
        "The new schedule: exactly one entry per input task",
        serde_json::json!({
            "type": "object",
            "properties": {
                "schedule": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "description": "The task ID"
                            },
                            "timestamp": {
                                "type": "string",
                                "description": "New ISO 8601 start time, e.g. 2025-06-11T09:30:00"
                            }
                        },
                        "required": ["id", "timestamp"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["schedule"],
            "additionalProperties": false
        }),
    )
}

/// Scheduler backed by an LLM with schema-constrained output
pub struct LlmScheduler {
    client: Arc<dyn LlmClient>,
    max_tokens: u32,
}

impl LlmScheduler {
    pub fn new(client: Arc<dyn LlmClient>, max_tokens: u32) -> Self {
        debug!(provider = client.provider(), %max_tokens, "LlmScheduler::new: called");
        Self { client, max_tokens }
    }

    fn build_request(&self, request: &ReschedulingRequest) -> CompletionRequest {
        CompletionRequest {
            system_prompt: String::new(),
            messages: vec![Message::user(request.prompt.clone())],
            max_tokens: self.max_tokens,
            temperature: TEMPERATURE,
            response_schema: Some(schedule_schema()),
        }
    }

    /// Validate the structured payload against the schedule schema
    fn parse_response(response: CompletionResponse) -> Result<ReschedulingResult, ServiceError> {
        debug!(stop_reason = ?response.stop_reason, "LlmScheduler::parse_response: called");
        let value = match response.structured {
            Some(value) => value,
            None => {
                let text = response.content.unwrap_or_default();
                if text.trim().is_empty() {
                    return Err(ServiceError::EmptyResponse);
                }
                let excerpt: String = text.chars().take(EXCERPT_CHARS).collect();
                return Err(ServiceError::Schema(format!("expected a JSON object, got: {}", excerpt)));
            }
        };

        let envelope: ScheduleEnvelope =
            serde_json::from_value(value).map_err(|e| ServiceError::Schema(e.to_string()))?;
        Ok(ReschedulingResult(envelope.schedule))
    }
}

#[async_trait]
impl Scheduler for LlmScheduler {
    async fn schedule(&self, request: &ReschedulingRequest) -> Result<ReschedulingResult, ServiceError> {
        debug!(task_count = request.tasks.len(), "LlmScheduler::schedule: called");
        let completion = self.build_request(request);

        let response = self.client.complete(completion).await?;
        info!(
            provider = self.client.provider(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Reasoning service answered"
        );

        let result = Self::parse_response(response)?;
        info!(entries = result.len(), "Schedule passed schema validation");
        Ok(result)
    }
}
