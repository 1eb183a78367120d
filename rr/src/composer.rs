//! Request Composer
//!
//! Turns the input payload into the instruction text sent to the reasoning
//! service. Pure and deterministic: the same input, time and rules always
//! render the same prompt. No network or disk access beyond reading an
//! optional template override.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::{RescheduleInput, ReschedulingRequest};
use crate::error::{FormatError, RescheduleError};
use crate::prompts::PromptLoader;
use crate::rules::{RuleContext, RuleSet};
use crate::time::{Clock, parse_iso8601, parse_time_range};

/// Name of the rescheduling prompt template
pub const TEMPLATE: &str = "reschedule";

/// Example date used when neither the input nor its tasks carry one
const FALLBACK_EXAMPLE_DATE: &str = "2025-06-11";

/// Values visible to the prompt template
#[derive(Debug, Serialize)]
struct PromptContext {
    current_mood: Option<String>,
    current_time: String,
    date: Option<String>,
    blocked_ranges: Vec<String>,
    has_locked: bool,
    has_completed: bool,
    hard_rules: Vec<String>,
    soft_rules: Vec<String>,
    tasks_json: String,
    example_timestamp: String,
}

/// Renders rescheduling requests
pub struct RequestComposer {
    loader: PromptLoader,
    rules: RuleSet,
    day_start: Clock,
    day_end: Clock,
}

impl RequestComposer {
    pub fn new(loader: PromptLoader, rules: RuleSet, day_start: Clock, day_end: Clock) -> Self {
        debug!(?rules, %day_start, %day_end, "RequestComposer::new: called");
        Self {
            loader,
            rules,
            day_start,
            day_end,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            PromptLoader::new(&config.prompts.dir),
            RuleSet::from_config(&config.rules),
            config.schedule.day_start,
            config.schedule.day_end,
        )
    }

    /// Compose the request for `input` as seen at `now`
    pub fn compose(&self, input: &RescheduleInput, now: Clock) -> Result<ReschedulingRequest, RescheduleError> {
        debug!(task_count = input.tasks.len(), %now, "RequestComposer::compose: called");

        let mut first_date = None;
        for task in &input.tasks {
            let prior = parse_iso8601(&task.timestamp)?;
            first_date.get_or_insert(prior.date());
        }

        let blocked = input
            .blocked_slots
            .iter()
            .map(|slot| parse_time_range(&slot.start, &slot.end))
            .collect::<Result<Vec<_>, _>>()?;
        for range in blocked.iter().filter(|r| r.is_empty()) {
            warn!(%range, "Blocked range ends before it starts; forwarding as given");
        }

        let date = match input.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| FormatError::new(raw, "expected an ISO-8601 date (YYYY-MM-DD)"))?;
                Some(raw.to_string())
            }
            None => None,
        };

        let window = self.rules.window(self.day_start, self.day_end, now);
        if window.is_empty() {
            warn!(%window, "Placement window is empty; the service will be asked anyway");
        }

        let rendered = self.rules.render(&RuleContext {
            window,
            has_blocked: !blocked.is_empty(),
        });

        let example_date = date
            .clone()
            .or_else(|| first_date.map(|d| d.format("%Y-%m-%d").to_string()))
            .unwrap_or_else(|| FALLBACK_EXAMPLE_DATE.to_string());

        let tasks_json = serde_json::to_string_pretty(&input.tasks)
            .map_err(|e| RescheduleError::Prompt(format!("Failed to serialize tasks: {}", e)))?;

        let current_mood = input.mood().map(str::to_string);
        let context = PromptContext {
            current_mood: current_mood.clone(),
            current_time: now.to_string(),
            date,
            blocked_ranges: blocked.iter().map(ToString::to_string).collect(),
            has_locked: input.tasks.iter().any(|t| t.is_locked.is_some()),
            has_completed: input.tasks.iter().any(|t| t.is_completed.is_some()),
            hard_rules: rendered.hard,
            soft_rules: rendered.soft,
            tasks_json,
            example_timestamp: format!("{}T{}:00", example_date, window.start),
        };

        let prompt = self
            .loader
            .render(TEMPLATE, &context)
            .map_err(|e| RescheduleError::Prompt(format!("{:#}", e)))?;

        info!(
            task_count = input.tasks.len(),
            blocked_count = blocked.len(),
            %window,
            "Composed rescheduling request"
        );

        Ok(ReschedulingRequest {
            tasks: input.tasks.clone(),
            current_time: now,
            blocked,
            current_mood,
            window,
            rules: self.rules.clone(),
            prompt,
        })
    }
}
