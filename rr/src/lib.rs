//! Rescheduler - single-shot task rescheduling delegated to an LLM
//!
//! One run takes today's tasks, the current time, blocked ranges and an
//! optional mood, and returns a new start time for every task.
//!
//! # Flow
//!
//! compose → invoke → adapt → emit, strictly in sequence:
//!
//! - [`composer`] - renders the instruction text and the task payload
//! - [`scheduler`] - asks the reasoning service for a schema-constrained schedule
//! - [`adapter`] - projects and serializes the result (optionally checked by [`validate`])
//! - [`pipeline`] - drives one run end to end
//!
//! # Supporting modules
//!
//! - [`rules`] - placement rules as data, grouped into variants
//! - [`time`] - clock values and ISO-8601 helpers
//! - [`llm`] - OpenAI and Anthropic clients
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod adapter;
pub mod cli;
pub mod composer;
pub mod config;
pub mod domain;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod rules;
pub mod scheduler;
pub mod time;
pub mod validate;

pub use adapter::ResponseAdapter;
pub use composer::RequestComposer;
pub use config::Config;
pub use domain::{RescheduleInput, ReschedulingRequest, ReschedulingResult, ScheduledTask, Task};
pub use error::{FormatError, InputError, RescheduleError, ServiceError, ValidationError};
pub use pipeline::Rescheduler;
pub use scheduler::{LlmScheduler, Scheduler};
pub use time::{Clock, simplify_time_range};
