//! One rescheduling run: compose, invoke, adapt
//!
//! Strictly sequential. Any failure ends the run and nothing is emitted.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::adapter::ResponseAdapter;
use crate::composer::RequestComposer;
use crate::config::Config;
use crate::domain::{RescheduleInput, ReschedulingRequest};
use crate::error::RescheduleError;
use crate::scheduler::Scheduler;
use crate::time::Clock;

/// Drives a single run against any [`Scheduler`]
pub struct Rescheduler {
    composer: RequestComposer,
    adapter: ResponseAdapter,
    current_time_file: Option<PathBuf>,
}

impl Rescheduler {
    pub fn new(composer: RequestComposer, adapter: ResponseAdapter) -> Self {
        Self {
            composer,
            adapter,
            current_time_file: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        debug!(strict = config.strict, "Rescheduler::from_config: called");
        Self::new(RequestComposer::from_config(config), ResponseAdapter::new(config.strict))
            .with_current_time_file(config.debug.current_time_file.clone())
    }

    /// Also write the current time of each run to `path`
    pub fn with_current_time_file(mut self, path: Option<PathBuf>) -> Self {
        self.current_time_file = path;
        self
    }

    /// Build the request without contacting the reasoning service
    pub fn compose(&self, input: &RescheduleInput, now: Clock) -> Result<ReschedulingRequest, RescheduleError> {
        debug!(%now, "Rescheduler::compose: called");
        self.record_current_time(now);
        self.composer.compose(input, now)
    }

    /// Compose, invoke `scheduler` once, and return the serialized schedule
    pub async fn run<S>(&self, scheduler: &S, input: &RescheduleInput, now: Clock) -> Result<String, RescheduleError>
    where
        S: Scheduler + ?Sized,
    {
        debug!(task_count = input.tasks.len(), %now, "Rescheduler::run: called");
        let request = self.compose(input, now)?;

        let result = scheduler.schedule(&request).await?;
        let output = self.adapter.adapt(&request, &result)?;
        info!(entries = result.len(), "Rescheduling run finished");
        Ok(output)
    }

    /// Best-effort diagnostic write; never affects the run
    fn record_current_time(&self, now: Clock) {
        let Some(path) = &self.current_time_file else {
            return;
        };
        match fs::write(path, now.to_string()) {
            Ok(()) => debug!(path = %path.display(), "record_current_time: written"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to write current time file"),
        }
    }
}
