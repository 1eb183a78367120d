//! Strict-mode checks on a returned schedule
//!
//! Only the hard rules that are active for the request are checked. Times are
//! compared as wall-clock minutes, the same way the prompt states them.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDateTime, Timelike};
use tracing::debug;

use crate::domain::{ReschedulingRequest, ReschedulingResult, Task};
use crate::error::{ValidationError, Violation};
use crate::rules::RuleKind;
use crate::time::parse_iso8601;

/// A placed task with a parsed start
struct Placement<'a> {
    task: &'a Task,
    start: NaiveDateTime,
}

impl Placement<'_> {
    fn length(&self) -> i64 {
        self.task.length.max(0)
    }

    /// None when the length runs past the representable calendar
    fn end(&self) -> Option<NaiveDateTime> {
        Duration::try_minutes(self.length()).and_then(|d| self.start.checked_add_signed(d))
    }

    fn start_minute(&self) -> i64 {
        i64::from(self.start.hour() * 60 + self.start.minute())
    }
}

/// Check `result` against `request`, returning every violation found
pub fn check_schedule(request: &ReschedulingRequest, result: &ReschedulingResult) -> Vec<Violation> {
    debug!(tasks = request.tasks.len(), entries = result.len(), "check_schedule: called");
    let mut violations = Vec::new();

    let tasks: HashMap<i64, &Task> = request.tasks.iter().rev().map(|t| (t.id, t)).collect();
    let mut seen = HashSet::new();
    let mut reported_duplicates = HashSet::new();
    let mut placements = Vec::new();

    for entry in result.iter() {
        let Some(task) = tasks.get(&entry.id) else {
            violations.push(Violation::UnknownTask(entry.id));
            continue;
        };
        if !seen.insert(entry.id) {
            if reported_duplicates.insert(entry.id) {
                violations.push(Violation::DuplicateTask(entry.id));
            }
            continue;
        }
        match parse_iso8601(&entry.timestamp) {
            Ok(start) => placements.push(Placement { task, start }),
            Err(_) => violations.push(Violation::BadTimestamp {
                id: entry.id,
                timestamp: entry.timestamp.clone(),
            }),
        }
    }

    let mut missing = HashSet::new();
    for task in &request.tasks {
        if !seen.contains(&task.id) && missing.insert(task.id) {
            violations.push(Violation::MissingTask(task.id));
        }
    }

    for placement in &placements {
        let length = placement.length();
        if !request.window.contains_span(placement.start_minute(), length) {
            violations.push(Violation::OutsideWindow {
                id: placement.task.id,
                window: request.window.to_string(),
            });
        }

        if request.rules.contains(RuleKind::AvoidBlocked) {
            for range in request.blocked.iter().filter(|r| !r.is_empty()) {
                if range.intersects_span(placement.start_minute(), length) {
                    violations.push(Violation::InBlockedRange {
                        id: placement.task.id,
                        range: range.to_string(),
                    });
                }
            }
        }

        if request.rules.contains(RuleKind::KeepLocked)
            && placement.task.is_locked == Some(true)
            && parse_iso8601(&placement.task.timestamp).ok() != Some(placement.start)
        {
            violations.push(Violation::MovedLockedTask(placement.task.id));
        }
    }

    if request.rules.contains(RuleKind::NoOverlap) {
        violations.extend(find_overlaps(&mut placements));
    }

    debug!(violations = violations.len(), "check_schedule: done");
    violations
}

/// Reject the schedule when any check fails
pub fn validate_schedule(request: &ReschedulingRequest, result: &ReschedulingResult) -> Result<(), ValidationError> {
    let violations = check_schedule(request, result);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError(violations))
    }
}

/// Sweep placements by start time, pairing each with the latest-ending earlier one
///
/// Placements without a representable end are already outside the window and
/// are left out of the sweep.
fn find_overlaps(placements: &mut [Placement<'_>]) -> Vec<Violation> {
    placements.sort_by_key(|p| (p.start, p.task.id));
    let mut overlaps = Vec::new();
    let mut latest: Option<(i64, NaiveDateTime)> = None;

    for placement in placements.iter() {
        let Some(end) = placement.end() else {
            debug!(id = placement.task.id, "find_overlaps: end out of range, skipped");
            continue;
        };
        match latest {
            Some((prev_id, prev_end)) => {
                if placement.start < prev_end {
                    overlaps.push(Violation::Overlap {
                        first: prev_id,
                        second: placement.task.id,
                    });
                }
                if end > prev_end {
                    latest = Some((placement.task.id, end));
                }
            }
            None => latest = Some((placement.task.id, end)),
        }
    }

    overlaps
}
