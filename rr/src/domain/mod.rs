//! Request-scoped data: tasks in, schedule out
//!
//! Everything here is built from one input payload, consumed by one run and
//! dropped afterwards.

mod input;
mod request;
mod schedule;
mod task;

pub use input::{BlockedSlot, RescheduleInput};
pub use request::ReschedulingRequest;
pub use schedule::{ReschedulingResult, ScheduledTask};
pub use task::{Mood, Task};
