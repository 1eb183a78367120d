//! Placement rules sent to the reasoning service
//!
//! Nothing here is enforced locally. Rules are data: each kind knows its
//! strength and how to phrase itself, and a [`RuleVariant`] names one of the
//! rule sets the prompt has gone through. Individual kinds can be toggled on
//! top of a variant from config.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RulesConfig;
use crate::time::{Clock, ClockRange};

/// Whether the service must satisfy a rule or should merely prefer it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    Hard,
    Soft,
}

/// One placement rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    /// Stay between the day start and the configured day end
    DayWindow,
    /// Stay between the day start and midnight
    UntilMidnight,
    /// Every task keeps its full length
    KeepLength,
    /// No two tasks overlap
    NoOverlap,
    /// Keep clear of the blocked ranges
    AvoidBlocked,
    /// Locked tasks keep their prior timestamp
    KeepLocked,
    /// "Focused" early, "Tired" late
    MoodOrdering,
    /// Short breaks between tasks when there is slack
    Breaks,
}

impl RuleKind {
    /// Every kind in rendering order
    pub const ALL: [RuleKind; 8] = [
        RuleKind::DayWindow,
        RuleKind::UntilMidnight,
        RuleKind::KeepLength,
        RuleKind::NoOverlap,
        RuleKind::AvoidBlocked,
        RuleKind::KeepLocked,
        RuleKind::MoodOrdering,
        RuleKind::Breaks,
    ];

    pub fn strength(&self) -> Strength {
        match self {
            RuleKind::MoodOrdering | RuleKind::Breaks => Strength::Soft,
            _ => Strength::Hard,
        }
    }

    pub fn is_window(&self) -> bool {
        matches!(self, RuleKind::DayWindow | RuleKind::UntilMidnight)
    }

    /// Phrase the rule for the prompt, or `None` when it has nothing to say
    fn describe(&self, ctx: &RuleContext) -> Option<String> {
        match self {
            RuleKind::DayWindow | RuleKind::UntilMidnight => Some(format!(
                "Schedule every task within today, between {} and {}.",
                ctx.window.start, ctx.window.end
            )),
            RuleKind::KeepLength => Some("Each task must be scheduled for its full `length` in minutes.".to_string()),
            RuleKind::NoOverlap => Some("The tasks must not overlap.".to_string()),
            RuleKind::AvoidBlocked => ctx
                .has_blocked
                .then(|| "No task may start, end, or run inside any of the blocked time ranges listed above.".to_string()),
            RuleKind::KeepLocked => {
                Some("Tasks with `isLocked` set to true must keep their current `timestamp`.".to_string())
            }
            RuleKind::MoodOrdering => Some(
                "Tasks with mood \"Focused\" should be scheduled earlier in the day; \
                 tasks with mood \"Tired\" should be scheduled later in the day."
                    .to_string(),
            ),
            RuleKind::Breaks => Some("Try to place short breaks (5-10 minutes) between tasks if time allows.".to_string()),
        }
    }
}

/// The rule sets the prompt has gone through, oldest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RuleVariant {
    /// Fixed 09:00-18:00 window with mood ordering and breaks
    Base,
    /// Base plus blocked-range avoidance
    Blocked,
    /// Window runs from the current time until midnight
    CurrentTime,
    /// Current-time rules with mood left descriptive (no ordering rule)
    #[default]
    CurrentMood,
}

impl RuleVariant {
    pub fn kinds(&self) -> &'static [RuleKind] {
        debug!(?self, "RuleVariant::kinds: called");
        match self {
            RuleVariant::Base => &[
                RuleKind::DayWindow,
                RuleKind::KeepLength,
                RuleKind::NoOverlap,
                RuleKind::MoodOrdering,
                RuleKind::Breaks,
            ],
            RuleVariant::Blocked => &[
                RuleKind::DayWindow,
                RuleKind::KeepLength,
                RuleKind::NoOverlap,
                RuleKind::AvoidBlocked,
                RuleKind::MoodOrdering,
                RuleKind::Breaks,
            ],
            RuleVariant::CurrentTime => &[
                RuleKind::UntilMidnight,
                RuleKind::KeepLength,
                RuleKind::NoOverlap,
                RuleKind::AvoidBlocked,
                RuleKind::MoodOrdering,
                RuleKind::Breaks,
            ],
            RuleVariant::CurrentMood => &[
                RuleKind::UntilMidnight,
                RuleKind::KeepLength,
                RuleKind::NoOverlap,
                RuleKind::AvoidBlocked,
                RuleKind::Breaks,
            ],
        }
    }
}

/// Facts about the request that change how rules are phrased
#[derive(Debug, Clone, Copy)]
pub struct RuleContext {
    pub window: ClockRange,
    pub has_blocked: bool,
}

/// Rules rendered as prompt lines, split by strength
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedRules {
    pub hard: Vec<String>,
    pub soft: Vec<String>,
}

/// The active rules for one request, in rendering order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    kinds: Vec<RuleKind>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::from_variant(RuleVariant::default())
    }
}

impl RuleSet {
    pub fn from_variant(variant: RuleVariant) -> Self {
        Self::build(variant, &[], &[])
    }

    pub fn from_config(config: &RulesConfig) -> Self {
        debug!(?config, "RuleSet::from_config: called");
        Self::build(config.variant, &config.enable, &config.disable)
    }

    fn build(variant: RuleVariant, enable: &[RuleKind], disable: &[RuleKind]) -> Self {
        let base = variant.kinds();
        let kinds = RuleKind::ALL
            .iter()
            .copied()
            .filter(|kind| base.contains(kind) || enable.contains(kind))
            .filter(|kind| !disable.contains(kind))
            .collect();
        Self { kinds }
    }

    pub fn contains(&self, kind: RuleKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn kinds(&self) -> &[RuleKind] {
        &self.kinds
    }

    /// Effective placement window for a request made at `now`
    ///
    /// The lower bound is never earlier than the day start nor the current
    /// time. The upper bound is the day end under the day-window rule and
    /// midnight otherwise.
    pub fn window(&self, day_start: Clock, day_end: Clock, now: Clock) -> ClockRange {
        let start = day_start.max(now);
        let end = if self.contains(RuleKind::DayWindow) {
            day_end
        } else {
            Clock::END_OF_DAY
        };
        debug!(%start, %end, "RuleSet::window: computed");
        ClockRange::new(start, end)
    }

    /// Phrase every active rule; the two window rules collapse into one line
    pub fn render(&self, ctx: &RuleContext) -> RenderedRules {
        debug!(rule_count = self.kinds.len(), "RuleSet::render: called");
        let mut rendered = RenderedRules::default();
        let mut window_done = false;

        for kind in &self.kinds {
            if kind.is_window() {
                if window_done {
                    continue;
                }
                window_done = true;
            }

            let Some(line) = kind.describe(ctx) else {
                continue;
            };

            match kind.strength() {
                Strength::Hard => rendered.hard.push(line),
                Strength::Soft => rendered.soft.push(line),
            }
        }

        rendered
    }
}
