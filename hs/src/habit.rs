//! Habit record type
//!
//! A Habit is the unit of tracking: a titled routine whose completion is
//! toggled per calendar date. The streak counter moves with each toggle and
//! is deliberately not calendar-aware.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::id::generate_id;

/// How often a habit recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HabitFrequency {
    /// Checked off per calendar day
    #[default]
    Daily,
    /// Reserved for scheduling extensions; never produced by `create`
    Weekly,
}

impl std::fmt::Display for HabitFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
        }
    }
}

/// A tracked habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier, assigned at creation
    pub id: String,

    /// Human-readable title, trimmed, never empty
    pub title: String,

    /// Recurrence cadence
    pub frequency: HabitFrequency,

    /// Toggle-driven streak counter
    pub streak: u32,

    /// Calendar dates the habit was completed on (at most one entry per date)
    pub completed_dates: BTreeSet<NaiveDate>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Optional streak target, informational only
    pub streak_goal: Option<u32>,
}

impl Habit {
    /// Create a new Habit with a generated ID
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: generate_id(&title),
            title,
            frequency: HabitFrequency::Daily,
            streak: 0,
            completed_dates: BTreeSet::new(),
            created_at: Utc::now(),
            streak_goal: None,
        }
    }

    /// Create a Habit with a specific ID (for testing or import)
    pub fn with_id(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::new(title)
        }
    }

    /// Set the streak goal
    pub fn with_streak_goal(mut self, goal: u32) -> Self {
        self.streak_goal = Some(goal);
        self
    }

    /// Flip completion for a date, returning true if the date is now marked
    ///
    /// Adding a date increments the streak; removing one decrements it,
    /// saturating at zero. The counter tracks toggles, not consecutive
    /// calendar days.
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        if self.completed_dates.remove(&date) {
            self.streak = self.streak.saturating_sub(1);
            false
        } else {
            self.completed_dates.insert(date);
            self.streak += 1;
            true
        }
    }

    /// Check if the habit was completed on a date
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }

    /// Total number of completions recorded
    pub fn completion_count(&self) -> usize {
        self.completed_dates.len()
    }

    /// Check if the streak has reached the goal (false when no goal is set)
    pub fn goal_reached(&self) -> bool {
        self.streak_goal.is_some_and(|goal| self.streak >= goal)
    }
}
