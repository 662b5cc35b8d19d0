//! Core HabitStore implementation

use chrono::{Local, NaiveDate};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::habit::Habit;

/// Errors returned by store operations
///
/// Every variant is recoverable and the store is never left partially
/// mutated: validation and lookup happen before any state changes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Title was empty after trimming
    #[error("habit title must not be empty")]
    EmptyTitle,

    /// A streak goal of zero is rejected
    #[error("streak goal must be at least 1")]
    ZeroGoal,

    /// No habit with the given id
    #[error("habit not found: {id}")]
    NotFound { id: String },
}

impl StoreError {
    /// True for input-validation failures (as opposed to lookup failures)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyTitle | Self::ZeroGoal)
    }
}

/// Aggregate row derived from one habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitSummary {
    /// Habit title
    pub title: String,
    /// Current streak value
    pub streak: u32,
    /// Total completions recorded
    pub completions: usize,
}

/// The local calendar date, the default toggle target
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// In-memory habit store for one session
///
/// Owns the habit list; creation order is preserved and is the order `list`
/// returns. Nothing persists beyond the process.
#[derive(Debug, Default)]
pub struct HabitStore {
    habits: Vec<Habit>,
}

impl HabitStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a habit from a title and optional streak goal
    ///
    /// The title is trimmed before validation and storage. Returns a
    /// snapshot of the new record.
    pub fn create(&mut self, title: &str, streak_goal: Option<u32>) -> Result<Habit, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        if streak_goal == Some(0) {
            return Err(StoreError::ZeroGoal);
        }

        let mut habit = Habit::new(title);
        if let Some(goal) = streak_goal {
            habit = habit.with_streak_goal(goal);
        }
        info!(id = habit.id, title = habit.title, "Created habit");
        self.habits.push(habit.clone());
        Ok(habit)
    }

    /// Flip completion of a habit for the given date
    ///
    /// Returns a snapshot of the updated record. Unknown ids leave the
    /// store untouched.
    pub fn toggle(&mut self, id: &str, date: NaiveDate) -> Result<Habit, StoreError> {
        let habit = self
            .habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        let completed = habit.toggle(date);
        debug!(id, %date, completed, streak = habit.streak, "Toggled habit");
        Ok(habit.clone())
    }

    /// Flip completion of a habit for the local calendar date
    pub fn toggle_today(&mut self, id: &str) -> Result<Habit, StoreError> {
        self.toggle(id, today())
    }

    /// Delete a habit by id
    ///
    /// Deleting an unknown id is a silent no-op.
    pub fn delete(&mut self, id: &str) {
        let before = self.habits.len();
        self.habits.retain(|h| h.id != id);
        if self.habits.len() < before {
            info!(id, "Deleted habit");
        }
    }

    /// All habits in creation order
    pub fn list(&self) -> &[Habit] {
        &self.habits
    }

    /// Look up a habit by exact id
    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    /// Derive the analytics rows, one summary per habit in creation order
    ///
    /// Computed fresh on every call; `completions` is the size of the
    /// completed-date set.
    pub fn aggregate(&self) -> Vec<HabitSummary> {
        self.habits
            .iter()
            .map(|h| HabitSummary {
                title: h.title.clone(),
                streak: h.streak,
                completions: h.completed_dates.len(),
            })
            .collect()
    }

    /// Number of habits
    pub fn len(&self) -> usize {
        self.habits.len()
    }

    /// True when no habits exist
    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// Resolve a partial reference to a habit
    ///
    /// Accepts an exact id, an id prefix, or a fragment of the slug.
    ///
    /// Returns:
    /// - Ok(Some(habit)) if exactly one match
    /// - Ok(None) if no matches
    /// - Err with candidate ids if ambiguous
    pub fn find(&self, reference: &str) -> Result<Option<&Habit>, Vec<String>> {
        let matches: Vec<&Habit> = self
            .habits
            .iter()
            .filter(|h| reference_matches(&h.id, reference))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.into_iter().next()),
            _ => Err(matches.into_iter().map(|h| h.id.clone()).collect()),
        }
    }
}

/// Check if an ID matches a reference
fn reference_matches(id: &str, reference: &str) -> bool {
    // Exact match
    if id == reference {
        return true;
    }

    // Hex prefix match (first 6 chars)
    if id.starts_with(reference) {
        return true;
    }

    // Slug contains match, case-insensitive on the reference side
    if let Some(slug_start) = id.find('-') {
        let slug_part = &id[slug_start + 1..];
        if slug_part.contains(&reference.to_lowercase()) {
            return true;
        }
    }

    false
}
