//! HabitStore - session-scoped habit tracking
//!
//! Keeps one user's habits in memory for the lifetime of a session: create,
//! toggle completion per calendar date, delete, and derive streak/completion
//! aggregates. Nothing persists; a new session starts empty.
//!
//! The streak counter is toggle-driven, not calendar-aware: marking a date
//! complete increments it, unmarking decrements it (never below zero). Two
//! completions a week apart therefore count as a streak of two.
//!
//! # Example
//!
//! ```ignore
//! use habitstore::HabitStore;
//!
//! let mut store = HabitStore::new();
//! let habit = store.create("Morning run", Some(30))?;
//! store.toggle_today(&habit.id)?;
//! for row in store.aggregate() {
//!     println!("{}: streak {}, {} completions", row.title, row.streak, row.completions);
//! }
//! ```

mod habit;
mod id;
mod store;

pub use habit::{Habit, HabitFrequency};
pub use id::generate_id;
pub use store::{HabitStore, HabitSummary, StoreError, today};
