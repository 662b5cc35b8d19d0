//! Session state
//!
//! One user's isolated state for one interactive run: habit store, chat
//! transcript, vision board, and the premium flag. The free-plan limits are
//! enforced here, before anything mutates; the stores themselves know
//! nothing about plans.

use habitstore::{Habit, HabitStore, StoreError};
use thiserror::Error;
use tracing::{debug, info};

use crate::coach::Transcript;
use crate::config::LimitsConfig;
use crate::vision::{ImageSize, VisionBoard, VisionBoardItem};

/// Errors from free-plan policy checks
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("free plan allows at most {max} habits")]
    HabitLimitReached { max: usize },

    #[error("free plan allows at most {max} coach messages per session")]
    ChatLimitReached { max: usize },

    #[error("{feature} requires premium")]
    PremiumRequired { feature: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// True when upgrading to premium would lift this error
    pub fn is_plan_limit(&self) -> bool {
        matches!(
            self,
            SessionError::HabitLimitReached { .. }
                | SessionError::ChatLimitReached { .. }
                | SessionError::PremiumRequired { .. }
        )
    }
}

/// All state for one interactive run
///
/// Never shared and never global: each run constructs its own session and
/// everything dies with it.
pub struct Session {
    pub habits: HabitStore,
    pub transcript: Transcript,
    pub vision: VisionBoard,
    premium: bool,
    limits: LimitsConfig,
}

impl Session {
    /// Create a fresh free-plan session
    pub fn new(limits: LimitsConfig) -> Self {
        debug!(
            max_free_habits = limits.max_free_habits,
            max_free_chat_turns = limits.max_free_chat_turns,
            "Session::new: called"
        );
        Self {
            habits: HabitStore::new(),
            transcript: Transcript::new(),
            vision: VisionBoard::new(),
            premium: false,
            limits,
        }
    }

    pub fn premium(&self) -> bool {
        self.premium
    }

    /// Unlock unlimited habits, unlimited coach turns, and the vision board
    pub fn upgrade(&mut self) {
        info!("Session upgraded to premium");
        self.premium = true;
    }

    /// Create a habit, enforcing the free-plan habit cap first
    pub fn create_habit(&mut self, title: &str, streak_goal: Option<u32>) -> Result<Habit, SessionError> {
        self.check_habit_limit()?;
        Ok(self.habits.create(title, streak_goal)?)
    }

    /// Generate a vision board item; the board is premium-only
    pub fn generate_vision(&mut self, prompt: &str, size: ImageSize) -> Result<VisionBoardItem, SessionError> {
        if !self.premium {
            return Err(SessionError::PremiumRequired {
                feature: "vision board".to_string(),
            });
        }
        Ok(self.vision.generate(prompt, size))
    }

    /// Check whether the free plan allows another habit
    pub fn check_habit_limit(&self) -> Result<(), SessionError> {
        if !self.premium && self.habits.len() >= self.limits.max_free_habits {
            debug!(max = self.limits.max_free_habits, "Session: habit limit reached");
            return Err(SessionError::HabitLimitReached {
                max: self.limits.max_free_habits,
            });
        }
        Ok(())
    }

    /// Check whether the free plan allows another coach message
    ///
    /// Call before handing the prompt to the coach so a denied turn never
    /// touches the transcript.
    pub fn check_chat_limit(&self) -> Result<(), SessionError> {
        if !self.premium && self.transcript.user_turns() >= self.limits.max_free_chat_turns {
            debug!(max = self.limits.max_free_chat_turns, "Session: chat limit reached");
            return Err(SessionError::ChatLimitReached {
                max: self.limits.max_free_chat_turns,
            });
        }
        Ok(())
    }
}
