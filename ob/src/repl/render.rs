//! Text rendering for the REPL
//!
//! Pure view builders: every function returns the String to print so the
//! layouts stay testable without a terminal.

use chrono::NaiveDate;
use colored::Colorize;
use habitstore::{Habit, HabitSummary};

use crate::coach::ChatMessage;
use crate::llm::Role;
use crate::vision::VisionBoardItem;

const BAR_WIDTH: usize = 24;

/// The habit list with today's completion marks
pub fn habits_view(habits: &[Habit], on: NaiveDate) -> String {
    if habits.is_empty() {
        return format!("{}\n", "No habits yet. Start small!".dimmed());
    }

    let mut out = String::new();
    out.push_str(&format!("{}\n", "Your habits:".bright_cyan()));
    for habit in habits {
        let mark = if habit.is_completed_on(on) {
            "\u{2713}".green()
        } else {
            "\u{00B7}".dimmed()
        };
        let goal = match habit.streak_goal {
            Some(goal) => format!("  goal {}", goal),
            None => String::new(),
        };
        out.push_str(&format!(
            "  {} {:<28} streak {:<4}{}  [{}]\n",
            mark,
            habit.title,
            habit.streak,
            goal,
            habit.id.dimmed()
        ));
    }
    out
}

/// The analytics view: streak bars plus completion shares
pub fn stats_view(rows: &[HabitSummary]) -> String {
    if rows.is_empty() {
        return format!("{}\n", "Add habits to see analytics.".dimmed());
    }

    let mut out = String::new();
    let max_streak = rows.iter().map(|r| r.streak).max().unwrap_or(0);

    out.push_str(&format!("{}\n", "Current streaks:".bright_cyan()));
    for row in rows {
        out.push_str(&format!(
            "  {:<28} {} {}\n",
            row.title,
            streak_bar(row.streak, max_streak, BAR_WIDTH).green(),
            row.streak
        ));
    }

    let total: usize = rows.iter().map(|r| r.completions).sum();
    out.push('\n');
    out.push_str(&format!("{}\n", "Completion share:".bright_cyan()));
    for row in rows {
        let share = if total == 0 { 0 } else { row.completions * 100 / total };
        out.push_str(&format!("  {:<28} {:>3}% ({})\n", row.title, share, row.completions));
    }
    out
}

/// Scale a streak onto a fixed-width bar relative to the largest streak
fn streak_bar(streak: u32, max_streak: u32, width: usize) -> String {
    if streak == 0 || max_streak == 0 {
        return String::new();
    }
    let len = ((streak as usize * width) / max_streak as usize).max(1);
    "\u{2588}".repeat(len)
}

/// Numbered habit suggestions
pub fn suggestions_view(suggestions: &[String]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Suggestions:".bright_cyan()));
    for (i, suggestion) in suggestions.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, suggestion));
    }
    out.push_str(&format!("Create one with {}\n", "/new <title>".yellow()));
    out
}

/// One generated vision board item
pub fn vision_view(item: &VisionBoardItem) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Vision generated! (Simulated for this demo)".green()));
    out.push_str(&format!("  prompt: {}\n", item.prompt));
    out.push_str(&format!("  size:   {}\n", item.size));
    out.push_str(&format!("  url:    {}\n", item.image_url));
    out
}

/// The conversation so far, one numbered line per turn
pub fn history_view(messages: &[ChatMessage]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Conversation:".bright_cyan()));
    for (i, msg) in messages.iter().enumerate() {
        let speaker = match msg.role {
            Role::User => "You".bright_green(),
            Role::Model => "Orbit".bright_blue(),
        };
        let preview: String = msg.text.chars().take(60).collect();
        let preview = if msg.text.chars().count() > 60 {
            format!("{}...", preview)
        } else {
            preview
        };
        out.push_str(&format!("  {}. {}: {}\n", i + 1, speaker, preview));
    }
    out
}

/// Help text for the slash commands
pub fn help_view() -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("{}\n", "Habit commands:".bright_cyan()));
    out.push_str(&format!(
        "  {:24} Create a habit (e.g. /new Read 10 pages @30)\n",
        "/new <title> [@goal]".yellow()
    ));
    out.push_str(&format!("  {:24} Toggle today's completion\n", "/done <habit>".yellow()));
    out.push_str(&format!("  {:24} Delete a habit\n", "/delete <habit>".yellow()));
    out.push_str(&format!("  {:24} List your habits\n", "/habits".yellow()));
    out.push_str(&format!("  {:24} Streaks and completion shares\n", "/stats".yellow()));
    out.push('\n');
    out.push_str(&format!("{}\n", "Coach commands:".bright_cyan()));
    out.push_str(&format!("  {:24} Ask the fast model for habit ideas\n", "/suggest [n]".yellow()));
    out.push_str(&format!(
        "  {:24} Generate a mock vision image (premium)\n",
        "/vision <prompt> [size]".yellow()
    ));
    out.push_str(&format!("  {:24} Unlock premium for this session\n", "/upgrade".yellow()));
    out.push_str(&format!("  {:24} Show the conversation\n", "/history".yellow()));
    out.push_str(&format!("  {:24} Reset the conversation\n", "/clear".yellow()));
    out.push('\n');
    out.push_str(&format!("  {:24} Show this help\n", "/help".yellow()));
    out.push_str(&format!("  {:24} Exit\n", "/quit".yellow()));
    out.push('\n');
    out.push_str("Anything else chats with the coach.\n");
    out
}
