//! REPL session management
//!
//! Owns the line editor loop and routes input: slash commands act on the
//! session directly, anything else becomes a coach turn streamed back to
//! the terminal.

use std::io::{self, Write};
use std::sync::Arc;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;

use habitstore::{Habit, today};

use crate::coach::{Coach, GREETING, suggest_habits};
use crate::config::Config;
use crate::llm::{LlmClient, StreamChunk};
use crate::prompts::PromptLoader;
use crate::repl::render;
use crate::session::{Session, SessionError};
use crate::vision::ImageSize;

/// Result of handling a slash command
enum SlashResult {
    /// Continue the REPL loop
    Continue,
    /// Exit the REPL
    Quit,
}

/// Interactive REPL session
pub struct ReplSession {
    session: Session,
    coach: Option<Coach>,
    fast_llm: Option<Arc<dyn LlmClient>>,
    prompts: PromptLoader,
    api_key_env: String,
}

impl ReplSession {
    /// Create a new REPL session
    ///
    /// Either client may be absent when no API key is set; the habit
    /// commands keep working and the coach paths print a hint instead.
    pub fn new(
        config: &Config,
        coach_llm: Option<Arc<dyn LlmClient>>,
        fast_llm: Option<Arc<dyn LlmClient>>,
    ) -> Self {
        let prompts = PromptLoader::new(".");
        let coach = coach_llm.map(|client| Coach::new(client, PromptLoader::new("."), config.llm.max_tokens));

        Self {
            session: Session::new(config.limits.clone()),
            coach,
            fast_llm,
            prompts,
            api_key_env: config.llm.api_key_env.clone(),
        }
    }

    /// Run the interactive loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new()?;

        loop {
            let readline = rl.readline(&self.prompt());

            match readline {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line);

                    if line.starts_with('/') {
                        match self.handle_slash_command(line).await {
                            SlashResult::Continue => {}
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.chat(line).await;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    break;
                }
            }
        }

        println!("{}", "Goodbye! Keep your streaks alive.".dimmed());
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Orbit - AI Habit Tracker".bright_cyan().bold());
        println!(
            "Plain text chats with your coach. Type {} for commands, {} to quit.",
            "/help".yellow(),
            "/quit".yellow()
        );
        if self.coach.is_none() {
            println!(
                "{} {} not set. The coach is offline, habit tracking still works.",
                "!".yellow(),
                self.api_key_env
            );
        }
        println!();
        println!("{} {}", "Orbit:".bright_blue(), GREETING);
        println!();
    }

    fn prompt(&self) -> String {
        if self.session.premium() {
            format!("{} ", "pro>".bright_yellow())
        } else {
            format!("{} ", ">".bright_green())
        }
    }

    async fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let command = parts.first().copied().unwrap_or("");
        let args = &parts[1..];

        match command {
            "/help" | "/h" => {
                print!("{}", render::help_view());
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => SlashResult::Quit,
            "/new" => {
                self.cmd_new(args);
                SlashResult::Continue
            }
            "/done" => {
                self.cmd_done(args);
                SlashResult::Continue
            }
            "/delete" => {
                self.cmd_delete(args);
                SlashResult::Continue
            }
            "/habits" => {
                self.print_habits();
                SlashResult::Continue
            }
            "/stats" => {
                print!("{}", render::stats_view(&self.session.habits.aggregate()));
                SlashResult::Continue
            }
            "/suggest" => {
                self.cmd_suggest(args).await;
                SlashResult::Continue
            }
            "/vision" => {
                self.cmd_vision(args);
                SlashResult::Continue
            }
            "/upgrade" => {
                self.cmd_upgrade();
                SlashResult::Continue
            }
            "/history" => {
                print!("{}", render::history_view(self.session.transcript.messages()));
                SlashResult::Continue
            }
            "/clear" => {
                self.session.transcript.reset();
                println!("{}", "Conversation cleared.".dimmed());
                SlashResult::Continue
            }
            _ => {
                println!("{}: {}", "Unknown command".red(), command);
                println!("Type {} to see available commands", "/help".yellow());
                SlashResult::Continue
            }
        }
    }

    /// Send a chat turn to the coach, streaming the reply as it generates
    async fn chat(&mut self, input: &str) {
        let Some(coach) = &self.coach else {
            self.print_coach_offline();
            return;
        };

        if let Err(e) = self.session.check_chat_limit() {
            self.print_session_error(e);
            return;
        }

        let habits = self.session.habits.aggregate();

        print!("{} ", "Orbit:".bright_blue());
        let _ = io::stdout().flush();

        let (tx, mut rx) = mpsc::channel::<StreamChunk>(100);
        let print_task = tokio::spawn(async move {
            while let Some(chunk) = rx.recv().await {
                match chunk {
                    StreamChunk::TextDelta(text) => {
                        print!("{}", text);
                        let _ = io::stdout().flush();
                    }
                    StreamChunk::MessageDone { .. } => {}
                    StreamChunk::Error(e) => {
                        eprintln!("\n{} {}", "Stream error:".red(), e);
                    }
                }
            }
        });

        let result = coach
            .ask_streaming(&mut self.session.transcript, input, habits, tx)
            .await;
        let _ = print_task.await;
        println!();

        if let Err(e) = result {
            eprintln!("{} {}", "Coach error:".red(), e);
        }
        println!();
    }

    fn cmd_new(&mut self, args: &[&str]) {
        if args.is_empty() {
            println!("Usage: /new <title> [@goal]   e.g. /new Read 10 pages @30");
            return;
        }

        let (title, goal) = parse_new_args(args);
        match self.session.create_habit(&title, goal) {
            Ok(habit) => {
                println!("{} Habit '{}' created!", "+".green(), habit.title);
                self.print_habits();
            }
            Err(e) => self.print_session_error(e),
        }
    }

    fn cmd_done(&mut self, args: &[&str]) {
        let Some(reference) = args.first() else {
            println!("Usage: /done <habit>");
            return;
        };

        let Some(habit) = self.resolve_habit(reference) else {
            return;
        };
        match self.session.habits.toggle_today(&habit.id) {
            Ok(updated) => {
                if updated.is_completed_on(today()) {
                    println!(
                        "{} '{}' done for today (streak {})",
                        "\u{2713}".green(),
                        updated.title,
                        updated.streak
                    );
                } else {
                    println!(
                        "{} '{}' unchecked for today (streak {})",
                        "\u{00B7}".dimmed(),
                        updated.title,
                        updated.streak
                    );
                }
                self.print_habits();
            }
            Err(e) => println!("{} {}", "!".yellow(), e),
        }
    }

    fn cmd_delete(&mut self, args: &[&str]) {
        let Some(reference) = args.first() else {
            println!("Usage: /delete <habit>");
            return;
        };

        let Some(habit) = self.resolve_habit(reference) else {
            return;
        };
        self.session.habits.delete(&habit.id);
        println!("{} Deleted '{}'", "-".red(), habit.title);
        self.print_habits();
    }

    async fn cmd_suggest(&mut self, args: &[&str]) {
        let Some(fast) = &self.fast_llm else {
            self.print_coach_offline();
            return;
        };

        let count = args.first().and_then(|s| s.parse().ok()).unwrap_or(3);
        println!("{}", "Asking for ideas...".dimmed());
        match suggest_habits(fast, &self.prompts, count).await {
            Ok(suggestions) if suggestions.is_empty() => {
                println!("{} The model returned no usable suggestions.", "!".yellow());
            }
            Ok(suggestions) => print!("{}", render::suggestions_view(&suggestions)),
            Err(e) => println!("{} {}", "Suggestion error:".red(), e),
        }
    }

    fn cmd_vision(&mut self, args: &[&str]) {
        if args.is_empty() {
            println!("Usage: /vision <prompt> [1K|2K|4K]");
            return;
        }

        let (prompt, size) = parse_vision_args(args);
        match self.session.generate_vision(&prompt, size) {
            Ok(item) => print!("{}", render::vision_view(&item)),
            Err(e) => self.print_session_error(e),
        }
    }

    fn cmd_upgrade(&mut self) {
        if self.session.premium() {
            println!("{}", "Already premium.".dimmed());
            return;
        }
        self.session.upgrade();
        println!("{}", "Upgraded to Pro!".green().bold());
        println!("Unlimited habits, unlimited coach chat, and the vision board are unlocked.");
    }

    /// Resolve a habit reference, printing the reason when nothing matches
    fn resolve_habit(&self, reference: &str) -> Option<Habit> {
        match self.session.habits.find(reference) {
            Ok(Some(habit)) => Some(habit.clone()),
            Ok(None) => {
                println!("{} No habit matches '{}'", "?".yellow(), reference);
                None
            }
            Err(candidates) => {
                println!("{} '{}' is ambiguous:", "?".yellow(), reference);
                for id in candidates {
                    println!("  {}", id);
                }
                None
            }
        }
    }

    fn print_habits(&self) {
        print!("{}", render::habits_view(self.session.habits.list(), today()));
    }

    fn print_session_error(&self, e: SessionError) {
        println!("{} {}", "!".yellow(), e);
        if e.is_plan_limit() {
            println!("Use {} to unlock premium for this session.", "/upgrade".yellow());
        }
    }

    fn print_coach_offline(&self) {
        println!(
            "{} The coach is offline. Set the {} environment variable and restart.",
            "!".yellow(),
            self.api_key_env
        );
    }
}

/// Split `/new` arguments into a title and an optional trailing `@goal`
fn parse_new_args(args: &[&str]) -> (String, Option<u32>) {
    if let Some((last, rest)) = args.split_last()
        && !rest.is_empty()
        && let Some(goal) = last.strip_prefix('@').and_then(|g| g.parse::<u32>().ok())
    {
        return (rest.join(" "), Some(goal));
    }
    (args.join(" "), None)
}

/// Split `/vision` arguments into a prompt and an optional trailing size
fn parse_vision_args(args: &[&str]) -> (String, ImageSize) {
    if let Some((last, rest)) = args.split_last()
        && !rest.is_empty()
        && let Ok(size) = last.parse::<ImageSize>()
    {
        return (rest.join(" "), size);
    }
    (args.join(" "), ImageSize::default())
}
