//! Gator - a self-care companion that grows with you
//!
//! CLI entry point with global panic handler.

use std::error::Error;
use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gator::app::AppStore;
use gator::clock::SystemClock;
use gator::config::{gator_home, Config};
use gator::error::exit_codes;
use gator::storage::FileStateStore;

// =============================================================================
// CLI Definition
// =============================================================================

/// Gator - a self-care companion that grows with you
#[derive(Parser)]
#[command(name = "gator")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the gator, today's progress and the streak
    Status {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show the level table and unlocks
    Levels {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// List, complete, toggle or add habits
    Habits {
        /// Action to perform
        #[command(subcommand)]
        action: HabitsCmd,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },

    /// Log today's mood (1-5)
    Mood {
        /// Mood from 1 (very low) to 5 (great)
        level: u8,
        /// Optional note
        #[arg(long, short)]
        note: Option<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Write, edit, delete or list journal entries
    Journal {
        /// Action to perform
        #[command(subcommand)]
        action: JournalCmd,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },

    /// Change the gator's accessory, environment or name
    Customize {
        /// What to change
        #[command(subcommand)]
        action: CustomizeCmd,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },

    /// Check the streak (resets it after a missed day)
    Streak {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },
}

#[derive(Subcommand)]
enum HabitsCmd {
    /// List habits with today's completion state
    List {
        /// Include inactive habits
        #[arg(long, short)]
        all: bool,
    },
    /// Mark a habit done for today
    Complete {
        /// Habit ID
        habit_id: String,
    },
    /// Turn a habit on or off
    Toggle {
        /// Habit ID
        habit_id: String,
    },
    /// Add a custom habit
    Add {
        /// Habit name
        name: String,
        /// Icon shown next to the name
        #[arg(long, default_value = "⭐")]
        icon: String,
        /// Category (hydration, movement, mindfulness, social, rest, creativity)
        #[arg(long, default_value = "mindfulness")]
        category: String,
        /// Experience awarded per completion
        #[arg(long, default_value_t = 10)]
        reward: u32,
    },
}

#[derive(Subcommand)]
enum JournalCmd {
    /// Write a new entry
    Add {
        /// Entry text
        content: String,
        /// Prompt the entry answers
        #[arg(long)]
        prompt: Option<String>,
        /// Mood from 1 to 5
        #[arg(long)]
        mood: Option<u8>,
    },
    /// Replace an entry's text
    Edit {
        /// Entry ID
        entry_id: String,
        /// New text
        content: String,
    },
    /// Delete an entry
    Delete {
        /// Entry ID
        entry_id: String,
    },
    /// List recent entries
    List {
        /// Maximum number of entries
        #[arg(long, short, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum CustomizeCmd {
    /// Wear an unlocked accessory
    Accessory {
        /// Accessory ID (e.g. bow, hat)
        id: String,
    },
    /// Move to an unlocked environment
    Environment {
        /// Environment ID (e.g. pond, garden)
        id: String,
    },
    /// Rename the gator
    Name {
        /// New name
        name: String,
    },
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();
    init_tracing();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("gator error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Set up the global panic handler.
///
/// On panic, logs to ~/.gator/crash.log and exits with code 3.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("gator panic: {}", info);

        if let Some(home) = gator_home() {
            let crash_log = home.join("crash.log");
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

/// Log to stderr, filtered by `GATOR_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("GATOR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status { json, quiet } => run_status(json, quiet),
        Commands::Levels { json, quiet } => run_levels(json, quiet),
        Commands::Habits {
            action,
            json,
            quiet,
        } => run_habits(action, json, quiet),
        Commands::Mood {
            level,
            note,
            json,
            quiet,
        } => run_mood(level, note, json, quiet),
        Commands::Journal {
            action,
            json,
            quiet,
        } => run_journal(action, json, quiet),
        Commands::Customize {
            action,
            json,
            quiet,
        } => run_customize(action, json, quiet),
        Commands::Streak { json, quiet } => run_streak(json, quiet),
    }
}

// =============================================================================
// Command Handlers
// =============================================================================

fn open_app() -> Result<AppStore<FileStateStore, SystemClock>, Box<dyn Error>> {
    let config = Config::load();
    let store = FileStateStore::from_config(&config)?;
    Ok(AppStore::open(store, SystemClock, config))
}

fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::OK as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}

fn print_formatted(formatted: &str) {
    if !formatted.is_empty() {
        println!("{}", formatted);
    }
}

fn run_status(json: bool, quiet: bool) -> Result<ExitCode, Box<dyn Error>> {
    use gator::cli::status::{StatusCommand, StatusOptions};

    let mut cmd = StatusCommand::new(open_app()?);
    let options = StatusOptions { json, quiet };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_levels(json: bool, quiet: bool) -> Result<ExitCode, Box<dyn Error>> {
    use gator::cli::levels::{LevelsCommand, LevelsOptions};

    let cmd = LevelsCommand::new(open_app()?);
    let options = LevelsOptions { json, quiet };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_habits(action: HabitsCmd, json: bool, quiet: bool) -> Result<ExitCode, Box<dyn Error>> {
    use gator::cli::habits::{HabitsAction, HabitsCommand, HabitsOptions};

    let mut options = HabitsOptions {
        json,
        quiet,
        all: false,
    };
    let action = match action {
        HabitsCmd::List { all } => {
            options.all = all;
            HabitsAction::List
        }
        HabitsCmd::Complete { habit_id } => HabitsAction::Complete { habit_id },
        HabitsCmd::Toggle { habit_id } => HabitsAction::Toggle { habit_id },
        HabitsCmd::Add {
            name,
            icon,
            category,
            reward,
        } => HabitsAction::Add {
            name,
            icon,
            category: category.parse()?,
            reward,
        },
    };

    let mut cmd = HabitsCommand::new(open_app()?);
    let output = cmd.run(action, &options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_mood(
    level: u8,
    note: Option<String>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn Error>> {
    use gator::cli::mood::{MoodCommand, MoodOptions};

    let mut cmd = MoodCommand::new(open_app()?);
    let options = MoodOptions { json, quiet };

    let output = cmd.run(level, note, &options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_journal(action: JournalCmd, json: bool, quiet: bool) -> Result<ExitCode, Box<dyn Error>> {
    use gator::cli::journal::{JournalAction, JournalCommand, JournalOptions};

    let action = match action {
        JournalCmd::Add {
            content,
            prompt,
            mood,
        } => JournalAction::Add {
            content,
            prompt,
            mood,
        },
        JournalCmd::Edit { entry_id, content } => JournalAction::Edit { entry_id, content },
        JournalCmd::Delete { entry_id } => JournalAction::Delete { entry_id },
        JournalCmd::List { limit } => JournalAction::List { limit },
    };

    let mut cmd = JournalCommand::new(open_app()?);
    let options = JournalOptions { json, quiet };

    let output = cmd.run(action, &options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_customize(action: CustomizeCmd, json: bool, quiet: bool) -> Result<ExitCode, Box<dyn Error>> {
    use gator::cli::customize::{CustomizeAction, CustomizeCommand, CustomizeOptions};

    let action = match action {
        CustomizeCmd::Accessory { id } => CustomizeAction::Accessory(id),
        CustomizeCmd::Environment { id } => CustomizeAction::Environment(id),
        CustomizeCmd::Name { name } => CustomizeAction::Name(name),
    };

    let mut cmd = CustomizeCommand::new(open_app()?);
    let options = CustomizeOptions { json, quiet };

    let output = cmd.run(action, &options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_streak(json: bool, quiet: bool) -> Result<ExitCode, Box<dyn Error>> {
    use gator::cli::streak::{StreakCommand, StreakOptions};

    let mut cmd = StreakCommand::new(open_app()?);
    let options = StreakOptions { json, quiet };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_codes::OK, 0);
        assert_eq!(exit_codes::ERROR, 1);
        assert_eq!(exit_codes::CRASH, 3);
    }

    #[test]
    fn test_success_to_exit_code() {
        assert_eq!(success_to_exit_code(true), ExitCode::from(0));
        assert_eq!(success_to_exit_code(false), ExitCode::from(1));
    }

    #[test]
    fn test_cli_parse_status_json() {
        let cli = Cli::parse_from(["gator", "status", "--json"]);
        match cli.command {
            Commands::Status { json, quiet } => {
                assert!(json);
                assert!(!quiet);
            }
            _ => panic!("Expected Status command"),
        }
    }

    #[test]
    fn test_cli_parse_habits_complete() {
        let cli = Cli::parse_from(["gator", "habits", "complete", "default-0", "-q"]);
        match cli.command {
            Commands::Habits { action, quiet, .. } => {
                assert!(quiet);
                match action {
                    HabitsCmd::Complete { habit_id } => assert_eq!(habit_id, "default-0"),
                    _ => panic!("Expected Complete action"),
                }
            }
            _ => panic!("Expected Habits command"),
        }
    }

    #[test]
    fn test_cli_parse_habits_add_defaults() {
        let cli = Cli::parse_from(["gator", "habits", "add", "Floss"]);
        match cli.command {
            Commands::Habits {
                action:
                    HabitsCmd::Add {
                        name,
                        category,
                        reward,
                        ..
                    },
                ..
            } => {
                assert_eq!(name, "Floss");
                assert_eq!(category, "mindfulness");
                assert_eq!(reward, 10);
            }
            _ => panic!("Expected Habits add"),
        }
    }

    #[test]
    fn test_cli_parse_mood() {
        let cli = Cli::parse_from(["gator", "mood", "4", "--note", "sunny"]);
        match cli.command {
            Commands::Mood { level, note, .. } => {
                assert_eq!(level, 4);
                assert_eq!(note.as_deref(), Some("sunny"));
            }
            _ => panic!("Expected Mood command"),
        }
    }

    #[test]
    fn test_cli_parse_journal_list() {
        let cli = Cli::parse_from(["gator", "journal", "list", "--limit", "3"]);
        match cli.command {
            Commands::Journal {
                action: JournalCmd::List { limit },
                ..
            } => assert_eq!(limit, 3),
            _ => panic!("Expected Journal list"),
        }
    }

    #[test]
    fn test_cli_parse_customize() {
        let cli = Cli::parse_from(["gator", "customize", "environment", "garden"]);
        match cli.command {
            Commands::Customize {
                action: CustomizeCmd::Environment { id },
                ..
            } => assert_eq!(id, "garden"),
            _ => panic!("Expected Customize environment"),
        }
    }
}
