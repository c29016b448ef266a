//! Line-oriented presentation layer over a [`Store`].
//!
//! Commands address tasks by their 1-based position in the full list, as
//! printed by `list all`. Parsing and rendering are pure; [`execute`] only
//! dispatches synchronous actions and hands the deferred load and the
//! clear-all confirmation back to the caller.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};

use crate::models::{LoadStatus, RootState, Task};
use crate::settings::SettingsAction;
use crate::store::Store;
use crate::tasks::TaskAction;

pub const CLEAR_ALL_PROMPT: &str =
    "Are you sure you want to delete all tasks? This action cannot be undone. [y/N]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum View {
    All,
    #[default]
    Active,
    Completed,
}

/// One shell line. The first word names the command.
#[derive(Parser, Debug)]
#[command(name = "tasklist", multicall = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a task
    ///
    /// Example: add Buy milk
    Add {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Mark task n done / not done
    #[command(alias = "done")]
    Toggle {
        #[arg(value_parser = parse_position)]
        position: usize,
    },
    /// Change the text of an active task
    ///
    /// Example: edit 2 Buy oat milk
    Edit {
        #[arg(value_parser = parse_position)]
        position: usize,
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Delete task n
    #[command(name = "rm", alias = "remove")]
    Remove {
        #[arg(value_parser = parse_position)]
        position: usize,
    },
    /// Delete every completed task
    ClearCompleted,
    /// Delete every task (asks first)
    ClearAll,
    /// Toggle dark mode
    #[command(name = "dark")]
    ToggleDarkMode,
    /// Replace the list with sample tasks
    Load,
    /// Show tasks
    #[command(alias = "ls")]
    List {
        #[arg(value_enum, default_value_t = View::Active)]
        view: View,
    },
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

fn parse_position(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(position) if position > 0 => Ok(position),
        _ => Err("expected a task number starting at 1".to_string()),
    }
}

/// Parses one input line. `help` and usage errors come back as `clap::Error`,
/// whose display is the text to show.
pub fn parse_command(line: &str) -> Result<Command, clap::Error> {
    ShellLine::try_parse_from(line.split_whitespace()).map(|parsed| parsed.command)
}

pub fn help_text() -> String {
    ShellLine::command().render_help().to_string()
}

/// Task at 1-based `position` in the full list.
pub fn task_at(state: &RootState, position: usize) -> Option<&Task> {
    position
        .checked_sub(1)
        .and_then(|index| state.tasks.items.get(index))
}

/// What the caller should do after [`execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Render(View),
    Message(String),
    /// Ask [`CLEAR_ALL_PROMPT`] and dispatch `TaskAction::ClearAll` on yes.
    ConfirmClearAll,
    StartLoad,
    Quit,
}

pub fn execute(store: &Store, command: Command) -> Outcome {
    match command {
        Command::Add { text } => match TaskAction::add(&text.join(" ")) {
            Some(action) => {
                store.dispatch(action);
                Outcome::Render(View::Active)
            }
            None => Outcome::Message("`add` needs some text".to_string()),
        },
        Command::Toggle { position } => with_task(store, position, |task| {
            store.dispatch(TaskAction::toggle(task.id.clone()));
            Outcome::Render(View::All)
        }),
        Command::Remove { position } => with_task(store, position, |task| {
            store.dispatch(TaskAction::remove(task.id.clone()));
            Outcome::Render(View::All)
        }),
        Command::Edit { position, text } => with_task(store, position, |task| {
            if task.completed {
                return Outcome::Message(format!(
                    "Task {position} is completed; toggle it first to edit"
                ));
            }
            match TaskAction::edit(task.id.clone(), &text.join(" ")) {
                Some(action) => {
                    store.dispatch(action);
                    Outcome::Render(View::All)
                }
                None => Outcome::Message("`edit` needs some text".to_string()),
            }
        }),
        Command::ClearCompleted => {
            store.dispatch(TaskAction::ClearCompleted);
            Outcome::Render(View::Completed)
        }
        Command::ClearAll => {
            if store.get_state().tasks.items.is_empty() {
                Outcome::Message("No tasks to clear".to_string())
            } else {
                Outcome::ConfirmClearAll
            }
        }
        Command::ToggleDarkMode => {
            let state = store.dispatch(SettingsAction::ToggleDarkMode);
            Outcome::Message(render_settings(&state))
        }
        Command::Load => Outcome::StartLoad,
        Command::List { view } => Outcome::Render(view),
        Command::Quit => Outcome::Quit,
    }
}

fn with_task(store: &Store, position: usize, apply: impl FnOnce(&Task) -> Outcome) -> Outcome {
    let state = store.get_state();
    match task_at(&state, position) {
        Some(task) => apply(task),
        None => Outcome::Message(format!("No task at position {position}")),
    }
}

pub fn render(state: &RootState, view: View) -> String {
    let tasks = &state.tasks;
    let counts = tasks.counts();

    let (header, rows, empty): (String, Vec<(usize, &Task)>, &str) = match view {
        View::All => (
            format!(
                "All Tasks ({} total, {} active, {} completed)",
                counts.total, counts.active, counts.completed
            ),
            numbered(state).collect(),
            "No tasks yet\nAdd a new task with `add <text>`",
        ),
        View::Active => (
            format!("My Tasks ({} active tasks)", counts.active),
            numbered(state).filter(|(_, task)| !task.completed).collect(),
            "No tasks yet\nAdd a new task with `add <text>`",
        ),
        View::Completed => (
            format!("Completed Tasks ({} completed tasks)", counts.completed),
            numbered(state).filter(|(_, task)| task.completed).collect(),
            "No completed tasks\nComplete a task to see it here",
        ),
    };

    let mut lines = vec![header];
    if rows.is_empty() {
        lines.push(empty.to_string());
    }
    lines.extend(rows.into_iter().map(|(position, task)| {
        let mark = if task.completed { "x" } else { " " };
        format!("{position:>3}. [{mark}] {}", task.text)
    }));

    match tasks.load_status {
        LoadStatus::Loading => lines.push("Loading sample tasks...".to_string()),
        LoadStatus::Failed => {
            let message = tasks.load_error.as_deref().unwrap_or_default();
            lines.push(format!("Load failed: {message}"));
        }
        LoadStatus::Idle | LoadStatus::Succeeded => {}
    }
    format!("{}\n", lines.join("\n"))
}

pub fn render_settings(state: &RootState) -> String {
    let mode = if state.settings.dark_mode { "on" } else { "off" };
    format!(
        "Dark mode: {mode}\nClear all tasks ({})",
        state.tasks.items.len()
    )
}

fn numbered(state: &RootState) -> impl Iterator<Item = (usize, &Task)> {
    state
        .tasks
        .items
        .iter()
        .enumerate()
        .map(|(index, task)| (index + 1, task))
}

pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SettingsState, TaskCollectionState};
    use clap::error::ErrorKind;

    fn make_task(id: &str, text: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            text: text.to_string(),
            completed,
            created_at: 1,
        }
    }

    fn store_with(items: Vec<Task>) -> Store {
        Store::with_state(RootState::new(
            TaskCollectionState {
                items,
                ..TaskCollectionState::default()
            },
            SettingsState::default(),
        ))
    }

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn parse(line: &str) -> Command {
        parse_command(line).expect("line should parse")
    }

    fn parse_error(line: &str) -> ErrorKind {
        parse_command(line).expect_err("line should be rejected").kind()
    }

    #[test]
    fn parse_basic_commands() {
        assert_eq!(
            parse("  add   Buy milk  "),
            Command::Add {
                text: words("Buy milk")
            }
        );
        assert_eq!(parse("toggle 2"), Command::Toggle { position: 2 });
        assert_eq!(parse("done 2"), Command::Toggle { position: 2 });
        assert_eq!(parse("rm 1"), Command::Remove { position: 1 });
        assert_eq!(
            parse("edit 3  new words here"),
            Command::Edit {
                position: 3,
                text: words("new words here")
            }
        );
        assert_eq!(parse("clear-all"), Command::ClearAll);
        assert_eq!(parse("clear-completed"), Command::ClearCompleted);
        assert_eq!(parse("dark"), Command::ToggleDarkMode);
        assert_eq!(parse("list"), Command::List { view: View::Active });
        assert_eq!(
            parse("ls completed"),
            Command::List {
                view: View::Completed
            }
        );
        assert_eq!(parse("exit"), Command::Quit);
    }

    #[test]
    fn add_keeps_words_that_look_like_flags() {
        assert_eq!(
            parse("add pay rent -now"),
            Command::Add {
                text: words("pay rent -now")
            }
        );
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(parse_error("add"), ErrorKind::MissingRequiredArgument);
        assert_eq!(parse_error("edit 1"), ErrorKind::MissingRequiredArgument);
        assert_eq!(parse_error("toggle zero"), ErrorKind::ValueValidation);
        assert_eq!(parse_error("rm 0"), ErrorKind::ValueValidation);
        assert_eq!(parse_error("list later"), ErrorKind::InvalidValue);
        assert_eq!(parse_error("fly"), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn help_is_generated_from_the_commands() {
        assert_eq!(parse_error("help"), ErrorKind::DisplayHelp);
        let help = help_text();
        for name in ["add", "toggle", "edit", "rm", "clear-all", "dark", "load", "list"] {
            assert!(help.contains(name), "help should mention {name}");
        }
    }

    #[test]
    fn execute_resolves_positions_against_full_list() {
        let store = store_with(vec![
            make_task("a", "A", false),
            make_task("b", "B", true),
        ]);
        assert_eq!(
            execute(&store, Command::Toggle { position: 2 }),
            Outcome::Render(View::All)
        );
        assert!(!store.get_state().tasks.get("b").unwrap().completed);

        assert_eq!(
            execute(
                &store,
                Command::Edit {
                    position: 1,
                    text: words("A2")
                }
            ),
            Outcome::Render(View::All)
        );
        assert_eq!(store.get_state().tasks.get("a").unwrap().text, "A2");

        assert_eq!(
            execute(&store, Command::Remove { position: 3 }),
            Outcome::Message("No task at position 3".to_string())
        );
        assert_eq!(store.get_state().tasks.items.len(), 2);
    }

    #[test]
    fn edit_refuses_completed_tasks() {
        let store = store_with(vec![make_task("a", "A", false), make_task("b", "B", true)]);
        let before = store.get_state();

        assert_eq!(
            execute(
                &store,
                Command::Edit {
                    position: 2,
                    text: words("B2")
                }
            ),
            Outcome::Message("Task 2 is completed; toggle it first to edit".to_string())
        );
        assert!(std::sync::Arc::ptr_eq(&before.tasks, &store.get_state().tasks));

        execute(&store, Command::Toggle { position: 2 });
        execute(
            &store,
            Command::Edit {
                position: 2,
                text: words("B2")
            },
        );
        assert_eq!(store.get_state().tasks.get("b").unwrap().text, "B2");
    }

    #[test]
    fn clear_all_requires_confirmation_from_caller() {
        let store = store_with(vec![make_task("a", "A", false)]);
        assert_eq!(execute(&store, Command::ClearAll), Outcome::ConfirmClearAll);
        assert_eq!(store.get_state().tasks.items.len(), 1);

        let empty = Store::new();
        assert_eq!(
            execute(&empty, Command::ClearAll),
            Outcome::Message("No tasks to clear".to_string())
        );
        assert!(is_confirmation(" Yes "));
        assert!(!is_confirmation(""));
        assert!(!is_confirmation("n"));
    }

    #[test]
    fn dark_mode_and_load_commands() {
        let store = Store::new();
        assert_eq!(
            execute(&store, Command::ToggleDarkMode),
            Outcome::Message("Dark mode: on\nClear all tasks (0)".to_string())
        );
        assert!(store.get_state().settings.dark_mode);
        assert_eq!(execute(&store, Command::Load), Outcome::StartLoad);
    }

    #[test]
    fn render_views_with_counts() {
        let store = store_with(vec![
            make_task("a", "Buy milk", false),
            make_task("b", "Walk dog", true),
        ]);
        let state = store.get_state();

        assert_eq!(
            render(&state, View::Active),
            "My Tasks (1 active tasks)\n  1. [ ] Buy milk\n"
        );
        assert_eq!(
            render(&state, View::Completed),
            "Completed Tasks (1 completed tasks)\n  2. [x] Walk dog\n"
        );
        assert_eq!(
            render(&state, View::All),
            "All Tasks (2 total, 1 active, 1 completed)\n  1. [ ] Buy milk\n  2. [x] Walk dog\n"
        );
    }

    #[test]
    fn render_empty_views_and_load_status() {
        let store = Store::new();
        let state = store.dispatch(TaskAction::LoadFailed {
            message: "offline".to_string(),
        });
        assert_eq!(
            render(&state, View::Completed),
            "Completed Tasks (0 completed tasks)\nNo completed tasks\nComplete a task to see it here\nLoad failed: offline\n"
        );

        let state = store.dispatch(TaskAction::LoadPending);
        assert!(render(&state, View::Active).ends_with("Loading sample tasks...\n"));
    }
}
