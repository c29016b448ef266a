use std::io::Write as _;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use tasklist::config::StoreConfig;
use tasklist::loader::{spawn_load_sample, LoadOutcome, SampleSource, TaskSource, TokioTimer};
use tasklist::logging::init_logging;
use tasklist::shell::{
    execute, help_text, is_confirmation, parse_command, render, Outcome, View, CLEAR_ALL_PROMPT,
};
use tasklist::store::Store;
use tasklist::tasks::TaskAction;

// Everything runs on one thread; the deferred load completes on it as well.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("tasklist: {error}");
            return ExitCode::FAILURE;
        }
    };
    let _logger = match init_logging(&config) {
        Ok(handle) => Some(handle),
        Err(error) => {
            eprintln!("tasklist: logging disabled: {error}");
            None
        }
    };

    let store = Store::new();
    let source: Arc<dyn TaskSource> =
        Arc::new(SampleSource::new(TokioTimer, config.sample_delay()));

    print!("{}", help_text());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt("> ");
        let line = match next_line(&mut lines).await {
            Some(line) => line,
            None => break,
        };

        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(error) => {
                print!("{error}");
                continue;
            }
        };

        match execute(&store, command) {
            Outcome::Render(view) => print!("{}", render(&store.get_state(), view)),
            Outcome::Message(message) => println!("{message}"),
            Outcome::ConfirmClearAll => {
                prompt(&format!("{CLEAR_ALL_PROMPT} "));
                let answer = next_line(&mut lines).await.unwrap_or_default();
                if is_confirmation(&answer) {
                    store.dispatch(TaskAction::ClearAll);
                    println!("All tasks deleted");
                } else {
                    println!("Cancelled");
                }
            }
            Outcome::StartLoad => start_load(&store, &source),
            Outcome::Quit => break,
        }
    }

    log::info!("shell exiting");
    ExitCode::SUCCESS
}

fn start_load(store: &Store, source: &Arc<dyn TaskSource>) {
    println!("Loading sample tasks...");
    let handle = spawn_load_sample(store.clone(), Arc::clone(source));
    let store = store.clone();
    tokio::spawn(async move {
        match handle.await {
            Ok(LoadOutcome::Succeeded(count)) => {
                println!("\nLoaded {count} sample tasks");
                print!("{}", render(&store.get_state(), View::Active));
            }
            Ok(LoadOutcome::Failed(message)) => println!("\nLoad failed: {message}"),
            Err(error) => log::error!("sample load task aborted: {error}"),
        }
        prompt("> ");
    });
}

async fn next_line(lines: &mut Lines<BufReader<Stdin>>) -> Option<String> {
    match lines.next_line().await {
        Ok(line) => line,
        Err(error) => {
            log::error!("failed to read stdin: {error}");
            None
        }
    }
}

fn prompt(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}
