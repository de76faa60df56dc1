//! Terminal host: the view layer for the dashboard.
//!
//! Reads one command per line from stdin while the scheduler refreshes in the
//! background, and reprints the dashboard whenever a refresh is applied.

use crate::dashboard::{Dashboard, DashboardState};
use crate::models::Language;
use crate::outputs::json::write_snapshot;
use crate::outputs::text::DashboardView;
use crate::relay::FetchContents;
use crate::scheduler::RefreshScheduler;
use crate::speech::Narrator;
use std::error::Error;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

pub const HELP: &str = "commands: en | ta | hi (language), r (refresh), s [n] (speak ticker or story n), q (quit)";

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Language(Language),
    Refresh,
    /// Speak the ticker, or the 1-based story number.
    Speak(Option<usize>),
    Help,
    Quit,
}

impl HostCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let command = match words.next() {
            Some(word) => word.to_ascii_lowercase(),
            None => return Ok(HostCommand::Help),
        };
        let argument = words.next();

        match (command.as_str(), argument) {
            ("r" | "refresh", None) => Ok(HostCommand::Refresh),
            ("q" | "quit" | "exit", None) => Ok(HostCommand::Quit),
            ("h" | "help" | "?", None) => Ok(HostCommand::Help),
            ("s" | "speak", None) => Ok(HostCommand::Speak(None)),
            ("s" | "speak", Some(n)) => match n.parse::<usize>() {
                Ok(n) if n > 0 => Ok(HostCommand::Speak(Some(n))),
                _ => Err(format!("not a story number: {n}")),
            },
            (tag, None) => tag
                .parse::<Language>()
                .map(HostCommand::Language)
                .map_err(|_| format!("unknown command: {}", line.trim())),
            _ => Err(format!("unknown command: {}", line.trim())),
        }
    }
}

/// Text to read aloud for a speak command, if there is any.
pub fn speech_text(state: &DashboardState, story: Option<usize>) -> Option<String> {
    match story {
        None => Some(state.ticker.clone()).filter(|t| !t.is_empty()),
        Some(n) => n
            .checked_sub(1)
            .and_then(|i| state.stories.get(i))
            .map(|s| s.spoken_text().to_string()),
    }
}

/// Run the interactive dashboard until `q`, end of input or Ctrl-C.
pub async fn run<R: FetchContents + 'static>(
    mut scheduler: RefreshScheduler<R>,
    dashboard: Arc<Dashboard>,
    mut narrator: Narrator,
    json_output_dir: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let mut updates = dashboard.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    println!("{HELP}");
    scheduler.activate();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if !state.loading {
                    println!("\n{}\n", DashboardView(&state));
                }
                if let Some(dir) = &json_output_dir {
                    if let Err(e) = write_snapshot(&state, dir).await {
                        error!(error = %e, "Failed to write snapshot");
                    }
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Input closed");
                    break;
                };
                match HostCommand::parse(&line) {
                    Ok(HostCommand::Quit) => break,
                    Ok(HostCommand::Help) => println!("{HELP}"),
                    Ok(HostCommand::Refresh) => {
                        // Detached; the result arrives through `updates`.
                        drop(scheduler.refresh_now());
                    }
                    Ok(HostCommand::Language(lang)) => scheduler.set_language(lang),
                    Ok(HostCommand::Speak(story)) => {
                        let state = dashboard.snapshot();
                        match speech_text(&state, story) {
                            Some(text) => {
                                if let Err(e) = narrator.speak(&text, state.lang) {
                                    warn!(error = %e, "Speech failed");
                                    println!("{e}");
                                }
                            }
                            None => println!("nothing to read"),
                        }
                    }
                    Err(message) => println!("{message}\n{HELP}"),
                }
            }
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
        }
    }

    scheduler.deactivate();
    Ok(())
}
