//! Terminal front end for the todo list.
//!
//! Reads one command per line from stdin, sends it to the store and prints
//! the list whenever it changed. Logs go to stderr; set `RUST_LOG` to see
//! them.

use anyhow::Context;
use listkeeper_runtime::Store;
use std::io::{BufRead, Write};
use todo::repl::{self, Command, ParseError};
use todo::{TodoAction, TodoApp, TodoAppState, TodoConfig, TodoReducer};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo=info,listkeeper_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    listkeeper_runtime::metrics::describe();

    let config = TodoConfig::from_env().context("invalid configuration")?;
    tracing::info!(?config, "Starting todo");

    let mut app: TodoApp = Store::new(TodoAppState::new(config.build_store()), TodoReducer::new(), ());
    let mut actions = app.subscribe_actions();
    let mut revisions = app.subscribe_revisions();

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    writeln!(stdout, "Draggable Todo List. Type 'help' for commands.")?;
    prompt(&mut stdout)?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => writeln!(stdout, "{}", repl::HELP)?,
            Ok(Command::List) => write!(stdout, "{}", app.state(repl::render))?,
            Ok(Command::Json) => {
                let json = app.state(repl::render_json)?;
                writeln!(stdout, "{json}")?;
            },
            Ok(Command::Dispatch(action)) => {
                if let Err(error) = app.send(action) {
                    tracing::error!(%error, "Action aborted");
                }
                drain_rejections(&mut actions, &mut stdout)?;
                if revisions.has_changed().unwrap_or(false) {
                    drop(revisions.borrow_and_update());
                    write!(stdout, "{}", app.state(repl::render))?;
                }
            },
            Err(ParseError::Empty) => {},
            Err(error) => writeln!(stdout, "{error}")?,
        }

        prompt(&mut stdout)?;
    }

    Ok(())
}

/// Print every validation failure the last send produced
fn drain_rejections(actions: &mut broadcast::Receiver<TodoAction>, out: &mut impl Write) -> std::io::Result<()> {
    loop {
        match actions.try_recv() {
            Ok(TodoAction::ValidationFailed { error }) => writeln!(out, "error: {error}")?,
            Ok(_) | Err(TryRecvError::Lagged(_)) => {},
            Err(TryRecvError::Empty | TryRecvError::Closed) => return Ok(()),
        }
    }
}

fn prompt(out: &mut impl Write) -> std::io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}
