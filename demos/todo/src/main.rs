//! Interactive todo list in the terminal.
//!
//! Reads commands from stdin, sends them to the store, and re-renders the
//! list whenever a new snapshot is published. Type `help` for commands.

use anyhow::Context;
use snapstore_runtime::metrics::PrometheusMetrics;
use std::io::Write;
use todo::cli::{self, Session, Step, HELP};
use todo::config::Config;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_prompt(prompt: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{prompt}")?;
    stdout.flush().context("flushing stdout")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the rendered list
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo=info,snapstore_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        store = %config.store_name,
        id_strategy = ?config.id_strategy,
        metrics = config.metrics,
        "Configuration loaded"
    );

    let metrics = if config.metrics {
        Some(PrometheusMetrics::install().context("installing metrics recorder")?)
    } else {
        None
    };

    let mut session = Session::new(&config, metrics);

    println!("=== Todo ===\n");
    println!("{HELP}\n");
    println!("{}", session.render());
    print_prompt(&session.prompt())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = cli::next_line(&mut lines).await.context("reading stdin")? {
        match session.handle_line(&line) {
            Step::Continue(output) => {
                if !output.is_empty() {
                    println!("{output}");
                }
            },
            Step::Quit => break,
        }
        print_prompt(&session.prompt())?;
    }

    let stats = session.store().state(todo::TodoList::stats);
    info!(%stats, version = %session.store().version(), "Session finished");
    Ok(())
}
