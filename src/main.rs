use anyhow::{Context, Result};
use clap::Parser;

use zombie_fork::cli::Cli;
use zombie_fork::config::ForkerConfig;
use zombie_fork::forker::{Continuation, Forker};
use zombie_fork::output::EventRecorder;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    cli.validate()?;

    let config = ForkerConfig::from_cli(&cli);
    let events = EventRecorder::new(config.observe, config.events_path.as_deref())
        .context("failed to open event output")?;

    let mut forker = Forker::new(config, events);
    let mut stdout = std::io::stdout();

    let continuation = forker.run(&mut stdout).map_err(|e| {
        let what = if e.is_creation_failure() {
            "failed to create child process"
        } else {
            "forker failed"
        };
        anyhow::Error::new(e).context(what)
    })?;

    match continuation {
        // Nothing after the split may run in the child.
        Continuation::Child { status } => std::process::exit(status),
        Continuation::Parent { child, waited } => {
            log::info!(
                "Exiting after {:?} without reaping child {}",
                waited,
                child
            );
            Ok(())
        }
    }
}
