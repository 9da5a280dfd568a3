use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "zombie")]
#[command(
    about = "Fork a child that exits at once and keep the parent alive without reaping it, leaving a zombie in the process table"
)]
#[command(version)]
pub struct Cli {
    /// Seconds the parent stays alive without reaping the child
    #[arg(long, value_name = "SECONDS", default_value_t = 60)]
    pub delay: u64,

    /// Sample the child's process-table state during the delay
    #[arg(long)]
    pub observe: bool,

    /// Sampling interval while observing
    #[arg(long, value_name = "MS", default_value_t = 500)]
    pub sample_ms: u64,

    /// JSONL file for observation records (default: stderr)
    #[arg(long, value_name = "FILE")]
    pub events: Option<PathBuf>,
}

impl Cli {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.sample_ms == 0 {
            anyhow::bail!("--sample-ms must be greater than zero");
        }

        if self.events.is_some() && !self.observe {
            anyhow::bail!("--events requires --observe");
        }

        if let Some(path) = &self.events {
            if path.is_dir() {
                anyhow::bail!("Events path is a directory: {}", path.display());
            }
        }

        Ok(())
    }
}
