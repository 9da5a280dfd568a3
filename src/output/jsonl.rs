use std::io::{self, BufWriter, Write};

use super::EventSink;
use crate::error::Result;
use crate::event::ObservationEvent;

/// JSONL output sink - one JSON object per line.
pub struct JsonlSink {
    writer: BufWriter<Box<dyn Write>>,
}

impl JsonlSink {
    pub fn new_file(file: std::fs::File) -> Self {
        Self::new(Box::new(file))
    }

    /// Stdout carries the demo's own text, so records default to stderr.
    pub fn new_stderr() -> Self {
        Self::new(Box::new(io::stderr()))
    }

    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }
}

impl EventSink for JsonlSink {
    fn emit_event(&mut self, event: &ObservationEvent) -> Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
