use crate::error::Result;
use crate::event::ObservationEvent;
use std::path::Path;

pub mod jsonl;

pub trait EventSink {
    fn emit_event(&mut self, event: &ObservationEvent) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}

/// Fans observation records out to the configured sinks. Empty when
/// observation is off, so emitting costs nothing on the plain path.
pub struct EventRecorder {
    sinks: Vec<Box<dyn EventSink>>,
}

impl EventRecorder {
    pub fn new(observe: bool, events_path: Option<&Path>) -> Result<Self> {
        let mut sinks: Vec<Box<dyn EventSink>> = Vec::new();

        if observe {
            match events_path {
                Some(path) => {
                    let file = std::fs::File::create(path)?;
                    sinks.push(Box::new(jsonl::JsonlSink::new_file(file)));
                }
                None => sinks.push(Box::new(jsonl::JsonlSink::new_stderr())),
            }
        }

        Ok(Self { sinks })
    }

    pub fn disabled() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sink(sink: Box<dyn EventSink>) -> Self {
        Self { sinks: vec![sink] }
    }

    pub fn is_enabled(&self) -> bool {
        !self.sinks.is_empty()
    }

    pub fn emit_event(&mut self, event: &ObservationEvent) -> Result<()> {
        for sink in &mut self.sinks {
            sink.emit_event(event)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        for sink in &mut self.sinks {
            sink.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::LifecycleState;
    use chrono::Utc;

    #[test]
    fn test_disabled_without_observe() {
        let recorder = EventRecorder::new(false, None).unwrap();
        assert!(!recorder.is_enabled());
    }

    #[test]
    fn test_file_sink_receives_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        let mut recorder = EventRecorder::new(true, Some(&path)).unwrap();
        assert!(recorder.is_enabled());
        recorder
            .emit_event(&ObservationEvent::Sample {
                timestamp: Utc::now(),
                pid: 7,
                state: LifecycleState::Zombie,
                elapsed_ms: 0,
            })
            .unwrap();
        recorder.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("\"event_type\":\"sample\""));
    }
}
