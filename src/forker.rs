use crate::config::ForkerConfig;
use crate::error::{ForkerError, Result};
use crate::event::ObservationEvent;
use crate::observer;
use crate::output::EventRecorder;
use chrono::Utc;
use nix::unistd::{fork, getpid, ForkResult, Pid};
use std::io::Write;
use std::time::{Duration, Instant};

pub const CHILD_EXIT_STATUS: i32 = 0;

/// Which side of the split the caller is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessRole {
    Parent { child: Pid },
    Child,
}

/// What a finished branch hands back so `main` can end the process image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    Parent { child: Pid, waited: Duration },
    /// The caller must exit with `status` right away.
    Child { status: i32 },
}

/// Source of the process-creation split.
pub trait Splitter {
    fn split(&self) -> nix::Result<ForkResult>;
}

pub struct OsSplitter;

impl Splitter for OsSplitter {
    fn split(&self) -> nix::Result<ForkResult> {
        // The child only writes, flushes and exits, and the binary has no
        // other threads at this point.
        unsafe { fork() }
    }
}

pub fn create_process() -> Result<ProcessRole> {
    create_process_with(&OsSplitter)
}

pub fn create_process_with<S: Splitter + ?Sized>(splitter: &S) -> Result<ProcessRole> {
    match splitter.split() {
        Ok(ForkResult::Parent { child }) => Ok(ProcessRole::Parent { child }),
        Ok(ForkResult::Child) => Ok(ProcessRole::Child),
        Err(e) => Err(ForkerError::ProcessCreationFailed(e)),
    }
}

pub struct Forker<S: Splitter = OsSplitter> {
    config: ForkerConfig,
    splitter: S,
    events: EventRecorder,
}

impl Forker<OsSplitter> {
    pub fn new(config: ForkerConfig, events: EventRecorder) -> Self {
        Self::with_splitter(config, OsSplitter, events)
    }
}

impl<S: Splitter> Forker<S> {
    pub fn with_splitter(config: ForkerConfig, splitter: S, events: EventRecorder) -> Self {
        Self {
            config,
            splitter,
            events,
        }
    }

    /// Split, then run this side's branch. On failure no branch runs.
    pub fn run(&mut self, out: &mut dyn Write) -> Result<Continuation> {
        let role = create_process_with(&self.splitter)?;
        self.dispatch(role, out)
    }

    pub fn dispatch(&mut self, role: ProcessRole, out: &mut dyn Write) -> Result<Continuation> {
        match role {
            ProcessRole::Child => self.run_child(out),
            ProcessRole::Parent { child } => self.run_parent(child, out),
        }
    }

    /// Never fails: the child exits with `CHILD_EXIT_STATUS` even when its
    /// text cannot be written.
    fn run_child(&self, out: &mut dyn Write) -> Result<Continuation> {
        if let Err(e) = out
            .write_all(self.config.child_text.as_bytes())
            .and_then(|()| out.flush())
        {
            log::warn!("Child {} could not write its text: {}", getpid(), e);
        }
        Ok(Continuation::Child {
            status: CHILD_EXIT_STATUS,
        })
    }

    fn run_parent(&mut self, child: Pid, out: &mut dyn Write) -> Result<Continuation> {
        let start = Instant::now();
        let parent_pid = getpid().as_raw();
        log::debug!(
            "Parent {} holding child {} unreaped for {:?}",
            parent_pid,
            child,
            self.config.delay
        );

        self.events.emit_event(&ObservationEvent::Spawned {
            timestamp: Utc::now(),
            parent_pid,
            child_pid: child.as_raw(),
        })?;

        for slice in self.config.delay_slices() {
            std::thread::sleep(slice);
            if self.events.is_enabled() {
                self.sample(child, start)?;
            }
        }

        let waited = start.elapsed();
        if self.events.is_enabled() {
            let child_state = observer::lifecycle_state(child.as_raw());
            if !child_state.is_zombie() {
                log::warn!(
                    "Child {} is {} at the end of the window, not a zombie",
                    child,
                    child_state
                );
            }
            log::info!(
                "Zombie children of {}: {:?}",
                parent_pid,
                observer::zombie_children(parent_pid)
            );
            self.events.emit_event(&ObservationEvent::Finished {
                timestamp: Utc::now(),
                pid: parent_pid,
                child_pid: child.as_raw(),
                waited_ms: waited.as_millis() as u64,
                child_state,
            })?;
            self.events.flush()?;
        }

        out.write_all(self.config.parent_text.as_bytes())?;
        out.flush()?;

        Ok(Continuation::Parent { child, waited })
    }

    fn sample(&mut self, child: Pid, start: Instant) -> Result<()> {
        let state = observer::lifecycle_state(child.as_raw());
        log::debug!("Child {} state: {}", child, state);
        self.events.emit_event(&ObservationEvent::Sample {
            timestamp: Utc::now(),
            pid: child.as_raw(),
            state,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })?;
        self.events.flush()
    }
}
