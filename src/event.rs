use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ObservationEvent {
    Spawned {
        timestamp: DateTime<Utc>,
        parent_pid: i32,
        child_pid: i32,
    },
    Sample {
        timestamp: DateTime<Utc>,
        pid: i32,
        state: LifecycleState,
        elapsed_ms: u64,
    },
    Finished {
        timestamp: DateTime<Utc>,
        pid: i32,
        child_pid: i32,
        waited_ms: u64,
        child_state: LifecycleState,
    },
}

/// Process-table state of a pid as seen from outside the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Running,
    Sleeping,
    DiskSleep,
    Stopped,
    Zombie,
    Dead,
    Other(char),
    /// No table entry left for the pid.
    Reaped,
}

impl LifecycleState {
    /// Decode the state letter from `/proc/<pid>/stat`.
    pub fn from_stat_char(c: char) -> Self {
        match c {
            'R' => LifecycleState::Running,
            'S' | 'I' => LifecycleState::Sleeping,
            'D' => LifecycleState::DiskSleep,
            'T' | 't' => LifecycleState::Stopped,
            'Z' => LifecycleState::Zombie,
            'X' | 'x' => LifecycleState::Dead,
            other => LifecycleState::Other(other),
        }
    }

    pub fn is_zombie(&self) -> bool {
        matches!(self, LifecycleState::Zombie)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Running => write!(f, "running"),
            LifecycleState::Sleeping => write!(f, "sleeping"),
            LifecycleState::DiskSleep => write!(f, "disk_sleep"),
            LifecycleState::Stopped => write!(f, "stopped"),
            LifecycleState::Zombie => write!(f, "zombie"),
            LifecycleState::Dead => write!(f, "dead"),
            LifecycleState::Other(c) => write!(f, "other({})", c),
            LifecycleState::Reaped => write!(f, "reaped"),
        }
    }
}
