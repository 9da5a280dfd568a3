//! Read-only inspection of the process table through procfs.
//!
//! Nothing here waits on a pid, so looking at a zombie never reaps it.

use crate::event::LifecycleState;

/// Current state of `pid`, or `Reaped` once its table entry is gone.
pub fn lifecycle_state(pid: i32) -> LifecycleState {
    match procfs::process::Process::new(pid).and_then(|p| p.stat()) {
        Ok(stat) => LifecycleState::from_stat_char(stat.state),
        Err(e) => {
            log::debug!("No stat for pid {}: {}", pid, e);
            LifecycleState::Reaped
        }
    }
}

pub fn parent_of(pid: i32) -> Option<i32> {
    let proc = procfs::process::Process::new(pid).ok()?;
    let stat = proc.stat().ok()?;
    Some(stat.ppid)
}

/// Exit status a terminated, unreaped `pid` is holding for its parent.
/// `None` while it runs, once it is reaped, or if it was killed by a signal.
pub fn retained_exit_status(pid: i32) -> Option<i32> {
    let proc = procfs::process::Process::new(pid).ok()?;
    let raw = proc.stat().ok()?.exit_code?;
    if raw & 0x7f == 0 {
        Some((raw >> 8) & 0xff)
    } else {
        None
    }
}

/// Pids of zombie entries whose parent is `ppid`.
pub fn zombie_children(ppid: i32) -> Vec<i32> {
    let processes = match procfs::process::all_processes() {
        Ok(iter) => iter,
        Err(e) => {
            log::warn!("Failed to list processes: {}", e);
            return Vec::new();
        }
    };

    processes
        .filter_map(|p| p.ok())
        .filter_map(|p| p.stat().ok())
        .filter(|stat| stat.ppid == ppid && stat.state == 'Z')
        .map(|stat| stat.pid)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::wait::{waitpid, WaitStatus};
    use nix::unistd::{fork, getpid, ForkResult};
    use std::time::{Duration, Instant};

    fn wait_for_state(pid: i32, want: LifecycleState) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if lifecycle_state(pid) == want {
                return true;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn test_self_is_live() {
        // The stat line reflects the thread-group leader, which the test
        // harness parks while workers run, so only liveness is stable.
        let pid = std::process::id() as i32;
        let state = lifecycle_state(pid);
        assert!(
            !matches!(state, LifecycleState::Zombie | LifecycleState::Reaped),
            "own pid reported as {}",
            state
        );
        assert!(parent_of(pid).is_some());
    }

    #[test]
    fn test_missing_pid_reads_as_reaped() {
        // Above the kernel's pid_max ceiling, so never allocated.
        assert_eq!(lifecycle_state(i32::MAX), LifecycleState::Reaped);
        assert!(parent_of(i32::MAX).is_none());
    }

    #[test]
    fn test_unreaped_child_shows_as_zombie_until_waited() {
        let child = match unsafe { fork() }.unwrap() {
            ForkResult::Child => std::process::exit(0),
            ForkResult::Parent { child } => child,
        };

        assert!(
            wait_for_state(child.as_raw(), LifecycleState::Zombie),
            "child {} never became a zombie",
            child
        );
        assert_eq!(parent_of(child.as_raw()), Some(getpid().as_raw()));
        assert!(zombie_children(getpid().as_raw()).contains(&child.as_raw()));
        assert_eq!(retained_exit_status(child.as_raw()), Some(0));

        // Observing must not have consumed the exit status.
        let status = waitpid(child, None).unwrap();
        assert_eq!(status, WaitStatus::Exited(child, 0));
        assert_eq!(lifecycle_state(child.as_raw()), LifecycleState::Reaped);
    }
}
