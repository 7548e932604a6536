//! Process-tree termination.

use std::sync::Arc;

use tracing::{debug, info};

/// Kills a process together with its descendants.
///
/// Best effort: processes may already be gone, so failures are logged and
/// never returned.
pub trait ProcessTerminator: Send + Sync {
    fn terminate(&self, primary: Option<u32>, secondary: Option<u32>);
}

/// Terminator for the platform this binary was built for.
pub fn default_terminator() -> Arc<dyn ProcessTerminator> {
    #[cfg(unix)]
    {
        Arc::new(PosixTerminator)
    }

    #[cfg(windows)]
    {
        Arc::new(WindowsTerminator)
    }
}

#[cfg(windows)]
fn targets(primary: Option<u32>, secondary: Option<u32>) -> Vec<u32> {
    let mut pids: Vec<u32> = [secondary, primary]
        .into_iter()
        .flatten()
        .filter(|pid| *pid != 0)
        .collect();
    pids.dedup();
    pids
}

/// Converts to a signalable PID, refusing init and wrapped-around values.
#[cfg(unix)]
fn signalable(pid: u32) -> Option<nix::unistd::Pid> {
    i32::try_from(pid)
        .ok()
        .filter(|raw| *raw > 1)
        .map(nix::unistd::Pid::from_raw)
}

/// Whether `secondary` is in the process group led by `primary`.
///
/// The secondary PID is scraped from log text, so anything outside the
/// child's group is someone else's process.
#[cfg(unix)]
pub fn in_process_group(primary: u32, secondary: u32) -> bool {
    let (Some(leader), Some(member)) = (signalable(primary), signalable(secondary)) else {
        return false;
    };
    nix::unistd::getpgid(Some(member)).is_ok_and(|group| group == leader)
}

/// SIGKILL to the child's process group, then to the child itself.
///
/// The child is spawned as a group leader, so its PID is also the group id
/// and the group signal reaches every descendant that stayed in it, even
/// after the leader exited. A captured secondary PID is only signalled
/// directly, and only while it still belongs to that group.
#[cfg(unix)]
pub struct PosixTerminator;

#[cfg(unix)]
impl ProcessTerminator for PosixTerminator {
    fn terminate(&self, primary: Option<u32>, secondary: Option<u32>) {
        use nix::sys::signal::{Signal, kill, killpg};

        let Some(leader) = primary.and_then(signalable) else {
            if let Some(pid) = secondary {
                debug!("Ignoring secondary pid {pid} without a primary process");
            }
            return;
        };

        if let Some(pid) = secondary.filter(|pid| Some(*pid) != primary) {
            match primary {
                Some(primary) if in_process_group(primary, pid) => {
                    if let Some(member) = signalable(pid)
                        && let Err(e) = kill(member, Signal::SIGKILL)
                    {
                        debug!("kill({member}) failed: {e}");
                    }
                }
                _ => tracing::warn!("Not killing pid {pid}: outside the Slidev process group"),
            }
        }

        info!("Killing process tree of pid {leader}");
        if let Err(e) = killpg(leader, Signal::SIGKILL) {
            debug!("killpg({leader}) failed: {e}");
        }
        if let Err(e) = kill(leader, Signal::SIGKILL) {
            debug!("kill({leader}) failed: {e}");
        }
    }
}

/// `taskkill /F /T` kills the whole tree rooted at each PID.
///
/// The taskkill processes are spawned and left to finish on their own so
/// that a stop never waits on them.
#[cfg(windows)]
pub struct WindowsTerminator;

#[cfg(windows)]
impl ProcessTerminator for WindowsTerminator {
    fn terminate(&self, primary: Option<u32>, secondary: Option<u32>) {
        use std::process::{Command, Stdio};

        for pid in targets(primary, secondary) {
            info!("Killing process tree of pid {pid}");
            if let Err(e) = Command::new("taskkill")
                .args(["/F", "/T", "/PID", &pid.to_string()])
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
            {
                debug!("taskkill {pid} failed: {e}");
            }
        }
    }
}
