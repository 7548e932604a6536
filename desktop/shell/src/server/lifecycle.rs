//! Slidev process lifecycle.

use crate::server::{
    Completion, LaunchCommand, Launcher, LogBuffer, PortAllocator, ProcessTerminator,
    ReadinessScanner, ServerError, ServerResult, ServerState, SlidevLauncher, StartPlan,
    StartResult, default_terminator, forward_lines,
};

use std::path::Path;
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use studio_config::SupervisorConfig;
use tokio::io::AsyncRead;
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const OUTPUT_CHANNEL_CAPACITY: usize = 256;
const SLIDEV_LOG_TARGET: &str = "slidev";

#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = windows_sys::Win32::System::Threading::CREATE_NEW_PROCESS_GROUP;

/// Supervises the single Slidev dev server of a session.
///
/// Responsibilities:
/// - Launch Slidev for a deck and wait for it to print its URL
/// - Share one in-flight start between identical concurrent requests
/// - Stop the previous deck's server before serving another deck
/// - Kill the whole process tree on stop, timeout or early exit
///
/// State lives behind a blocking mutex that is never held across an await.
/// Every start attempt captures a generation number; a stop bumps it, and
/// any completion carrying an older generation is discarded.
pub struct SlideServer {
    config: SupervisorConfig,
    launcher: Arc<dyn Launcher>,
    terminator: Arc<dyn ProcessTerminator>,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    generation: u64,
    state: ServerState,
    attempt: Option<Attempt>,
    /// Present exactly while the state is `Starting`
    completion: Option<Completion>,
}

/// Resources owned by the current attempt.
struct Attempt {
    generation: u64,
    cancel: CancellationToken,
    pid: Option<u32>,
    /// Held open; Slidev exits when its stdin closes.
    stdin: Option<ChildStdin>,
    secondary: Option<watch::Receiver<Option<u32>>>,
}

enum Decision {
    Reuse(String),
    Join(Completion),
    /// Retire the generation that was observed, then decide again
    Restart(u64),
    Launch(Ticket),
}

struct Ticket {
    generation: u64,
    cancel: CancellationToken,
    completion: Completion,
}

impl SlideServer {
    /// Supervisor launching the real Slidev CLI relative to the running binary.
    pub fn new(config: SupervisorConfig) -> ServerResult<Self> {
        let launcher = SlidevLauncher::from_current_exe(config.clone())?;
        Ok(Self::with_parts(
            config,
            Arc::new(launcher),
            default_terminator(),
        ))
    }

    pub fn with_parts(
        config: SupervisorConfig,
        launcher: Arc<dyn Launcher>,
        terminator: Arc<dyn ProcessTerminator>,
    ) -> Self {
        Self {
            config,
            launcher,
            terminator,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Serve `file` (the configured default when empty) from `dir` and
    /// return its URL once Slidev reports it.
    pub async fn start(&self, dir: &Path, file: &str) -> StartResult {
        let target = if file.is_empty() {
            self.config.default_file.as_str()
        } else {
            file
        };

        loop {
            match self.decide(target) {
                Decision::Reuse(url) => return Ok(url),
                Decision::Join(completion) => {
                    debug!("Joining in-flight start of {target}");
                    return completion.wait().await;
                }
                Decision::Restart(generation) => {
                    info!("Switching deck to {target}, stopping current server");
                    self.stop_generation(generation);
                }
                Decision::Launch(ticket) => return self.launch(dir, target, ticket).await,
            }
        }
    }

    /// Retire whatever is running or starting. Always safe to call.
    pub fn stop(&self) {
        self.retire(None);
    }

    /// Application-exit hook.
    pub fn shutdown(&self) {
        info!("Shutting down Slidev supervisor");
        self.stop();
    }

    /// Committed URL, or an empty string when not running.
    pub fn url(&self) -> String {
        self.lock().state.url().unwrap_or_default().to_string()
    }

    pub fn state(&self) -> ServerState {
        self.lock().state.clone()
    }

    pub fn is_running(&self) -> bool {
        self.lock().state.is_running()
    }

    /// Direct child and captured descendant PIDs of the current attempt.
    pub fn process_ids(&self) -> (Option<u32>, Option<u32>) {
        let inner = self.lock();
        match &inner.attempt {
            Some(attempt) => (attempt.pid, secondary_pid(attempt)),
            None => (None, None),
        }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    fn decide(&self, target: &str) -> Decision {
        let mut inner = self.lock();
        match inner.state.plan_start(target) {
            StartPlan::Reuse(url) => Decision::Reuse(url),
            StartPlan::Join => match inner.completion.clone() {
                Some(completion) => Decision::Join(completion),
                None => Decision::Restart(inner.generation),
            },
            StartPlan::Restart => Decision::Restart(inner.generation),
            StartPlan::Launch => {
                inner.generation += 1;
                let generation = inner.generation;
                let cancel = CancellationToken::new();
                let completion = Completion::new();

                inner.state = ServerState::starting(generation, target);
                inner.completion = Some(completion.clone());
                inner.attempt = Some(Attempt {
                    generation,
                    cancel: cancel.clone(),
                    pid: None,
                    stdin: None,
                    secondary: None,
                });

                Decision::Launch(Ticket {
                    generation,
                    cancel,
                    completion,
                })
            }
        }
    }

    async fn launch(&self, dir: &Path, target: &str, ticket: Ticket) -> StartResult {
        let Ticket {
            generation,
            cancel,
            completion,
        } = ticket;

        match self.run_attempt(dir, target, generation, &cancel).await {
            Ok(url) => {
                if self.commit(generation, &url) {
                    info!("Slidev ready at {url}");
                    completion.resolve(Ok(url));
                } else {
                    debug!("Discarding stale start of {target} (generation {generation})");
                    completion.resolve(Err(Arc::new(ServerError::cancelled())));
                }
            }
            Err(e) => {
                if !e.is_cancelled() {
                    warn!("Slidev failed to start: {e}");
                }
                completion.resolve(Err(Arc::new(e)));
                self.stop_generation(generation);
            }
        }

        completion.wait().await
    }

    async fn run_attempt(
        &self,
        dir: &Path,
        target: &str,
        generation: u64,
        cancel: &CancellationToken,
    ) -> ServerResult<String> {
        let port = PortAllocator::allocate()?;
        let command = self.launcher.command(dir, target, port)?;
        info!("Starting Slidev: {command}");

        let mut child = spawn(&command)?;
        let pid = child.id();
        info!("Slidev process started, pid={pid:?}");

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (secondary_tx, secondary_rx) = watch::channel(None);

        if !self.register(generation, pid, stdin, secondary_rx) {
            debug!("Start of {target} superseded during spawn");
            self.terminator.terminate(pid, None);
            tokio::spawn(reap(child));
            return Err(ServerError::cancelled());
        }
        tokio::spawn(reap(child));

        let logs = LogBuffer::new(self.config.log_buffer_lines);
        let ready_rx = pump_output(
            stdout,
            stderr,
            ReadinessScanner::new(logs.clone()),
            secondary_tx,
        );

        let timeout = self.config.startup_timeout();
        tokio::select! {
            ready = ready_rx => match ready {
                Ok(port) => Ok(format!("http://{}:{port}", self.config.url_host)),
                Err(_) => Err(ServerError::exited_before_ready(logs.snapshot())),
            },
            _ = tokio::time::sleep(timeout) => {
                Err(ServerError::startup_timeout(timeout.as_secs(), logs.snapshot()))
            }
            _ = cancel.cancelled() => Err(ServerError::cancelled()),
        }
    }

    /// Stop only if nothing has moved the generation since it was observed,
    /// so a racing restart or a newer attempt is left alone.
    fn stop_generation(&self, generation: u64) {
        self.retire(Some(generation));
    }

    fn retire(&self, expected: Option<u64>) {
        let (attempt, completion) = {
            let mut inner = self.lock();
            if expected.is_some_and(|generation| generation != inner.generation) {
                return;
            }
            inner.generation += 1;
            inner.state = ServerState::Idle;
            (inner.attempt.take(), inner.completion.take())
        };

        if attempt.is_some() {
            info!("Stopping Slidev server");
        }
        self.teardown(attempt, completion);
    }

    /// Attach the spawned child to its attempt, unless a stop got there first.
    fn register(
        &self,
        generation: u64,
        pid: Option<u32>,
        stdin: Option<ChildStdin>,
        secondary: watch::Receiver<Option<u32>>,
    ) -> bool {
        let mut inner = self.lock();
        match inner.attempt.as_mut() {
            Some(attempt) if attempt.generation == generation => {
                attempt.pid = pid;
                attempt.stdin = stdin;
                attempt.secondary = Some(secondary);
                true
            }
            _ => false,
        }
    }

    fn commit(&self, generation: u64, url: &str) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation {
            return false;
        }
        match inner.state.commit(generation, url) {
            Some(next) => {
                inner.state = next;
                inner.completion = None;
                true
            }
            None => false,
        }
    }

    /// Close stdin, release waiters, cancel, then kill the process tree.
    fn teardown(&self, attempt: Option<Attempt>, completion: Option<Completion>) {
        let Some(mut attempt) = attempt else {
            if let Some(completion) = completion {
                completion.resolve(Err(Arc::new(ServerError::cancelled())));
            }
            return;
        };

        drop(attempt.stdin.take());

        if let Some(completion) = completion {
            completion.resolve(Err(Arc::new(ServerError::cancelled())));
        }

        attempt.cancel.cancel();

        let secondary = secondary_pid(&attempt);
        if attempt.pid.is_some() || secondary.is_some() {
            self.terminator.terminate(attempt.pid, secondary);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for SlideServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn secondary_pid(attempt: &Attempt) -> Option<u32> {
    attempt.secondary.as_ref().and_then(|rx| *rx.borrow())
}

fn spawn(command: &LaunchCommand) -> ServerResult<Child> {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .current_dir(&command.current_dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    // Own process group so the whole tree can be killed as a unit.
    #[cfg(unix)]
    cmd.process_group(0);

    #[cfg(windows)]
    cmd.creation_flags(CREATE_NEW_PROCESS_GROUP);

    cmd.spawn()
        .map_err(|e| ServerError::process_spawn(command.program.display().to_string(), e))
}

/// Wait on the child so it never lingers as a zombie. Exit alone does not
/// change supervisor state: a launcher may exit while its server keeps going.
async fn reap(mut child: Child) {
    let pid = child.id();
    match child.wait().await {
        Ok(status) if status.success() => info!("Slidev process exited cleanly (pid={pid:?})"),
        Ok(status) => info!("Slidev process exited (pid={pid:?}) with {status}"),
        Err(e) => warn!("Failed to wait on Slidev process (pid={pid:?}): {e}"),
    }
}

/// Merge stdout and stderr into the scanner. The returned receiver yields
/// the detected port, or errors once both streams close without one.
fn pump_output<O, E>(
    stdout: Option<O>,
    stderr: Option<E>,
    mut scanner: ReadinessScanner,
    secondary_tx: watch::Sender<Option<u32>>,
) -> oneshot::Receiver<u16>
where
    O: AsyncRead + Unpin + Send + 'static,
    E: AsyncRead + Unpin + Send + 'static,
{
    let (line_tx, mut line_rx) = mpsc::channel::<String>(OUTPUT_CHANNEL_CAPACITY);
    let (ready_tx, ready_rx) = oneshot::channel();

    if let Some(stdout) = stdout {
        tokio::spawn(forward_lines(stdout, line_tx.clone()));
    }
    if let Some(stderr) = stderr {
        tokio::spawn(forward_lines(stderr, line_tx.clone()));
    }
    drop(line_tx);

    tokio::spawn(async move {
        let mut ready_tx = Some(ready_tx);
        while let Some(line) = line_rx.recv().await {
            debug!(target: SLIDEV_LOG_TARGET, "{line}");

            let findings = scanner.scan_line(&line);
            if let Some(pid) = findings.secondary_pid {
                info!("Captured Slidev node pid={pid}");
                secondary_tx.send_replace(Some(pid));
            }
            if let Some(port) = findings.ready_port
                && let Some(tx) = ready_tx.take()
            {
                let _ = tx.send(port);
            }
        }
        debug!("Slidev output closed");
    });

    ready_rx
}
