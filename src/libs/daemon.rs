//! Tracker daemon management and the tracking event loop.
//!
//! `punchclock start` spawns the current executable as a detached background
//! process that owns the live session: the per-second tick, idle tracking,
//! and screenshot capture. A PID file under the data directory enforces
//! single-instance semantics: starting while a tracker is already running
//! replaces it.
//!
//! On SIGTERM/SIGINT the loop cancels all timers through the tracker's
//! close hook and exits; the resume-slot is left behind so the next start
//! (or `stop`/`submit`/`cancel`) picks the session back up.

use crate::api::auth;
use crate::api::sessions::HttpSessionStore;
use crate::api::uploads::HttpImageSink;
use crate::db::slots::ResumeSlots;
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::monitor::Monitor;
use crate::libs::screenshot::{PlatformScreenProvider, ScreenshotCapture};
use crate::libs::tracker::{Tracker, TrackingControls};
use crate::{msg_bail_anyhow, msg_error, msg_error_anyhow, msg_info, msg_warning};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

const PID_FILE: &str = "punchclock-tracker.pid";
const CAPTURE_SCRATCH_FILE: &str = ".capture.jpg";

/// Live controllers owned by the daemon, driven by the tracker's state
/// transitions.
struct DaemonControls {
    monitor: Monitor,
    capture: ScreenshotCapture,
}

impl TrackingControls for DaemonControls {
    fn start_idle_tracking(&mut self) {
        self.monitor.start();
    }

    fn stop_idle_tracking(&mut self) {
        self.monitor.stop();
    }

    fn start_screenshot_capture(&mut self) {
        self.capture.start();
    }

    fn stop_screenshot_capture(&mut self) {
        self.capture.stop();
    }
}

/// Runs the tracker with signal handling for graceful shutdown.
pub async fn run_with_signal_handling() -> Result<()> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    #[cfg(unix)]
    {
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = signal(SignalKind::terminate()).expect("failed to create SIGTERM handler");
            let mut sigint = signal(SignalKind::interrupt()).expect("failed to create SIGINT handler");

            tokio::select! {
                _ = sigterm.recv() => {
                    msg_info!(Message::TrackerReceivedSigterm);
                }
                _ = sigint.recv() => {
                    msg_info!(Message::TrackerReceivedSigint);
                }
            }

            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(windows)]
    {
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    msg_info!(Message::TrackerReceivedCtrlC);
                }
                Err(e) => {
                    msg_error!(Message::TrackerCtrlCListenFailed(e.to_string()));
                }
            }

            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = shutdown_tx;
        msg_warning!(Message::TrackerSignalHandlingNotSupported);
    }

    match run_tracker(shutdown_rx).await {
        Ok(()) => msg_info!(Message::TrackerExitedNormally),
        Err(e) => msg_error!(Message::TrackerError(e.to_string())),
    }

    // Clean up PID file on exit
    let pid_path = DataStorage::new().get_path(PID_FILE)?;
    if pid_path.exists() {
        let _ = std::fs::remove_file(&pid_path);
    }

    Ok(())
}

/// Builds the tracker with live controllers and drives the event loop.
async fn run_tracker(mut shutdown: oneshot::Receiver<()>) -> Result<()> {
    let config = Config::read()?;
    let Some(server) = config.server.clone() else {
        msg_bail_anyhow!(Message::ServerNotConfigured);
    };
    let Some(user) = auth::current_user()? else {
        msg_bail_anyhow!(Message::NotLoggedIn);
    };

    let monitor_config = config.monitor.unwrap_or_default();
    let capture_config = config.capture.unwrap_or_default();

    let (idle_tx, mut idle_rx) = mpsc::unbounded_channel();
    let (capture_tx, mut capture_rx) = mpsc::unbounded_channel();

    let scratch = DataStorage::new().get_path(CAPTURE_SCRATCH_FILE)?;
    let controls = DaemonControls {
        monitor: Monitor::new(monitor_config, idle_tx),
        capture: ScreenshotCapture::new(&capture_config, Arc::new(PlatformScreenProvider::new(scratch)), capture_tx),
    };

    let store = HttpSessionStore::new(&server.api_url, &user);
    let sink = HttpImageSink::new(&server.api_url, &user);
    let slots = ResumeSlots::new()?;
    let mut tracker = Tracker::new(&user.uid, slots, store, sink, Box::new(controls));

    if !tracker.resume_if_persisted()? {
        tracker.start_work()?;
        let date = chrono::Local::now().date_naive();
        msg_info!(Message::ClockedIn(date.to_string()));
    }

    let mut tick = tokio::time::interval(Duration::from_secs(1));
    // First interval tick completes immediately; elapsed time starts
    // accruing one full second after clock-in.
    tick.tick().await;

    loop {
        tokio::select! {
            _ = tick.tick() => tracker.on_tick()?,
            Some(signal) = idle_rx.recv() => tracker.on_idle_signal(signal)?,
            Some(capture) = capture_rx.recv() => tracker.on_screenshot(capture).await?,
            _ = &mut shutdown => {
                msg_info!(Message::TrackerShuttingDown);
                tracker.on_close();
                break;
            }
        }
    }

    Ok(())
}

/// Spawns the tracker as a detached background process, replacing any
/// tracker that is already running.
pub fn spawn() -> Result<()> {
    let pid_path = DataStorage::new().get_path(PID_FILE)?;

    if pid_path.exists() {
        if let Ok(pid_str) = std::fs::read_to_string(&pid_path) {
            msg_info!(Message::TrackerStoppingExisting(pid_str.trim().to_string()));
            if let Err(e) = stop_internal() {
                msg_warning!(Message::TrackerFailedToStopExisting(e.to_string()));
                let _ = std::fs::remove_file(&pid_path);
            }
            // Give the old process time to clean up
            std::thread::sleep(Duration::from_millis(1000));
        }
    }

    let current_exe = std::env::current_exe().map_err(|_| msg_error_anyhow!(Message::FailedToGetCurrentExecutable))?;

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        let child = unsafe {
            std::process::Command::new(current_exe)
                .args(["start", "--tracker-run"])
                .pre_exec(|| {
                    // Detach from the current session to become a daemon.
                    nix::unistd::setsid()?;
                    Ok(())
                })
                .spawn()?
        };
        let pid = child.id();
        std::fs::write(pid_path, pid.to_string())?;
        msg_info!(Message::TrackerStarted(pid));
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        let child = std::process::Command::new(current_exe)
            .args(["start", "--tracker-run"])
            .creation_flags(CREATE_NO_WINDOW)
            .spawn()?;
        let pid = child.id();
        std::fs::write(pid_path, pid.to_string())?;
        msg_info!(Message::TrackerStarted(pid));
    }

    #[cfg(not(any(unix, windows)))]
    {
        msg_bail_anyhow!(Message::DaemonModeNotSupported);
    }

    Ok(())
}

/// Returns the PID of the running tracker, if the PID file names one.
pub fn running_pid() -> Option<u32> {
    let pid_path = DataStorage::new().get_path(PID_FILE).ok()?;
    let pid_str = std::fs::read_to_string(pid_path).ok()?;
    pid_str.trim().parse().ok()
}

/// Finds and stops the running tracker daemon. Not running is not an error.
pub fn stop() -> Result<()> {
    match stop_internal() {
        Ok(()) => Ok(()),
        Err(e) => {
            if e.to_string().contains("not running") {
                msg_info!(Message::TrackerNotRunning);
                Ok(())
            } else {
                Err(e)
            }
        }
    }
}

fn stop_internal() -> Result<()> {
    let pid_path = DataStorage::new().get_path(PID_FILE)?;
    if !pid_path.exists() {
        msg_bail_anyhow!(Message::TrackerNotRunningPidNotFound);
    }

    let pid_str = std::fs::read_to_string(&pid_path)?;
    let pid: u32 = pid_str.trim().parse().map_err(|_| msg_error_anyhow!(Message::InvalidPidFileContent))?;

    let killed = kill_process(pid)?;

    // Clean up the PID file regardless of whether the process was found.
    std::fs::remove_file(pid_path)?;

    if killed {
        msg_info!(Message::TrackerStopped(pid));
        Ok(())
    } else {
        msg_bail_anyhow!(Message::TrackerFailedToStop(pid));
    }
}

/// Cross-platform process termination
#[cfg(windows)]
fn kill_process(pid: u32) -> Result<bool> {
    use winapi::um::errhandlingapi::GetLastError;
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::{OpenProcess, TerminateProcess};
    use winapi::um::winnt::PROCESS_TERMINATE;

    unsafe {
        let handle = OpenProcess(PROCESS_TERMINATE, 0, pid);
        if handle.is_null() {
            let error = GetLastError();
            if error == 87 {
                // ERROR_INVALID_PARAMETER - process doesn't exist
                return Ok(false);
            }
            msg_bail_anyhow!(Message::FailedToOpenProcess(error));
        }

        let result = TerminateProcess(handle, 0);
        CloseHandle(handle);

        if result == 0 {
            let error = GetLastError();
            msg_bail_anyhow!(Message::FailedToTerminateProcess(error));
        } else {
            // Give the process time to actually terminate
            std::thread::sleep(Duration::from_millis(100));
            Ok(true)
        }
    }
}

#[cfg(unix)]
fn kill_process(pid: u32) -> Result<bool> {
    use std::process::Command;

    // Check if process exists using ps
    let output = Command::new("ps").arg("-p").arg(pid.to_string()).output()?;

    if !output.status.success() {
        // Process doesn't exist
        return Ok(false);
    }

    // Send SIGTERM for graceful shutdown
    Command::new("kill").arg("-TERM").arg(pid.to_string()).output()?;

    // Give the process time to terminate gracefully
    for _ in 0..10 {
        std::thread::sleep(Duration::from_millis(100));

        let check = Command::new("ps").arg("-p").arg(pid.to_string()).output()?;

        if !check.status.success() {
            return Ok(true);
        }
    }

    // Process didn't terminate gracefully, force kill
    Command::new("kill").arg("-9").arg(pid.to_string()).output()?;

    std::thread::sleep(Duration::from_millis(100));
    Ok(true)
}

#[cfg(not(any(unix, windows)))]
fn kill_process(_pid: u32) -> Result<bool> {
    msg_bail_anyhow!(Message::ProcessTerminationNotSupported);
}
