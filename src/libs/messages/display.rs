//! Rendering of `Message` variants to terminal text.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            // === AUTH MESSAGES ===
            Message::NotLoggedIn => "Not logged in. Run 'punchclock login' first".to_string(),
            Message::LoggedIn(email) => format!("Logged in as {}", email),
            Message::LoggedOut => "Logged out".to_string(),
            Message::LoginFailed(reason) => format!("Login failed: {}", reason),
            Message::PromptEmail => "Email".to_string(),
            Message::PromptPassword => "Password".to_string(),

            // === SESSION MESSAGES ===
            Message::ClockedIn(date) => format!("Clocked in for {}", date),
            Message::ClockedOut => "Clocked out. Run 'punchclock submit' to send the session or 'punchclock cancel' to discard it".to_string(),
            Message::AlreadyWorking => "A session is already being tracked".to_string(),
            Message::AlreadySubmittedToday(date) => format!("A session for {} has already been submitted", date),
            Message::NoActiveSession => "No active session".to_string(),
            Message::AlreadyStopped => "Session already stopped. Run 'punchclock submit' or 'punchclock cancel'".to_string(),
            Message::StillWorking => "Session is still being tracked. Run 'punchclock stop' first".to_string(),
            Message::NothingToSubmit => "No stopped session awaiting submission".to_string(),
            Message::SessionCancelled => "Session cancelled".to_string(),
            Message::SessionSubmitted(date) => format!("Session for {} submitted for approval", date),
            Message::SubmitFailed(reason) => format!("Failed to submit session: {}", reason),
            Message::SessionResumed(date, elapsed) => format!("Resumed session for {} at {} seconds elapsed", date, elapsed),
            Message::SessionDeleted(date) => format!("Session for {} deleted", date),
            Message::SessionNotFoundForDate(date) => format!("No session found for {}", date),
            Message::NoSessionsFound => "No sessions found".to_string(),
            Message::PromptLessHoursComment => "Comment (why fewer hours than expected?)".to_string(),

            // === TRACKER STATE MESSAGES ===
            Message::StaleSlotDiscarded(date) => format!("Discarding saved session from {}", date),
            Message::SlotCorrupt(err) => format!("Saved session state is unreadable, starting fresh: {}", err),
            Message::IdleStarted(at) => format!("Idle started at {}", at),
            Message::IdleEnded(at, minutes) => format!("Idle ended at {} ({} min)", at, minutes),

            // === SCREENSHOT MESSAGES ===
            Message::NoCaptureSourceFound => "No capturable screen source found, skipping screenshot".to_string(),
            Message::ScreenshotUploadFailed(reason) => format!("Screenshot upload failed, dropping capture: {}", reason),
            Message::CaptureFailed(reason) => format!("Screen capture failed: {}", reason),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved".to_string(),
            Message::ConfigModuleMonitor => "Monitor configuration".to_string(),
            Message::ConfigModuleCapture => "Screenshot capture configuration".to_string(),
            Message::ConfigModuleServer => "Server configuration".to_string(),
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptIdleThreshold => "Idle threshold in seconds".to_string(),
            Message::PromptPollInterval => "Poll interval in milliseconds".to_string(),
            Message::PromptCaptureInterval => "Screenshot interval in minutes".to_string(),
            Message::PromptServerApiUrl => "API base URL".to_string(),

            // === DAEMON MESSAGES ===
            Message::TrackerStarted(pid) => format!("Tracker started with PID: {}", pid),
            Message::TrackerStopped(pid) => format!("Tracker stopped (PID: {})", pid),
            Message::TrackerNotRunning => "Tracker is not running".to_string(),
            Message::TrackerNotRunningPidNotFound => "Tracker is not running (PID file not found)".to_string(),
            Message::TrackerStoppingExisting(pid) => format!("Stopping existing tracker (PID: {})", pid),
            Message::TrackerFailedToStopExisting(err) => format!("Failed to stop existing tracker: {}", err),
            Message::TrackerFailedToStop(pid) => format!("Failed to stop tracker process {}", pid),
            Message::TrackerReceivedSigterm => "Received SIGTERM, shutting down".to_string(),
            Message::TrackerReceivedSigint => "Received SIGINT, shutting down".to_string(),
            Message::TrackerReceivedCtrlC => "Received Ctrl+C, shutting down".to_string(),
            Message::TrackerCtrlCListenFailed(err) => format!("Failed to listen for Ctrl+C: {}", err),
            Message::TrackerShuttingDown => "Shutting down tracker".to_string(),
            Message::TrackerExitedNormally => "Tracker exited normally".to_string(),
            Message::TrackerError(err) => format!("Tracker error: {}", err),
            Message::TrackerSignalHandlingNotSupported => "Signal handling not supported on this platform".to_string(),
            Message::InvalidPidFileContent => "PID file contains invalid data".to_string(),
            Message::FailedToGetCurrentExecutable => "Failed to determine current executable path".to_string(),
            Message::FailedToOpenProcess(code) => format!("Failed to open process (error {})", code),
            Message::FailedToTerminateProcess(code) => format!("Failed to terminate process (error {})", code),
            Message::ProcessTerminationNotSupported => "Process termination not supported on this platform".to_string(),
            Message::DaemonModeNotSupported => "Background mode not supported on this platform".to_string(),

            // === GENERIC ERROR MESSAGES ===
            Message::ServerNotConfigured => "Server is not configured. Run 'punchclock init' first".to_string(),
        };
        write!(f, "{}", text)
    }
}
