//! Central catalog of user-facing messages.
//!
//! Every string shown to the user lives here as a `Message` variant so the
//! text is defined in exactly one place. The `Display` implementation in
//! `display.rs` renders variants to terminal output; the `msg_*!` macros in
//! `macros.rs` handle routing between plain console output and tracing.

#[derive(Debug, Clone)]
pub enum Message {
    // === AUTH MESSAGES ===
    NotLoggedIn,
    LoggedIn(String),     // email
    LoggedOut,
    LoginFailed(String),  // reason
    PromptEmail,
    PromptPassword,

    // === SESSION MESSAGES ===
    ClockedIn(String),            // date
    ClockedOut,
    AlreadyWorking,
    AlreadySubmittedToday(String), // date
    NoActiveSession,
    AlreadyStopped,
    StillWorking,
    NothingToSubmit,
    SessionCancelled,
    SessionSubmitted(String), // date
    SubmitFailed(String),     // reason
    SessionResumed(String, u64), // date, elapsed seconds
    SessionDeleted(String),      // date
    SessionNotFoundForDate(String),
    NoSessionsFound,
    PromptLessHoursComment,

    // === TRACKER STATE MESSAGES ===
    StaleSlotDiscarded(String), // date
    SlotCorrupt(String),        // parse error
    IdleStarted(String),        // timestamp
    IdleEnded(String, i64),     // timestamp, minutes

    // === SCREENSHOT MESSAGES ===
    NoCaptureSourceFound,
    ScreenshotUploadFailed(String), // reason
    CaptureFailed(String),          // reason

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleMonitor,
    ConfigModuleCapture,
    ConfigModuleServer,
    PromptSelectModules,
    PromptIdleThreshold,
    PromptPollInterval,
    PromptCaptureInterval,
    PromptServerApiUrl,

    // === DAEMON MESSAGES ===
    TrackerStarted(u32),  // pid
    TrackerStopped(u32),  // pid
    TrackerNotRunning,
    TrackerNotRunningPidNotFound,
    TrackerStoppingExisting(String), // pid
    TrackerFailedToStopExisting(String),
    TrackerFailedToStop(u32),
    TrackerReceivedSigterm,
    TrackerReceivedSigint,
    TrackerReceivedCtrlC,
    TrackerCtrlCListenFailed(String),
    TrackerShuttingDown,
    TrackerExitedNormally,
    TrackerError(String),
    TrackerSignalHandlingNotSupported,
    InvalidPidFileContent,
    FailedToGetCurrentExecutable,
    FailedToOpenProcess(u32),      // os error
    FailedToTerminateProcess(u32), // os error
    ProcessTerminationNotSupported,
    DaemonModeNotSupported,

    // === GENERIC ERROR MESSAGES ===
    ServerNotConfigured,
}
