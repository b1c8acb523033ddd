//! # Punchclock - desktop time tracking
//!
//! A command-line time-tracking client: clock in, let the tracker watch for
//! idle time and capture periodic screenshots, clock out, and submit the
//! day's session for approval.
//!
//! ## Features
//!
//! - **Idle Tracking**: Suspend, lock, and input-silence signals coalesce
//!   into idle intervals recorded against the session
//! - **Screenshot Capture**: Periodic captures uploaded while working
//! - **Crash Safety**: A durable resume-slot lets a session survive process
//!   restarts without inventing unobserved elapsed time
//! - **Daily Sessions**: At most one submitted session per user per day,
//!   enforced by the store's `userId_date` document key
//!
//! ## Usage
//!
//! ```rust,no_run
//! use punchclock::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
