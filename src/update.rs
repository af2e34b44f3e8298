use std::fmt;
use std::time::{Duration, Instant};

/// How long a check may stay in `Checking` before giving up silently
pub const CHECKING_TIMEOUT: Duration = Duration::from_secs(10);
/// How long `NotAvailable` / `Error` stay visible
pub const RESULT_DISPLAY: Duration = Duration::from_secs(3);

/// Update-check status shown in the footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateStatus {
    #[default]
    Idle,
    Checking,
    Available,
    NotAvailable,
    Error,
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UpdateStatus::Idle => "idle",
            UpdateStatus::Checking => "checking",
            UpdateStatus::Available => "available",
            UpdateStatus::NotAvailable => "not-available",
            UpdateStatus::Error => "error",
        };
        f.write_str(s)
    }
}

impl UpdateStatus {
    /// Footer text, or `None` when there is nothing to show
    pub fn label(self) -> Option<&'static str> {
        match self {
            UpdateStatus::Idle => None,
            UpdateStatus::Checking => Some("Checking for updates..."),
            UpdateStatus::Available => Some("Update available"),
            UpdateStatus::NotAvailable => Some("Up to date"),
            UpdateStatus::Error => Some("Update check failed"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("update check failed: {0}")]
    Failed(String),
}

/// Where updates come from. Checks are started, then polled from the event
/// loop until they answer.
pub trait UpdateSource {
    fn current_version(&self) -> &str;
    fn start_check(&mut self) -> Result<(), UpdateError>;
    /// `Available`, `NotAvailable` or `Error` once the check has an answer
    fn poll(&mut self) -> Option<UpdateStatus>;
}

/// Source with no update channel. Every check answers "not available".
#[derive(Debug, Default)]
pub struct DisabledUpdates {
    pending: bool,
}

impl UpdateSource for DisabledUpdates {
    fn current_version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn start_check(&mut self) -> Result<(), UpdateError> {
        log::info!("update checks are disabled in this build");
        self.pending = true;
        Ok(())
    }

    fn poll(&mut self) -> Option<UpdateStatus> {
        std::mem::take(&mut self.pending).then_some(UpdateStatus::NotAvailable)
    }
}

/// The status flag plus the time it was last set
#[derive(Debug, Clone, Copy)]
pub struct UpdateTracker {
    status: UpdateStatus,
    since: Instant,
}

impl UpdateTracker {
    pub fn new(now: Instant) -> Self {
        UpdateTracker {
            status: UpdateStatus::Idle,
            since: now,
        }
    }

    pub fn status(&self) -> UpdateStatus {
        self.status
    }

    /// Kick off a check through `source`
    pub fn check<U: UpdateSource + ?Sized>(&mut self, source: &mut U, now: Instant) {
        self.set(UpdateStatus::Checking, now);
        if let Err(e) = source.start_check() {
            log::error!("{}", e);
            self.set(UpdateStatus::Error, now);
        }
    }

    /// Record an answer. Late answers after the check timed out still count.
    pub fn report(&mut self, status: UpdateStatus, now: Instant) {
        log::info!("update status: {}", status);
        self.set(status, now);
    }

    /// Apply the soft timeouts. Returns true if the status changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.since);
        let expired = match self.status {
            UpdateStatus::Checking => elapsed >= CHECKING_TIMEOUT,
            UpdateStatus::NotAvailable | UpdateStatus::Error => elapsed >= RESULT_DISPLAY,
            UpdateStatus::Idle | UpdateStatus::Available => false,
        };
        if expired {
            self.set(UpdateStatus::Idle, now);
        }
        expired
    }

    fn set(&mut self, status: UpdateStatus, now: Instant) {
        self.status = status;
        self.since = now;
    }
}
