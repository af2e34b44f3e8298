use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How long a writer waits for another process before giving up
pub const LOCK_TIMEOUT: Duration = Duration::from_secs(5);
const RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Exclusive advisory lock guarding read-modify-write of one data file.
///
/// The lock lives in a sibling `<file>.lock` that is never deleted: removing
/// it while another process waits on the old inode would let two writers in.
/// flock on Unix; elsewhere acquisition always succeeds.
#[derive(Debug)]
pub struct StoreLock {
    _file: File,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is locked: another daylist process may be writing")]
    Busy { path: PathBuf },
}

impl StoreLock {
    /// Lock `target`, waiting up to `timeout` for other holders
    pub fn acquire(target: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = lock_path(target);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError::Open {
                path: path.clone(),
                source,
            })?;

        let deadline = Instant::now() + timeout;
        while !try_lock(&file) {
            if Instant::now() >= deadline {
                return Err(LockError::Busy { path });
            }
            std::thread::sleep(RETRY_INTERVAL);
        }
        Ok(StoreLock { _file: file })
    }

    pub fn acquire_default(target: &Path) -> Result<Self, LockError> {
        Self::acquire(target, LOCK_TIMEOUT)
    }
}

/// `todos.json` → `todos.json.lock`
pub fn lock_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".lock");
    target.with_file_name(name)
}

// The flock is released when the handle is closed.
#[cfg(unix)]
fn try_lock(file: &File) -> bool {
    use std::os::unix::io::AsRawFd;
    unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) == 0 }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> bool {
    true
}
