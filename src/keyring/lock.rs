//! A cross-process, path-scoped advisory lock backed by a sidecar
//! `.lck` file holding the holder's `(pid, tid)`.
//!
//! Acquisition: try to create the sidecar file exclusively. If it
//! already exists, read the `(pid, tid)` it records; a match with the
//! calling thread makes the lock reentrant. Otherwise probe whether
//! that process is still alive (`kill(pid, 0)`); a dead holder's lock
//! is stolen, a live holder's lock is waited out, retried up to ten
//! times. The sleep/retry loop is not starvation-free: concurrent
//! importers on the same keyring may livelock under adversarial
//! scheduling.

use std::{
    fs, io,
    os::unix::fs::OpenOptionsExt,
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use crate::{error::LockError, fileio};

const MAX_ATTEMPTS: u32 = 10;

fn current_pid() -> u64 {
    std::process::id() as u64
}

#[cfg(target_os = "linux")]
fn current_tid() -> u64 {
    unsafe { libc::syscall(libc::SYS_gettid) as u64 }
}

#[cfg(not(target_os = "linux"))]
fn current_tid() -> u64 {
    unsafe { libc::pthread_self() as u64 }
}

fn process_is_alive(pid: u64) -> bool {
    let result = unsafe { libc::kill(pid as libc::pid_t, 0) };
    result == 0 || io::Error::last_os_error().raw_os_error() != Some(libc::ESRCH)
}

/// A lock scoped to one target path. Cheap to construct; the
/// serialising [`Mutex`] is held only for the duration of one
/// [`acquire`](Self::acquire) call, so sequential reentrant acquires on
/// the same thread do not block each other.
pub struct FileLock {
    lock_path: PathBuf,
    semaphore: Mutex<()>,
}

/// A held lock. Dropping it removes the sidecar file.
pub struct FileLockGuard<'a> {
    lock: &'a FileLock,
}

impl FileLock {
    pub fn new(target_path: impl AsRef<Path>) -> Self {
        let mut lock_path = target_path.as_ref().as_os_str().to_owned();
        lock_path.push(".lck");
        Self {
            lock_path: PathBuf::from(lock_path),
            semaphore: Mutex::new(()),
        }
    }

    pub fn acquire(&self) -> Result<FileLockGuard<'_>, LockError> {
        let _serialize = self.semaphore.lock().expect("lock semaphore poisoned");
        let mut attempts = 0;
        loop {
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .mode(0o600)
                .open(&self.lock_path)
            {
                Ok(mut file) => {
                    fileio::write_file_64_bits(&mut file, current_pid())?;
                    fileio::write_file_64_bits(&mut file, current_tid())?;
                    log::trace!("acquired lock {:?}", self.lock_path);
                    return Ok(FileLockGuard { lock: self });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    let (held_pid, held_tid) = self.read_holder()?;
                    if held_pid == current_pid() && held_tid == current_tid() {
                        log::trace!("reentrant lock {:?}", self.lock_path);
                        return Ok(FileLockGuard { lock: self });
                    }
                    if !process_is_alive(held_pid) {
                        log::debug!(
                            "stealing lock {:?} held by dead pid {}",
                            self.lock_path,
                            held_pid
                        );
                        let _ = fs::remove_file(&self.lock_path);
                        continue;
                    }
                    if attempts >= MAX_ATTEMPTS {
                        log::warn!(
                            "giving up on lock {:?} after {} attempts, held by live pid {}",
                            self.lock_path,
                            attempts,
                            held_pid
                        );
                        return Err(LockError::Timeout {
                            path: self.lock_path.display().to_string(),
                            attempts,
                        });
                    }
                    attempts += 1;
                    log::debug!(
                        "lock {:?} held by live pid {}, retry {}/{}",
                        self.lock_path,
                        held_pid,
                        attempts,
                        MAX_ATTEMPTS
                    );
                    std::thread::sleep(Duration::from_secs(1));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn read_holder(&self) -> Result<(u64, u64), LockError> {
        let mut file = fs::File::open(&self.lock_path)?;
        let pid = fileio::read_file_64_bits(&mut file)?;
        let tid = fileio::read_file_64_bits(&mut file)?;
        Ok((pid, tid))
    }

    fn release(&self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

impl Drop for FileLockGuard<'_> {
    fn drop(&mut self) {
        self.lock.release();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reentrant_acquire_on_same_thread_does_not_block() {
        let dir = std::env::temp_dir().join(format!("keyring-lock-test-{}", std::process::id()));
        let lock = FileLock::new(&dir);
        let first = lock.acquire().unwrap();
        let second = lock.acquire().unwrap();
        drop(second);
        drop(first);
    }

    #[test]
    fn stale_lock_is_stolen() {
        let dir = std::env::temp_dir().join(format!("keyring-lock-stale-{}", std::process::id()));
        let lock_path = {
            let mut p = dir.as_os_str().to_owned();
            p.push(".lck");
            PathBuf::from(p)
        };
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .unwrap();
        fileio::write_file_64_bits(&mut file, 999_999).unwrap(); // almost certainly not a live pid
        fileio::write_file_64_bits(&mut file, 1).unwrap();
        drop(file);

        let lock = FileLock::new(&dir);
        let guard = lock.acquire().unwrap();
        drop(guard);
        let _ = fs::remove_file(&lock_path);
    }
}
