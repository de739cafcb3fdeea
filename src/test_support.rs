//! Helpers for tests that touch process-wide environment variables.
//! One lock serializes them across modules; guards restore prior values.

use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Serialize every env-mutating test in the binary. A panicking holder must
/// not wedge the remaining tests, so poisoning is ignored.
pub fn env_lock() -> MutexGuard<'static, ()> {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Replace a variable with `val` (or unset it for `None`), returning what
/// was there before.
fn swap(key: &str, val: Option<OsString>) -> Option<OsString> {
    let old = std::env::var_os(key);
    unsafe {
        match val {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }
    old
}

/// Scoped env override; the previous value comes back on drop.
pub struct EnvGuard {
    key: &'static str,
    old: Option<OsString>,
}

impl EnvGuard {
    pub fn set(key: &'static str, val: &str) -> Self {
        let old = swap(key, Some(OsString::from(val)));
        Self { key, old }
    }

    pub fn remove(key: &'static str) -> Self {
        let old = swap(key, None);
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        swap(self.key, self.old.take());
    }
}
