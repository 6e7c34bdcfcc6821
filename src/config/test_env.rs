//! Process-environment helpers shared by tests that load configuration

use std::sync::{Mutex, MutexGuard};

// Tests touching process environment variables must not interleave
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serialises access to the environment and restores touched variables on drop
pub(crate) struct EnvGuard {
    vars_to_restore: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Take the shared lock and remove every `NOTIFIER_*` variable
    pub(crate) fn scrubbed() -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut guard = Self {
            vars_to_restore: Vec::new(),
            _lock: lock,
        };

        let keys: Vec<String> = std::env::vars()
            .map(|(key, _)| key)
            .filter(|key| key.starts_with("NOTIFIER_"))
            .collect();
        for key in keys {
            guard.remove(&key);
        }
        guard
    }

    pub(crate) fn set(&mut self, key: &str, value: &str) {
        self.vars_to_restore
            .push((key.to_string(), std::env::var(key).ok()));
        unsafe {
            std::env::set_var(key, value);
        }
    }

    pub(crate) fn remove(&mut self, key: &str) {
        self.vars_to_restore
            .push((key.to_string(), std::env::var(key).ok()));
        unsafe {
            std::env::remove_var(key);
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, original_value) in self.vars_to_restore.iter().rev() {
            unsafe {
                match original_value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
