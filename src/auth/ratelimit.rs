//! Login attempt limiting, keyed by client IP.
//!
//! The store is injected behind a trait so the in-memory map can be swapped
//! for an external key-expiring cache without touching the handlers. Counters
//! live in a fixed window and are cleared by a successful login.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const MAX_ATTEMPTS: u32 = 5;
pub const WINDOW: Duration = Duration::from_secs(15 * 60);

pub trait AttemptStore: Send + Sync {
    /// Whether another attempt from this key is allowed right now.
    fn check(&self, key: &str) -> bool;
    fn record_failure(&self, key: &str);
    fn clear(&self, key: &str);
}

struct Attempt {
    count: u32,
    reset_at: Instant,
}

pub struct InMemoryAttemptStore {
    max_attempts: u32,
    window: Duration,
    attempts: Mutex<HashMap<String, Attempt>>,
}

impl InMemoryAttemptStore {
    pub fn new() -> Self {
        Self::with_limits(MAX_ATTEMPTS, WINDOW)
    }

    pub fn with_limits(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Attempt>> {
        // A poisoned lock only means another login thread panicked; the
        // counters are still usable.
        self.attempts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for InMemoryAttemptStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AttemptStore for InMemoryAttemptStore {
    fn check(&self, key: &str) -> bool {
        let mut attempts = self.lock();
        match attempts.get(key) {
            Some(a) if Instant::now() >= a.reset_at => {
                // expired window, swept on access
                attempts.remove(key);
                true
            }
            Some(a) => a.count < self.max_attempts,
            None => true,
        }
    }

    fn record_failure(&self, key: &str) {
        let mut attempts = self.lock();
        let now = Instant::now();
        let entry = attempts.entry(key.to_string()).or_insert(Attempt {
            count: 0,
            reset_at: now + self.window,
        });
        if now >= entry.reset_at {
            entry.count = 0;
            entry.reset_at = now + self.window;
        }
        entry.count += 1;
    }

    fn clear(&self, key: &str) {
        self.lock().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixth_attempt_in_window_is_blocked() {
        let store = InMemoryAttemptStore::new();
        for _ in 0..5 {
            assert!(store.check("10.0.0.1"));
            store.record_failure("10.0.0.1");
        }
        assert!(!store.check("10.0.0.1"));
    }

    #[test]
    fn successful_login_clears_the_counter() {
        let store = InMemoryAttemptStore::new();
        for _ in 0..5 {
            store.record_failure("10.0.0.1");
        }
        assert!(!store.check("10.0.0.1"));
        store.clear("10.0.0.1");
        assert!(store.check("10.0.0.1"));
    }

    #[test]
    fn keys_are_independent() {
        let store = InMemoryAttemptStore::new();
        for _ in 0..5 {
            store.record_failure("10.0.0.1");
        }
        assert!(!store.check("10.0.0.1"));
        assert!(store.check("10.0.0.2"));
    }

    #[test]
    fn window_expiry_resets_the_counter() {
        let store = InMemoryAttemptStore::with_limits(5, Duration::from_millis(20));
        for _ in 0..5 {
            store.record_failure("10.0.0.1");
        }
        assert!(!store.check("10.0.0.1"));
        std::thread::sleep(Duration::from_millis(40));
        assert!(store.check("10.0.0.1"));
    }
}
