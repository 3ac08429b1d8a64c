use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::ThrottleConfig;

/// Per-email login brute force limiter.
///
/// Keys are the email exactly as accounts are matched, so each account has
/// its own budget.
pub struct LoginThrottle {
    /// email -> (attempts, window_start)
    entries: DashMap<String, (u32, Instant)>,
    max_failures: u32,
    window: Duration,
}

impl LoginThrottle {
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            entries: DashMap::new(),
            max_failures: config.max_failures,
            window: config.window,
        }
    }

    /// Reserve one attempt for `email`. Returns the seconds left in the window
    /// when the budget is spent.
    ///
    /// Test and increment happen under one shard lock. A successful login
    /// calls [`reset`](Self::reset); an attempt that never reached the
    /// password check hands its slot back with [`release`](Self::release).
    pub fn check(&self, email: &str) -> Result<(), u64> {
        let now = Instant::now();
        let mut entry = self.entries.entry(email.to_string()).or_insert((0, now));
        let (count, start) = entry.value_mut();

        if now.duration_since(*start) > self.window {
            *count = 1;
            *start = now;
            return Ok(());
        }

        if *count >= self.max_failures {
            let elapsed = now.duration_since(*start).as_secs();
            return Err(self.window.as_secs().saturating_sub(elapsed));
        }

        *count += 1;
        Ok(())
    }

    /// Give back an attempt reserved by [`check`](Self::check).
    pub fn release(&self, email: &str) {
        if let Some(mut entry) = self.entries.get_mut(email) {
            let (count, _) = entry.value_mut();
            *count = count.saturating_sub(1);
        }
    }

    pub fn reset(&self, email: &str) {
        self.entries.remove(email);
    }

    /// Drop windows that have already lapsed.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.entries
            .retain(|_, (_, start)| now.duration_since(*start) <= self.window);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn throttle(max_failures: u32, window: Duration) -> LoginThrottle {
        LoginThrottle::new(ThrottleConfig {
            max_failures,
            window,
        })
    }

    #[test]
    fn blocks_after_max_attempts() {
        let t = throttle(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert!(t.check("ana@x.com").is_ok());
        }
        let retry = t.check("ana@x.com").unwrap_err();
        assert!(retry <= 60);
    }

    #[test]
    fn concurrent_checks_share_one_budget() {
        let t = Arc::new(throttle(2, Duration::from_secs(60)));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let t = t.clone();
                std::thread::spawn(move || t.check("ana@x.com").is_ok())
            })
            .collect();
        let allowed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(allowed, 2);
    }

    #[test]
    fn keys_are_exact() {
        let t = throttle(1, Duration::from_secs(60));
        assert!(t.check("Ana@X.com").is_ok());
        assert!(t.check("Ana@X.com").is_err());
        assert!(t.check("ana@x.com").is_ok());
    }

    #[test]
    fn release_returns_the_slot() {
        let t = throttle(1, Duration::from_secs(60));
        assert!(t.check("ana@x.com").is_ok());
        t.release("ana@x.com");
        assert!(t.check("ana@x.com").is_ok());
    }

    #[test]
    fn reset_clears_budget() {
        let t = throttle(1, Duration::from_secs(60));
        assert!(t.check("ana@x.com").is_ok());
        t.reset("ana@x.com");
        assert!(t.check("ana@x.com").is_ok());
    }

    #[test]
    fn lapsed_window_allows_again() {
        let t = throttle(1, Duration::ZERO);
        assert!(t.check("ana@x.com").is_ok());
        std::thread::sleep(Duration::from_millis(5));
        assert!(t.check("ana@x.com").is_ok());
        std::thread::sleep(Duration::from_millis(5));
        t.cleanup();
        assert!(t.entries.is_empty());
    }
}
