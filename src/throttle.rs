//! # Feature: Reply Throttle
//!
//! Keeps unprompted generated replies from piling up in a busy channel.
//! Each channel gets at most one unprompted reply per cooldown window;
//! direct mentions are not throttled.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Per-channel cooldown backed by DashMap

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct GenerationThrottle {
    last_reply: Arc<DashMap<String, Instant>>,
    cooldown: Duration,
}

impl GenerationThrottle {
    pub fn new(cooldown: Duration) -> Self {
        GenerationThrottle {
            last_reply: Arc::new(DashMap::new()),
            cooldown,
        }
    }

    /// Claim the channel's reply slot. Returns false while the cooldown runs.
    pub fn try_acquire(&self, scope_id: &str) -> bool {
        let now = Instant::now();
        match self.last_reply.entry(scope_id.to_string()) {
            Entry::Occupied(mut entry) => {
                if now.duration_since(*entry.get()) < self.cooldown {
                    false
                } else {
                    entry.insert(now);
                    true
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
        }
    }

    /// Time left before the channel may get another unprompted reply.
    pub fn remaining(&self, scope_id: &str) -> Option<Duration> {
        self.last_reply.get(scope_id).and_then(|last| {
            let elapsed = last.elapsed();
            (elapsed < self.cooldown).then(|| self.cooldown - elapsed)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_first_reply_allowed_then_blocked() {
        let throttle = GenerationThrottle::new(Duration::from_secs(60));

        assert!(throttle.try_acquire("chan"));
        assert!(!throttle.try_acquire("chan"));
        assert!(throttle.remaining("chan").is_some());
    }

    #[test]
    fn test_throttle_is_per_channel() {
        let throttle = GenerationThrottle::new(Duration::from_secs(60));

        assert!(throttle.try_acquire("a"));
        assert!(throttle.try_acquire("b"));
        assert!(!throttle.try_acquire("a"));
        assert!(throttle.remaining("c").is_none());
    }

    #[test]
    fn test_throttle_resets_after_cooldown() {
        let throttle = GenerationThrottle::new(Duration::from_millis(50));

        assert!(throttle.try_acquire("chan"));
        assert!(!throttle.try_acquire("chan"));

        sleep(Duration::from_millis(80));
        assert!(throttle.remaining("chan").is_none());
        assert!(throttle.try_acquire("chan"));
    }

    #[test]
    fn test_clones_share_state() {
        let throttle = GenerationThrottle::new(Duration::from_secs(60));
        let clone = throttle.clone();

        assert!(throttle.try_acquire("chan"));
        assert!(!clone.try_acquire("chan"));
    }

    #[test]
    fn test_zero_cooldown_never_blocks() {
        let throttle = GenerationThrottle::new(Duration::ZERO);
        assert!(throttle.try_acquire("chan"));
        assert!(throttle.try_acquire("chan"));
    }
}
