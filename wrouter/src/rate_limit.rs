//! Per-tool sliding-window call limits shared across runs.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use wcommon::{Clock, SystemClock};

const WINDOW: Duration = Duration::from_secs(60);

pub struct RateLimiter {
    per_minute: BTreeMap<String, u32>,
    hits: Mutex<HashMap<String, VecDeque<std::time::Instant>>>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(per_minute: BTreeMap<String, u32>) -> Self {
        Self::with_clock(per_minute, Arc::new(SystemClock))
    }

    pub fn with_clock(per_minute: BTreeMap<String, u32>, clock: Arc<dyn Clock>) -> Self {
        Self {
            per_minute,
            hits: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub fn limit_for(&self, tool_name: &str) -> Option<u32> {
        self.per_minute.get(tool_name).copied()
    }

    /// Records a call if the tool still has room in the current window.
    /// Tools without a configured limit always succeed.
    pub fn try_acquire(&self, tool_name: &str) -> bool {
        let Some(limit) = self.limit_for(tool_name) else {
            return true;
        };

        let now = self.clock.now();
        let mut hits = self.hits.lock().unwrap_or_else(PoisonError::into_inner);
        let window = hits.entry(tool_name.to_string()).or_default();
        while window
            .front()
            .is_some_and(|first| now.duration_since(*first) >= WINDOW)
        {
            window.pop_front();
        }

        if window.len() >= limit as usize {
            return false;
        }
        window.push_back(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use wcommon::ManualClock;

    use super::*;

    fn limiter(clock: Arc<ManualClock>) -> RateLimiter {
        RateLimiter::with_clock(BTreeMap::from([("web.search".to_string(), 2)]), clock)
    }

    #[test]
    fn unlimited_tools_always_pass() {
        let limiter = limiter(Arc::new(ManualClock::new()));
        assert_eq!(limiter.limit_for("web.fetch"), None);
        for _ in 0..100 {
            assert!(limiter.try_acquire("web.fetch"));
        }
    }

    #[test]
    fn window_slides_after_a_minute() {
        let clock = Arc::new(ManualClock::new());
        let limiter = limiter(clock.clone());

        assert!(limiter.try_acquire("web.search"));
        clock.advance(Duration::from_secs(30));
        assert!(limiter.try_acquire("web.search"));
        assert!(!limiter.try_acquire("web.search"));

        clock.advance(Duration::from_secs(30));
        assert!(limiter.try_acquire("web.search"));
        assert!(!limiter.try_acquire("web.search"));
    }
}
