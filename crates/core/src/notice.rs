//! Transient user-facing notices with automatic expiry.
//!
//! Controllers post a notice after an operation succeeds or fails; views
//! render whatever is active and the center drops notices once their
//! lifetime elapses. Expiry is driven by the `now` the caller passes in,
//! so tests advance time without sleeping.

use std::time::{Duration, Instant};

use uuid::Uuid;

/// Default notice lifetime before it stops rendering.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

/// Opaque handle for dismissing a specific notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeId(Uuid);

impl NoticeId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for NoticeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Visual weight of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// One message posted to the user.
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: NoticeId,
    pub level: NoticeLevel,
    pub message: String,
    pub posted_at: Instant,
    pub ttl: Duration,
}

impl Notice {
    /// Whether the notice has outlived its lifetime as of `now`.
    #[must_use]
    pub fn expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.posted_at) >= self.ttl
    }
}

/// Holds the notices currently visible to the user.
#[derive(Debug, Clone)]
pub struct NoticeCenter {
    notices: Vec<Notice>,
    default_ttl: Duration,
}

impl Default for NoticeCenter {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl NoticeCenter {
    /// Creates a center whose notices expire after `default_ttl`.
    #[must_use]
    pub const fn new(default_ttl: Duration) -> Self {
        Self {
            notices: Vec::new(),
            default_ttl,
        }
    }

    /// Posts a notice timestamped `now`.
    pub fn push_at(
        &mut self,
        level: NoticeLevel,
        message: impl Into<String>,
        now: Instant,
    ) -> NoticeId {
        let id = NoticeId::new();
        self.notices.push(Notice {
            id,
            level,
            message: message.into(),
            posted_at: now,
            ttl: self.default_ttl,
        });
        id
    }

    /// Posts a notice timestamped with the current instant.
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) -> NoticeId {
        self.push_at(level, message, Instant::now())
    }

    pub fn info(&mut self, message: impl Into<String>) -> NoticeId {
        self.push(NoticeLevel::Info, message)
    }

    pub fn success(&mut self, message: impl Into<String>) -> NoticeId {
        self.push(NoticeLevel::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> NoticeId {
        self.push(NoticeLevel::Error, message)
    }

    /// Notices still alive as of `now`, oldest first.
    pub fn active(&self, now: Instant) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(move |n| !n.expired_at(now))
    }

    /// Drops every notice that has expired as of `now`.
    pub fn sweep(&mut self, now: Instant) {
        self.notices.retain(|n| !n.expired_at(now));
    }

    /// Removes a notice early. Returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: NoticeId) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() < before
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_is_active_until_ttl_elapses() {
        let mut center = NoticeCenter::default();
        let now = Instant::now();
        center.push_at(NoticeLevel::Success, "item added", now);

        assert_eq!(center.active(now).count(), 1);
        let just_before = now + DEFAULT_TTL - Duration::from_millis(1);
        assert_eq!(center.active(just_before).count(), 1);
        let at_ttl = now + DEFAULT_TTL;
        assert_eq!(center.active(at_ttl).count(), 0);
    }

    #[test]
    fn test_sweep_drops_only_expired_notices() {
        let mut center = NoticeCenter::new(Duration::from_secs(3));
        let now = Instant::now();
        center.push_at(NoticeLevel::Info, "old", now);
        center.push_at(NoticeLevel::Error, "fresh", now + Duration::from_secs(2));

        center.sweep(now + Duration::from_secs(4));
        let remaining: Vec<_> = center
            .active(now + Duration::from_secs(4))
            .map(|n| n.message.as_str())
            .collect();
        assert_eq!(remaining, ["fresh"]);
    }

    #[test]
    fn test_dismiss_removes_by_id() {
        let mut center = NoticeCenter::default();
        let now = Instant::now();
        let first = center.push_at(NoticeLevel::Info, "a", now);
        center.push_at(NoticeLevel::Info, "b", now);

        assert!(center.dismiss(first));
        assert!(!center.dismiss(first));
        let remaining: Vec<_> = center.active(now).map(|n| n.message.as_str()).collect();
        assert_eq!(remaining, ["b"]);
    }

    #[test]
    fn test_clock_earlier_than_post_keeps_notice_active() {
        let mut center = NoticeCenter::default();
        let now = Instant::now();
        center.push_at(NoticeLevel::Info, "future", now + Duration::from_secs(10));
        assert_eq!(center.active(now).count(), 1);
    }
}
