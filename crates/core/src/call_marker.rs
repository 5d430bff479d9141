//! Post-call follow-up marker.
//!
//! When a customer taps "call" on a worker's page a marker is stored in
//! their session. The next check within five minutes fires a follow-up
//! prompt exactly once.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::WorkerId;

/// Age in seconds after which a marker is discarded.
pub const CALL_MARKER_TTL_SECS: i64 = 5 * 60;

/// A recorded call attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallMarker {
    pub started_at: DateTime<Utc>,
    pub triggered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<WorkerId>,
}

/// Result of checking a stored marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmCheck {
    /// Show the alarm now and store the returned marker.
    Trigger(CallMarker),
    /// Already shown; keep the marker as is.
    AlreadyTriggered,
    /// Too old; remove it.
    Stale,
}

impl CallMarker {
    /// A fresh, untriggered marker.
    #[must_use]
    pub const fn start(worker_id: Option<WorkerId>, now: DateTime<Utc>) -> Self {
        Self {
            started_at: now,
            triggered: false,
            worker_id,
        }
    }

    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now - self.started_at > Duration::seconds(CALL_MARKER_TTL_SECS)
    }

    /// Decide whether the follow-up should be shown.
    #[must_use]
    pub fn check(&self, now: DateTime<Utc>) -> AlarmCheck {
        if self.is_stale(now) {
            AlarmCheck::Stale
        } else if self.triggered {
            AlarmCheck::AlreadyTriggered
        } else {
            AlarmCheck::Trigger(Self {
                triggered: true,
                ..self.clone()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triggers_once() {
        let now = Utc::now();
        let marker = CallMarker::start(Some(WorkerId::new("worker-1")), now);

        let AlarmCheck::Trigger(fired) = marker.check(now + Duration::seconds(30)) else {
            panic!("expected the alarm to trigger");
        };
        assert!(fired.triggered);
        assert_eq!(fired.check(now + Duration::seconds(60)), AlarmCheck::AlreadyTriggered);
    }

    #[test]
    fn test_stale_after_five_minutes() {
        let now = Utc::now();
        let marker = CallMarker::start(None, now);
        assert!(!marker.is_stale(now + Duration::minutes(5)));
        assert_eq!(
            marker.check(now + Duration::minutes(5) + Duration::seconds(1)),
            AlarmCheck::Stale
        );
    }
}
