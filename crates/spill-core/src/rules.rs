//! # Rules Engine
//!
//! The pure decision logic of Spill: trending scores, per-thread anonymous
//! identity numbering, and cooldown/rate-limit checks. Every function here
//! is synchronous, side-effect-free, and total over its documented inputs;
//! callers fetch whatever counts or rows the decision needs and pass them in,
//! which keeps this module directly unit-testable without a datastore.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Minimum gap between two posts by the same author about the same target.
pub const POST_COOLDOWN_MINUTES: i64 = 30;
/// Maximum posts per author in any trailing 24-hour window.
pub const DAILY_POST_CAP: i64 = 3;
/// Maximum comments per author on one post in any trailing hour.
pub const COMMENT_HOURLY_CAP: i64 = 10;
/// Maximum reports per reporter in any trailing 24-hour window.
pub const REPORT_DAILY_CAP: i64 = 10;

/// Comments count for less than likes in the trending formula.
const COMMENT_WEIGHT: f64 = 0.3;
/// Exponential decay time constant, in hours (half-life ≈ 16.6h).
const DECAY_HOURS: f64 = 24.0;

/// Decay-weighted popularity score used to rank the trending feed.
///
/// `score = (likes * 1.0 + comments * 0.3) * exp(-age_hours / 24)`
///
/// At age zero the score is the raw weighted sum; it decays toward zero and
/// is never negative. Ranking ties are left to the caller, which must use a
/// stable sort so equal scores keep their fetch order.
pub fn trending_score(
    like_count: i64,
    comment_count: i64,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> f64 {
    let age_secs = (now - created_at).num_seconds().max(0) as f64;
    let age_hours = age_secs / 3600.0;
    let weighted = like_count as f64 + comment_count as f64 * COMMENT_WEIGHT;
    weighted * (-age_hours / DECAY_HOURS).exp()
}

/// Assigns "Anon N" numbers for one rendering of a comment thread.
///
/// The post author is always Anon 1, whether or not they ever comment.
/// Commenters are numbered 2, 3, … in order of their first comment;
/// `comment_authors` must therefore be in ascending creation order.
/// The mapping is recomputed per page view and may renumber across requests
/// if comment visibility changes; it is never persisted.
pub fn assign_anon_numbers(
    post_author: Uuid,
    comment_authors: impl IntoIterator<Item = Uuid>,
) -> HashMap<Uuid, u32> {
    let mut numbers = HashMap::new();
    let mut next = 1u32;
    numbers.insert(post_author, next);
    next += 1;
    for author in comment_authors {
        if let std::collections::hash_map::Entry::Vacant(e) = numbers.entry(author) {
            e.insert(next);
            next += 1;
        }
    }
    numbers
}

/// Outcome of a cooldown or rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    PostCooldown,
    DailyPostCap,
    CommentRateLimit,
    ReportRateLimit,
}

impl DenyReason {
    /// User-facing explanation for the denial.
    pub fn message(self) -> &'static str {
        match self {
            DenyReason::PostCooldown => {
                "You can only post about this person once every 30 minutes"
            }
            DenyReason::DailyPostCap => "You can only create 3 posts per day",
            DenyReason::CommentRateLimit => "Too many comments. Try again later.",
            DenyReason::ReportRateLimit => "Too many reports today. Try again tomorrow.",
        }
    }
}

/// Per-target cooldown: deny when the author already posted about this
/// target within the last [`POST_COOLDOWN_MINUTES`]. Callers must evaluate
/// this before [`check_daily_post_cap`] so the cooldown message wins.
pub fn check_post_cooldown(recent_post_exists: bool) -> Decision {
    if recent_post_exists {
        Decision::Deny(DenyReason::PostCooldown)
    } else {
        Decision::Allow
    }
}

/// Daily cap: deny once the author has [`DAILY_POST_CAP`] posts in the
/// trailing 24 hours.
pub fn check_daily_post_cap(count_last_24h: i64) -> Decision {
    if count_last_24h >= DAILY_POST_CAP {
        Decision::Deny(DenyReason::DailyPostCap)
    } else {
        Decision::Allow
    }
}

/// Per-post comment cap: deny once the author has [`COMMENT_HOURLY_CAP`]
/// comments on the post in the trailing hour.
pub fn check_comment_rate_limit(count_last_hour: i64) -> Decision {
    if count_last_hour >= COMMENT_HOURLY_CAP {
        Decision::Deny(DenyReason::CommentRateLimit)
    } else {
        Decision::Allow
    }
}

/// Report cap: deny once the reporter has [`REPORT_DAILY_CAP`] reports in
/// the trailing 24 hours.
pub fn check_report_rate_limit(count_last_24h: i64) -> Decision {
    if count_last_24h >= REPORT_DAILY_CAP {
        Decision::Deny(DenyReason::ReportRateLimit)
    } else {
        Decision::Allow
    }
}
