//! # Domain Models
//!
//! These structs represent the core entities of Spill, a campus-scoped
//! anonymous posting app. We use UUID v7 for time-ordered, globally unique
//! identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of a post subject (trimmed), in characters.
pub const SUBJECT_MAX_LEN: usize = 200;
/// Maximum length of a post body (trimmed), in characters.
pub const BODY_MAX_LEN: usize = 1000;
/// Maximum length of a comment body (trimmed), in characters.
pub const COMMENT_MAX_LEN: usize = 300;
/// Posts expire this many hours after creation.
pub const POST_LIFETIME_HOURS: i64 = 48;

/// A verified member of a campus. One profile per university email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    /// Every row in the system is scoped to one university.
    pub university_id: Uuid,
    pub email: String,
    /// Public handle, `[A-Za-z0-9_]{3,20}`
    pub handle: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Member,
    Moderator,
    Admin,
}

impl Role {
    /// Moderators and admins may act on the moderation queue.
    pub fn can_moderate(self) -> bool {
        matches!(self, Role::Moderator | Role::Admin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Suspended,
}

/// A time-limited post about another user on the same campus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub university_id: Uuid,
    /// Hidden from readers; only ever surfaced as "Anon 1".
    pub author_user_id: Uuid,
    /// The person the post is about.
    pub target_user_id: Uuid,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    /// Always `created_at + POST_LIFETIME_HOURS`.
    pub expires_at: DateTime<Utc>,
    /// Recomputed from the likes table on read, never stored.
    pub like_count: i64,
    /// Recomputed from active comments on read, never stored.
    pub comment_count: i64,
    pub status: ContentStatus,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
    pub removal_reason: Option<String>,
}

/// Stored status of a post or comment. Removal is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Active,
    Removed,
}

/// What a reader may see of a post right now. Derived, never stored:
/// removal wins, then expiry is a pure function of the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Active,
    Expired,
    Removed,
}

impl Post {
    pub fn visibility(&self, now: DateTime<Utc>) -> Visibility {
        match self.status {
            ContentStatus::Removed => Visibility::Removed,
            ContentStatus::Active if self.expires_at <= now => Visibility::Expired,
            ContentStatus::Active => Visibility::Active,
        }
    }

    /// Active and unexpired: may be listed, liked, and commented on.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.visibility(now) == Visibility::Active
    }
}

/// An anonymous comment on a post. The display identity ("Anon N") is
/// derived per rendering pass, not stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub university_id: Uuid,
    pub author_user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub status: ContentStatus,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
    pub removal_reason: Option<String>,
}

/// Presence of a row = the user likes the post. Toggled by insert/delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A user-filed complaint about a post, comment, or user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub reporter_user_id: Uuid,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub reason: ReportReason,
    pub details: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Post,
    Comment,
    User,
    /// Only appears in the moderation audit log (report dismissals).
    Report,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Post => "post",
            EntityType::Comment => "comment",
            EntityType::User => "user",
            EntityType::Report => "report",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    Harassment,
    HateSpeech,
    FalseInfo,
    Spam,
    PrivacyViolation,
    Other,
}

/// Report lifecycle: open until a moderator reviews or dismisses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Open,
    Reviewed,
    Dismissed,
}

/// Audit log entry for every moderator decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationAction {
    pub id: Uuid,
    pub moderator_user_id: Uuid,
    pub action_type: ModActionType,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModActionType {
    RemovePost,
    RemoveComment,
    SuspendUser,
    DismissReport,
}

/// Checks a candidate handle against the allowed alphabet and length.
pub fn is_valid_handle(handle: &str) -> bool {
    (3..=20).contains(&handle.len())
        && handle.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
