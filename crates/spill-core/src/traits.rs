//! # Core Traits (Ports)
//!
//! Any storage plugin must implement these traits to be used by the binary.
//! Services depend only on these contracts, so every rule stays testable
//! against the in-memory plugin without a real database.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    AccountStatus, Comment, Like, ModerationAction, Post, Profile, Report, ReportStatus, Role,
};

/// Persistence contract for campus member profiles.
#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn create_profile(&self, profile: Profile) -> anyhow::Result<()>;
    async fn get_profile(&self, id: Uuid) -> anyhow::Result<Option<Profile>>;
    async fn find_by_handle(&self, handle: &str) -> anyhow::Result<Option<Profile>>;
    /// Case-insensitive substring match over handle and display name.
    async fn search_profiles(&self, query: &str, limit: i64) -> anyhow::Result<Vec<Profile>>;
    async fn set_account_status(&self, id: Uuid, status: AccountStatus) -> anyhow::Result<()>;
    /// Role changes come from admin tooling, not from any user-facing flow.
    async fn set_role(&self, id: Uuid, role: Role) -> anyhow::Result<()>;
}

/// Persistence contract for posts and their likes.
#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn create_post(&self, post: Post) -> anyhow::Result<()>;
    async fn get_post(&self, id: Uuid) -> anyhow::Result<Option<Post>>;

    /// Whether `author` already posted about `target` at or after `since`.
    /// Feeds the 30-minute cooldown check.
    async fn has_recent_post_about(
        &self,
        author: Uuid,
        target: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<bool>;

    /// Number of posts by `author` created at or after `since`.
    /// Feeds the daily-cap check.
    async fn count_posts_by_author_since(
        &self,
        author: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<i64>;

    /// Active, unexpired posts for one campus, newest first.
    async fn list_live_posts(
        &self,
        university_id: Uuid,
        now: DateTime<Utc>,
        limit: i64,
    ) -> anyhow::Result<Vec<Post>>;

    async fn mark_post_removed(
        &self,
        id: Uuid,
        removed_by: Uuid,
        reason: &str,
        at: DateTime<Utc>,
    ) -> anyhow::Result<()>;

    // Like operations. Presence of a row = liked.
    async fn like_exists(&self, post_id: Uuid, user_id: Uuid) -> anyhow::Result<bool>;
    async fn insert_like(&self, like: Like) -> anyhow::Result<()>;
    async fn delete_like(&self, post_id: Uuid, user_id: Uuid) -> anyhow::Result<()>;
    /// Which of `post_ids` the user has liked, for feed rendering.
    async fn liked_post_ids(
        &self,
        user_id: Uuid,
        post_ids: &[Uuid],
    ) -> anyhow::Result<HashSet<Uuid>>;
}

/// Persistence contract for comments.
#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn create_comment(&self, comment: Comment) -> anyhow::Result<()>;
    async fn get_comment(&self, id: Uuid) -> anyhow::Result<Option<Comment>>;
    /// Active comments on a post in ascending creation order, the order the
    /// anon-number assignment is defined over.
    async fn list_active_comments(&self, post_id: Uuid) -> anyhow::Result<Vec<Comment>>;
    /// Number of comments by `author` on `post_id` at or after `since`.
    /// Feeds the hourly comment cap.
    async fn count_by_author_on_post_since(
        &self,
        post_id: Uuid,
        author: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<i64>;
    async fn mark_comment_removed(
        &self,
        id: Uuid,
        removed_by: Uuid,
        reason: &str,
        at: DateTime<Utc>,
    ) -> anyhow::Result<()>;
}

/// Persistence contract for reports and the moderation audit log.
#[async_trait]
pub trait ReportRepo: Send + Sync {
    async fn create_report(&self, report: Report) -> anyhow::Result<()>;
    async fn get_report(&self, id: Uuid) -> anyhow::Result<Option<Report>>;
    /// Number of reports filed by `reporter` at or after `since`.
    async fn count_by_reporter_since(
        &self,
        reporter: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<i64>;
    /// Reports in one status, newest first.
    async fn list_reports(&self, status: ReportStatus, limit: i64) -> anyhow::Result<Vec<Report>>;
    async fn set_report_status(&self, id: Uuid, status: ReportStatus) -> anyhow::Result<()>;
    async fn log_action(&self, action: ModerationAction) -> anyhow::Result<()>;
}
