//! # spill-db-sqlite
//!
//! SQLite implementation of the storage ports. This module owns the data
//! mapping between the relational model and the `spill-core` domain models.
//!
//! Like and comment counts are recomputed with correlated subqueries on
//! every read; the likes and comments tables are the source of truth and no
//! denormalized counter column exists.

use std::collections::HashSet;
use std::str::FromStr;

use anyhow::bail;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use spill_core::models::{
    AccountStatus, Comment, ContentStatus, EntityType, Like, ModerationAction, Post, Profile,
    Report, ReportReason, ReportStatus, Role,
};
use spill_core::traits::{CommentRepo, PostRepo, ProfileRepo, ReportRepo};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS profiles (
    id            BLOB PRIMARY KEY,
    university_id BLOB NOT NULL,
    email         TEXT NOT NULL,
    handle        TEXT NOT NULL UNIQUE COLLATE NOCASE,
    display_name  TEXT,
    role          TEXT NOT NULL,
    status        TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS posts (
    id             BLOB PRIMARY KEY,
    university_id  BLOB NOT NULL,
    author_user_id BLOB NOT NULL,
    target_user_id BLOB NOT NULL,
    subject        TEXT NOT NULL,
    body           TEXT NOT NULL,
    created_at     TEXT NOT NULL,
    expires_at     TEXT NOT NULL,
    status         TEXT NOT NULL,
    removed_at     TEXT,
    removed_by     BLOB,
    removal_reason TEXT
);
CREATE INDEX IF NOT EXISTS idx_posts_feed
    ON posts (university_id, status, expires_at);
CREATE INDEX IF NOT EXISTS idx_posts_author
    ON posts (author_user_id, created_at);

CREATE TABLE IF NOT EXISTS comments (
    id             BLOB PRIMARY KEY,
    post_id        BLOB NOT NULL,
    university_id  BLOB NOT NULL,
    author_user_id BLOB NOT NULL,
    body           TEXT NOT NULL,
    created_at     TEXT NOT NULL,
    status         TEXT NOT NULL,
    removed_at     TEXT,
    removed_by     BLOB,
    removal_reason TEXT
);
CREATE INDEX IF NOT EXISTS idx_comments_post
    ON comments (post_id, created_at);

CREATE TABLE IF NOT EXISTS likes (
    post_id    BLOB NOT NULL,
    user_id    BLOB NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (post_id, user_id)
);

CREATE TABLE IF NOT EXISTS reports (
    id               BLOB PRIMARY KEY,
    reporter_user_id BLOB NOT NULL,
    entity_type      TEXT NOT NULL,
    entity_id        BLOB NOT NULL,
    reason           TEXT NOT NULL,
    details          TEXT,
    status           TEXT NOT NULL,
    created_at       TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_reports_status
    ON reports (status, created_at);

CREATE TABLE IF NOT EXISTS moderation_actions (
    id                BLOB PRIMARY KEY,
    moderator_user_id BLOB NOT NULL,
    action_type       TEXT NOT NULL,
    entity_type       TEXT NOT NULL,
    entity_id         BLOB NOT NULL,
    reason            TEXT NOT NULL,
    created_at        TEXT NOT NULL
);
"#;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `url` and bootstraps the
    /// schema. `sqlite::memory:` works for tests.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }
}

// Helpers for UUID conversion
fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

fn blob_to_uuid(blob: &[u8]) -> Uuid {
    Uuid::from_slice(blob).unwrap_or_default()
}

fn opt_blob_to_uuid(blob: Option<Vec<u8>>) -> Option<Uuid> {
    blob.map(|b| blob_to_uuid(&b))
}

fn role_from_str(s: &str) -> anyhow::Result<Role> {
    Ok(match s {
        "member" => Role::Member,
        "moderator" => Role::Moderator,
        "admin" => Role::Admin,
        other => bail!("unknown role {other:?}"),
    })
}

fn role_to_str(role: Role) -> &'static str {
    match role {
        Role::Member => "member",
        Role::Moderator => "moderator",
        Role::Admin => "admin",
    }
}

fn account_status_from_str(s: &str) -> anyhow::Result<AccountStatus> {
    Ok(match s {
        "active" => AccountStatus::Active,
        "suspended" => AccountStatus::Suspended,
        other => bail!("unknown account status {other:?}"),
    })
}

fn account_status_to_str(status: AccountStatus) -> &'static str {
    match status {
        AccountStatus::Active => "active",
        AccountStatus::Suspended => "suspended",
    }
}

fn content_status_from_str(s: &str) -> anyhow::Result<ContentStatus> {
    Ok(match s {
        "active" => ContentStatus::Active,
        "removed" => ContentStatus::Removed,
        other => bail!("unknown content status {other:?}"),
    })
}

fn content_status_to_str(status: ContentStatus) -> &'static str {
    match status {
        ContentStatus::Active => "active",
        ContentStatus::Removed => "removed",
    }
}

fn entity_type_from_str(s: &str) -> anyhow::Result<EntityType> {
    Ok(match s {
        "post" => EntityType::Post,
        "comment" => EntityType::Comment,
        "user" => EntityType::User,
        "report" => EntityType::Report,
        other => bail!("unknown entity type {other:?}"),
    })
}

fn reason_from_str(s: &str) -> anyhow::Result<ReportReason> {
    Ok(match s {
        "harassment" => ReportReason::Harassment,
        "hate_speech" => ReportReason::HateSpeech,
        "false_info" => ReportReason::FalseInfo,
        "spam" => ReportReason::Spam,
        "privacy_violation" => ReportReason::PrivacyViolation,
        "other" => ReportReason::Other,
        other => bail!("unknown report reason {other:?}"),
    })
}

fn reason_to_str(reason: ReportReason) -> &'static str {
    match reason {
        ReportReason::Harassment => "harassment",
        ReportReason::HateSpeech => "hate_speech",
        ReportReason::FalseInfo => "false_info",
        ReportReason::Spam => "spam",
        ReportReason::PrivacyViolation => "privacy_violation",
        ReportReason::Other => "other",
    }
}

fn report_status_from_str(s: &str) -> anyhow::Result<ReportStatus> {
    Ok(match s {
        "open" => ReportStatus::Open,
        "reviewed" => ReportStatus::Reviewed,
        "dismissed" => ReportStatus::Dismissed,
        other => bail!("unknown report status {other:?}"),
    })
}

fn report_status_to_str(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Open => "open",
        ReportStatus::Reviewed => "reviewed",
        ReportStatus::Dismissed => "dismissed",
    }
}

fn action_type_to_str(action: spill_core::models::ModActionType) -> &'static str {
    use spill_core::models::ModActionType::*;
    match action {
        RemovePost => "remove_post",
        RemoveComment => "remove_comment",
        SuspendUser => "suspend_user",
        DismissReport => "dismiss_report",
    }
}

fn profile_from_row(row: &SqliteRow) -> anyhow::Result<Profile> {
    Ok(Profile {
        id: blob_to_uuid(&row.get::<Vec<u8>, _>("id")),
        university_id: blob_to_uuid(&row.get::<Vec<u8>, _>("university_id")),
        email: row.get("email"),
        handle: row.get("handle"),
        display_name: row.get("display_name"),
        role: role_from_str(&row.get::<String, _>("role"))?,
        status: account_status_from_str(&row.get::<String, _>("status"))?,
        created_at: row.get("created_at"),
    })
}

/// Rows coming out of the post queries below always carry the two computed
/// count columns.
fn post_from_row(row: &SqliteRow) -> anyhow::Result<Post> {
    Ok(Post {
        id: blob_to_uuid(&row.get::<Vec<u8>, _>("id")),
        university_id: blob_to_uuid(&row.get::<Vec<u8>, _>("university_id")),
        author_user_id: blob_to_uuid(&row.get::<Vec<u8>, _>("author_user_id")),
        target_user_id: blob_to_uuid(&row.get::<Vec<u8>, _>("target_user_id")),
        subject: row.get("subject"),
        body: row.get("body"),
        created_at: row.get("created_at"),
        expires_at: row.get("expires_at"),
        like_count: row.get("like_count"),
        comment_count: row.get("comment_count"),
        status: content_status_from_str(&row.get::<String, _>("status"))?,
        removed_at: row.get("removed_at"),
        removed_by: opt_blob_to_uuid(row.get("removed_by")),
        removal_reason: row.get("removal_reason"),
    })
}

fn comment_from_row(row: &SqliteRow) -> anyhow::Result<Comment> {
    Ok(Comment {
        id: blob_to_uuid(&row.get::<Vec<u8>, _>("id")),
        post_id: blob_to_uuid(&row.get::<Vec<u8>, _>("post_id")),
        university_id: blob_to_uuid(&row.get::<Vec<u8>, _>("university_id")),
        author_user_id: blob_to_uuid(&row.get::<Vec<u8>, _>("author_user_id")),
        body: row.get("body"),
        created_at: row.get("created_at"),
        status: content_status_from_str(&row.get::<String, _>("status"))?,
        removed_at: row.get("removed_at"),
        removed_by: opt_blob_to_uuid(row.get("removed_by")),
        removal_reason: row.get("removal_reason"),
    })
}

fn report_from_row(row: &SqliteRow) -> anyhow::Result<Report> {
    Ok(Report {
        id: blob_to_uuid(&row.get::<Vec<u8>, _>("id")),
        reporter_user_id: blob_to_uuid(&row.get::<Vec<u8>, _>("reporter_user_id")),
        entity_type: entity_type_from_str(&row.get::<String, _>("entity_type"))?,
        entity_id: blob_to_uuid(&row.get::<Vec<u8>, _>("entity_id")),
        reason: reason_from_str(&row.get::<String, _>("reason"))?,
        details: row.get("details"),
        status: report_status_from_str(&row.get::<String, _>("status"))?,
        created_at: row.get("created_at"),
    })
}

const POST_SELECT: &str = "SELECT p.*, \
    (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count, \
    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id AND c.status = 'active') AS comment_count \
    FROM posts p";

#[async_trait]
impl ProfileRepo for SqliteStore {
    async fn create_profile(&self, profile: Profile) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO profiles (id, university_id, email, handle, display_name, role, status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(profile.id))
        .bind(uuid_to_blob(profile.university_id))
        .bind(profile.email)
        .bind(profile.handle)
        .bind(profile.display_name)
        .bind(role_to_str(profile.role))
        .bind(account_status_to_str(profile.status))
        .bind(profile.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_profile(&self, id: Uuid) -> anyhow::Result<Option<Profile>> {
        let row = sqlx::query("SELECT * FROM profiles WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(profile_from_row).transpose()
    }

    async fn find_by_handle(&self, handle: &str) -> anyhow::Result<Option<Profile>> {
        let row = sqlx::query("SELECT * FROM profiles WHERE handle = ? COLLATE NOCASE")
            .bind(handle)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(profile_from_row).transpose()
    }

    async fn search_profiles(&self, query: &str, limit: i64) -> anyhow::Result<Vec<Profile>> {
        let pattern = format!("%{query}%");
        let rows = sqlx::query(
            "SELECT * FROM profiles WHERE handle LIKE ? OR display_name LIKE ? \
             ORDER BY handle LIMIT ?",
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(profile_from_row).collect()
    }

    async fn set_account_status(&self, id: Uuid, status: AccountStatus) -> anyhow::Result<()> {
        sqlx::query("UPDATE profiles SET status = ? WHERE id = ?")
            .bind(account_status_to_str(status))
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> anyhow::Result<()> {
        sqlx::query("UPDATE profiles SET role = ? WHERE id = ?")
            .bind(role_to_str(role))
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl PostRepo for SqliteStore {
    async fn create_post(&self, post: Post) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO posts (id, university_id, author_user_id, target_user_id, subject, body, \
             created_at, expires_at, status, removed_at, removed_by, removal_reason) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(post.id))
        .bind(uuid_to_blob(post.university_id))
        .bind(uuid_to_blob(post.author_user_id))
        .bind(uuid_to_blob(post.target_user_id))
        .bind(post.subject)
        .bind(post.body)
        .bind(post.created_at)
        .bind(post.expires_at)
        .bind(content_status_to_str(post.status))
        .bind(post.removed_at)
        .bind(post.removed_by.map(uuid_to_blob))
        .bind(post.removal_reason)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_post(&self, id: Uuid) -> anyhow::Result<Option<Post>> {
        let row = sqlx::query(&format!("{POST_SELECT} WHERE p.id = ?"))
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(post_from_row).transpose()
    }

    async fn has_recent_post_about(
        &self,
        author: Uuid,
        target: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<bool> {
        let row = sqlx::query(
            "SELECT 1 FROM posts WHERE author_user_id = ? AND target_user_id = ? \
             AND created_at >= ? LIMIT 1",
        )
        .bind(uuid_to_blob(author))
        .bind(uuid_to_blob(target))
        .bind(since)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }

    async fn count_posts_by_author_since(
        &self,
        author: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM posts WHERE author_user_id = ? AND created_at >= ?",
        )
        .bind(uuid_to_blob(author))
        .bind(since)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("n"))
    }

    async fn list_live_posts(
        &self,
        university_id: Uuid,
        now: DateTime<Utc>,
        limit: i64,
    ) -> anyhow::Result<Vec<Post>> {
        let rows = sqlx::query(&format!(
            "{POST_SELECT} WHERE p.university_id = ? AND p.status = 'active' \
             AND p.expires_at > ? ORDER BY p.created_at DESC LIMIT ?"
        ))
        .bind(uuid_to_blob(university_id))
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(post_from_row).collect()
    }

    async fn mark_post_removed(
        &self,
        id: Uuid,
        removed_by: Uuid,
        reason: &str,
        at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE posts SET status = 'removed', removed_at = ?, removed_by = ?, \
             removal_reason = ? WHERE id = ?",
        )
        .bind(at)
        .bind(uuid_to_blob(removed_by))
        .bind(reason)
        .bind(uuid_to_blob(id))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn like_exists(&self, post_id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let row = sqlx::query("SELECT 1 FROM likes WHERE post_id = ? AND user_id = ?")
            .bind(uuid_to_blob(post_id))
            .bind(uuid_to_blob(user_id))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn insert_like(&self, like: Like) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO likes (post_id, user_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(uuid_to_blob(like.post_id))
        .bind(uuid_to_blob(like.user_id))
        .bind(like.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_like(&self, post_id: Uuid, user_id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM likes WHERE post_id = ? AND user_id = ?")
            .bind(uuid_to_blob(post_id))
            .bind(uuid_to_blob(user_id))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn liked_post_ids(
        &self,
        user_id: Uuid,
        post_ids: &[Uuid],
    ) -> anyhow::Result<HashSet<Uuid>> {
        let rows = sqlx::query("SELECT post_id FROM likes WHERE user_id = ?")
            .bind(uuid_to_blob(user_id))
            .fetch_all(&self.pool)
            .await?;
        let liked: HashSet<Uuid> = rows
            .iter()
            .map(|row| blob_to_uuid(&row.get::<Vec<u8>, _>("post_id")))
            .collect();
        Ok(post_ids.iter().copied().filter(|id| liked.contains(id)).collect())
    }
}

#[async_trait]
impl CommentRepo for SqliteStore {
    async fn create_comment(&self, comment: Comment) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO comments (id, post_id, university_id, author_user_id, body, created_at, \
             status, removed_at, removed_by, removal_reason) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(comment.id))
        .bind(uuid_to_blob(comment.post_id))
        .bind(uuid_to_blob(comment.university_id))
        .bind(uuid_to_blob(comment.author_user_id))
        .bind(comment.body)
        .bind(comment.created_at)
        .bind(content_status_to_str(comment.status))
        .bind(comment.removed_at)
        .bind(comment.removed_by.map(uuid_to_blob))
        .bind(comment.removal_reason)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_comment(&self, id: Uuid) -> anyhow::Result<Option<Comment>> {
        let row = sqlx::query("SELECT * FROM comments WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(comment_from_row).transpose()
    }

    async fn list_active_comments(&self, post_id: Uuid) -> anyhow::Result<Vec<Comment>> {
        let rows = sqlx::query(
            "SELECT * FROM comments WHERE post_id = ? AND status = 'active' \
             ORDER BY created_at ASC",
        )
        .bind(uuid_to_blob(post_id))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(comment_from_row).collect()
    }

    async fn count_by_author_on_post_since(
        &self,
        post_id: Uuid,
        author: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM comments WHERE post_id = ? AND author_user_id = ? \
             AND created_at >= ?",
        )
        .bind(uuid_to_blob(post_id))
        .bind(uuid_to_blob(author))
        .bind(since)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("n"))
    }

    async fn mark_comment_removed(
        &self,
        id: Uuid,
        removed_by: Uuid,
        reason: &str,
        at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE comments SET status = 'removed', removed_at = ?, removed_by = ?, \
             removal_reason = ? WHERE id = ?",
        )
        .bind(at)
        .bind(uuid_to_blob(removed_by))
        .bind(reason)
        .bind(uuid_to_blob(id))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ReportRepo for SqliteStore {
    async fn create_report(&self, report: Report) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO reports (id, reporter_user_id, entity_type, entity_id, reason, details, \
             status, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(report.id))
        .bind(uuid_to_blob(report.reporter_user_id))
        .bind(report.entity_type.as_str())
        .bind(uuid_to_blob(report.entity_id))
        .bind(reason_to_str(report.reason))
        .bind(report.details)
        .bind(report_status_to_str(report.status))
        .bind(report.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_report(&self, id: Uuid) -> anyhow::Result<Option<Report>> {
        let row = sqlx::query("SELECT * FROM reports WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(report_from_row).transpose()
    }

    async fn count_by_reporter_since(
        &self,
        reporter: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM reports WHERE reporter_user_id = ? AND created_at >= ?",
        )
        .bind(uuid_to_blob(reporter))
        .bind(since)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("n"))
    }

    async fn list_reports(&self, status: ReportStatus, limit: i64) -> anyhow::Result<Vec<Report>> {
        let rows = sqlx::query(
            "SELECT * FROM reports WHERE status = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(report_status_to_str(status))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(report_from_row).collect()
    }

    async fn set_report_status(&self, id: Uuid, status: ReportStatus) -> anyhow::Result<()> {
        sqlx::query("UPDATE reports SET status = ? WHERE id = ?")
            .bind(report_status_to_str(status))
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn log_action(&self, action: ModerationAction) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO moderation_actions (id, moderator_user_id, action_type, entity_type, \
             entity_id, reason, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(action.id))
        .bind(uuid_to_blob(action.moderator_user_id))
        .bind(action_type_to_str(action.action_type))
        .bind(action.entity_type.as_str())
        .bind(uuid_to_blob(action.entity_id))
        .bind(action.reason)
        .bind(action.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use spill_core::models::POST_LIFETIME_HOURS;

    fn profile(university_id: Uuid, handle: &str) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            university_id,
            email: format!("{handle}@campus.edu"),
            handle: handle.to_string(),
            display_name: Some(handle.to_uppercase()),
            role: Role::Member,
            status: AccountStatus::Active,
            created_at: Utc::now(),
        }
    }

    fn post(university_id: Uuid, author: Uuid, created_at: DateTime<Utc>) -> Post {
        Post {
            id: Uuid::now_v7(),
            university_id,
            author_user_id: author,
            target_user_id: Uuid::new_v4(),
            subject: "subject".to_string(),
            body: "body".to_string(),
            created_at,
            expires_at: created_at + Duration::hours(POST_LIFETIME_HOURS),
            like_count: 0,
            comment_count: 0,
            status: ContentStatus::Active,
            removed_at: None,
            removed_by: None,
            removal_reason: None,
        }
    }

    #[tokio::test]
    async fn post_roundtrip_with_computed_counts() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        let uni = Uuid::new_v4();
        let author = Uuid::new_v4();
        let p = post(uni, author, Utc::now());
        store.create_post(p.clone()).await.unwrap();

        store
            .insert_like(Like {
                post_id: p.id,
                user_id: Uuid::new_v4(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        let mut comment = Comment {
            id: Uuid::now_v7(),
            post_id: p.id,
            university_id: uni,
            author_user_id: Uuid::new_v4(),
            body: "hi".to_string(),
            created_at: Utc::now(),
            status: ContentStatus::Active,
            removed_at: None,
            removed_by: None,
            removal_reason: None,
        };
        store.create_comment(comment.clone()).await.unwrap();
        comment.id = Uuid::now_v7();
        comment.status = ContentStatus::Removed;
        store.create_comment(comment).await.unwrap();

        let loaded = store.get_post(p.id).await.unwrap().unwrap();
        assert_eq!(loaded.subject, "subject");
        assert_eq!(loaded.author_user_id, author);
        assert_eq!(loaded.like_count, 1);
        // Removed comments do not count.
        assert_eq!(loaded.comment_count, 1);
    }

    #[tokio::test]
    async fn handle_lookup_is_case_insensitive() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        let uni = Uuid::new_v4();
        store.create_profile(profile(uni, "Wren_22")).await.unwrap();

        let found = store.find_by_handle("wren_22").await.unwrap();
        assert!(found.is_some());
        assert!(store.find_by_handle("other").await.unwrap().is_none());

        let hits = store.search_profiles("wren", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn live_post_listing_filters_and_orders() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        let uni = Uuid::new_v4();
        let now = Utc::now();

        let old = post(uni, Uuid::new_v4(), now - Duration::hours(3));
        let fresh = post(uni, Uuid::new_v4(), now - Duration::hours(1));
        let expired = post(uni, Uuid::new_v4(), now - Duration::hours(50));
        let mut removed = post(uni, Uuid::new_v4(), now);
        removed.status = ContentStatus::Removed;
        let elsewhere = post(Uuid::new_v4(), Uuid::new_v4(), now);
        for p in [&old, &fresh, &expired, &removed, &elsewhere] {
            store.create_post(p.clone()).await.unwrap();
        }

        let listed = store.list_live_posts(uni, now, 50).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![fresh.id, old.id]);
    }

    #[tokio::test]
    async fn rate_limit_counts_respect_window() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        let uni = Uuid::new_v4();
        let author = Uuid::new_v4();
        let now = Utc::now();

        store
            .create_post(post(uni, author, now - Duration::hours(30)))
            .await
            .unwrap();
        store
            .create_post(post(uni, author, now - Duration::hours(2)))
            .await
            .unwrap();

        let n = store
            .count_posts_by_author_since(author, now - Duration::hours(24))
            .await
            .unwrap();
        assert_eq!(n, 1);
    }

    #[tokio::test]
    async fn report_queue_roundtrip() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        let report = Report {
            id: Uuid::now_v7(),
            reporter_user_id: Uuid::new_v4(),
            entity_type: EntityType::Post,
            entity_id: Uuid::new_v4(),
            reason: ReportReason::HateSpeech,
            details: Some("details".to_string()),
            status: ReportStatus::Open,
            created_at: Utc::now(),
        };
        store.create_report(report.clone()).await.unwrap();

        let open = store.list_reports(ReportStatus::Open, 10).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].reason, ReportReason::HateSpeech);

        store
            .set_report_status(report.id, ReportStatus::Dismissed)
            .await
            .unwrap();
        assert!(store.list_reports(ReportStatus::Open, 10).await.unwrap().is_empty());
        assert_eq!(
            store.get_report(report.id).await.unwrap().unwrap().status,
            ReportStatus::Dismissed
        );
    }
}
