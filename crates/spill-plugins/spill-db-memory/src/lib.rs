//! # spill-db-memory
//!
//! In-memory implementation of every storage port, backed by hash maps
//! behind a single async lock. Used by service unit tests and the demo
//! binary; nothing survives the process.
//!
//! Like and comment counts on returned posts are recomputed from the like
//! and comment tables on every read, matching the contract the SQLite
//! plugin honors.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use spill_core::models::{
    AccountStatus, Comment, ContentStatus, Like, ModerationAction, Post, Profile, Report,
    ReportStatus, Role,
};
use spill_core::traits::{CommentRepo, PostRepo, ProfileRepo, ReportRepo};

#[derive(Default)]
struct State {
    profiles: HashMap<Uuid, Profile>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    likes: HashMap<(Uuid, Uuid), Like>,
    reports: HashMap<Uuid, Report>,
    actions: Vec<ModerationAction>,
}

impl State {
    /// Attaches recomputed like/comment counts to a stored post.
    fn with_counts(&self, post: &Post) -> Post {
        let mut out = post.clone();
        out.like_count = self
            .likes
            .keys()
            .filter(|(post_id, _)| *post_id == post.id)
            .count() as i64;
        out.comment_count = self
            .comments
            .values()
            .filter(|c| c.post_id == post.id && c.status == ContentStatus::Active)
            .count() as i64;
        out
    }
}

pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
        }
    }

    /// Number of audit-log entries written so far. Test hook.
    pub async fn action_count(&self) -> usize {
        self.state.read().await.actions.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileRepo for MemoryStore {
    async fn create_profile(&self, profile: Profile) -> anyhow::Result<()> {
        self.state
            .write()
            .await
            .profiles
            .insert(profile.id, profile);
        Ok(())
    }

    async fn get_profile(&self, id: Uuid) -> anyhow::Result<Option<Profile>> {
        Ok(self.state.read().await.profiles.get(&id).cloned())
    }

    async fn find_by_handle(&self, handle: &str) -> anyhow::Result<Option<Profile>> {
        Ok(self
            .state
            .read()
            .await
            .profiles
            .values()
            .find(|p| p.handle.eq_ignore_ascii_case(handle))
            .cloned())
    }

    async fn search_profiles(&self, query: &str, limit: i64) -> anyhow::Result<Vec<Profile>> {
        let needle = query.to_lowercase();
        let mut hits: Vec<Profile> = self
            .state
            .read()
            .await
            .profiles
            .values()
            .filter(|p| {
                p.handle.to_lowercase().contains(&needle)
                    || p.display_name
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.handle.cmp(&b.handle));
        hits.truncate(limit as usize);
        Ok(hits)
    }

    async fn set_account_status(&self, id: Uuid, status: AccountStatus) -> anyhow::Result<()> {
        if let Some(profile) = self.state.write().await.profiles.get_mut(&id) {
            profile.status = status;
        }
        Ok(())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> anyhow::Result<()> {
        if let Some(profile) = self.state.write().await.profiles.get_mut(&id) {
            profile.role = role;
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepo for MemoryStore {
    async fn create_post(&self, post: Post) -> anyhow::Result<()> {
        self.state.write().await.posts.insert(post.id, post);
        Ok(())
    }

    async fn get_post(&self, id: Uuid) -> anyhow::Result<Option<Post>> {
        let state = self.state.read().await;
        Ok(state.posts.get(&id).map(|p| state.with_counts(p)))
    }

    async fn has_recent_post_about(
        &self,
        author: Uuid,
        target: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<bool> {
        Ok(self.state.read().await.posts.values().any(|p| {
            p.author_user_id == author && p.target_user_id == target && p.created_at >= since
        }))
    }

    async fn count_posts_by_author_since(
        &self,
        author: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<i64> {
        Ok(self
            .state
            .read()
            .await
            .posts
            .values()
            .filter(|p| p.author_user_id == author && p.created_at >= since)
            .count() as i64)
    }

    async fn list_live_posts(
        &self,
        university_id: Uuid,
        now: DateTime<Utc>,
        limit: i64,
    ) -> anyhow::Result<Vec<Post>> {
        let state = self.state.read().await;
        let mut posts: Vec<Post> = state
            .posts
            .values()
            .filter(|p| p.university_id == university_id && p.is_live(now))
            .map(|p| state.with_counts(p))
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts.truncate(limit as usize);
        Ok(posts)
    }

    async fn mark_post_removed(
        &self,
        id: Uuid,
        removed_by: Uuid,
        reason: &str,
        at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        if let Some(post) = self.state.write().await.posts.get_mut(&id) {
            post.status = ContentStatus::Removed;
            post.removed_at = Some(at);
            post.removed_by = Some(removed_by);
            post.removal_reason = Some(reason.to_string());
        }
        Ok(())
    }

    async fn like_exists(&self, post_id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        Ok(self
            .state
            .read()
            .await
            .likes
            .contains_key(&(post_id, user_id)))
    }

    async fn insert_like(&self, like: Like) -> anyhow::Result<()> {
        self.state
            .write()
            .await
            .likes
            .insert((like.post_id, like.user_id), like);
        Ok(())
    }

    async fn delete_like(&self, post_id: Uuid, user_id: Uuid) -> anyhow::Result<()> {
        self.state.write().await.likes.remove(&(post_id, user_id));
        Ok(())
    }

    async fn liked_post_ids(
        &self,
        user_id: Uuid,
        post_ids: &[Uuid],
    ) -> anyhow::Result<HashSet<Uuid>> {
        let state = self.state.read().await;
        Ok(post_ids
            .iter()
            .copied()
            .filter(|post_id| state.likes.contains_key(&(*post_id, user_id)))
            .collect())
    }
}

#[async_trait]
impl CommentRepo for MemoryStore {
    async fn create_comment(&self, comment: Comment) -> anyhow::Result<()> {
        self.state.write().await.comments.insert(comment.id, comment);
        Ok(())
    }

    async fn get_comment(&self, id: Uuid) -> anyhow::Result<Option<Comment>> {
        Ok(self.state.read().await.comments.get(&id).cloned())
    }

    async fn list_active_comments(&self, post_id: Uuid) -> anyhow::Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .state
            .read()
            .await
            .comments
            .values()
            .filter(|c| c.post_id == post_id && c.status == ContentStatus::Active)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn count_by_author_on_post_since(
        &self,
        post_id: Uuid,
        author: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<i64> {
        Ok(self
            .state
            .read()
            .await
            .comments
            .values()
            .filter(|c| {
                c.post_id == post_id && c.author_user_id == author && c.created_at >= since
            })
            .count() as i64)
    }

    async fn mark_comment_removed(
        &self,
        id: Uuid,
        removed_by: Uuid,
        reason: &str,
        at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        if let Some(comment) = self.state.write().await.comments.get_mut(&id) {
            comment.status = ContentStatus::Removed;
            comment.removed_at = Some(at);
            comment.removed_by = Some(removed_by);
            comment.removal_reason = Some(reason.to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl ReportRepo for MemoryStore {
    async fn create_report(&self, report: Report) -> anyhow::Result<()> {
        self.state.write().await.reports.insert(report.id, report);
        Ok(())
    }

    async fn get_report(&self, id: Uuid) -> anyhow::Result<Option<Report>> {
        Ok(self.state.read().await.reports.get(&id).cloned())
    }

    async fn count_by_reporter_since(
        &self,
        reporter: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<i64> {
        Ok(self
            .state
            .read()
            .await
            .reports
            .values()
            .filter(|r| r.reporter_user_id == reporter && r.created_at >= since)
            .count() as i64)
    }

    async fn list_reports(&self, status: ReportStatus, limit: i64) -> anyhow::Result<Vec<Report>> {
        let mut reports: Vec<Report> = self
            .state
            .read()
            .await
            .reports
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reports.truncate(limit as usize);
        Ok(reports)
    }

    async fn set_report_status(&self, id: Uuid, status: ReportStatus) -> anyhow::Result<()> {
        if let Some(report) = self.state.write().await.reports.get_mut(&id) {
            report.status = status;
        }
        Ok(())
    }

    async fn log_action(&self, action: ModerationAction) -> anyhow::Result<()> {
        self.state.write().await.actions.push(action);
        Ok(())
    }
}
