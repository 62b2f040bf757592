//! Post creation: validation, target resolution, cooldown and daily cap.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use spill_core::error::{AppError, Result};
use spill_core::models::{
    ContentStatus, Post, BODY_MAX_LEN, POST_LIFETIME_HOURS, SUBJECT_MAX_LEN,
};
use spill_core::rules::{
    check_daily_post_cap, check_post_cooldown, Decision, POST_COOLDOWN_MINUTES,
};
use spill_core::traits::{PostRepo, ProfileRepo};

use crate::require_active_profile;

/// Input for creating a post. The target is addressed by handle, the way
/// the composer's people-picker submits it.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub target_handle: String,
    pub subject: String,
    pub body: String,
}

pub struct PostService {
    posts: Arc<dyn PostRepo>,
    profiles: Arc<dyn ProfileRepo>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepo>, profiles: Arc<dyn ProfileRepo>) -> Self {
        Self { posts, profiles }
    }

    /// Creates a post about another user on the author's campus.
    ///
    /// Checks run in a fixed order so the most specific message wins:
    /// suspended account, content validation, target resolution, the
    /// 30-minute per-target cooldown, then the daily cap.
    pub async fn create_post(&self, author_id: Uuid, input: NewPost) -> Result<Post> {
        let author = require_active_profile(self.profiles.as_ref(), author_id).await?;

        let subject = input.subject.trim();
        if subject.is_empty() || subject.chars().count() > SUBJECT_MAX_LEN {
            return Err(AppError::ValidationError(format!(
                "Subject must be between 1 and {SUBJECT_MAX_LEN} characters"
            )));
        }

        let body = input.body.trim();
        if body.is_empty() || body.chars().count() > BODY_MAX_LEN {
            return Err(AppError::ValidationError(format!(
                "Body must be between 1 and {BODY_MAX_LEN} characters"
            )));
        }

        let target_handle = input.target_handle.trim();
        if target_handle.is_empty() {
            return Err(AppError::ValidationError(
                "Target handle is required".to_string(),
            ));
        }
        let target = self
            .profiles
            .find_by_handle(target_handle)
            .await?
            .ok_or_else(|| AppError::NotFound("Target user".to_string()))?;

        if target.university_id != author.university_id {
            return Err(AppError::ValidationError(
                "Target must be at your university".to_string(),
            ));
        }
        if target.id == author.id {
            return Err(AppError::ValidationError(
                "You can't create a post about yourself".to_string(),
            ));
        }

        let now = Utc::now();

        // Cooldown first; its message takes precedence over the daily cap.
        let cooldown_window = now - Duration::minutes(POST_COOLDOWN_MINUTES);
        let recent = self
            .posts
            .has_recent_post_about(author.id, target.id, cooldown_window)
            .await?;
        if let Decision::Deny(reason) = check_post_cooldown(recent) {
            return Err(AppError::RateLimitExceeded(reason.message().to_string()));
        }

        let day_window = now - Duration::hours(24);
        let recent_count = self
            .posts
            .count_posts_by_author_since(author.id, day_window)
            .await?;
        if let Decision::Deny(reason) = check_daily_post_cap(recent_count) {
            return Err(AppError::RateLimitExceeded(reason.message().to_string()));
        }

        let post = Post {
            id: Uuid::now_v7(),
            university_id: author.university_id,
            author_user_id: author.id,
            target_user_id: target.id,
            subject: subject.to_string(),
            body: body.to_string(),
            created_at: now,
            expires_at: now + Duration::hours(POST_LIFETIME_HOURS),
            like_count: 0,
            comment_count: 0,
            status: ContentStatus::Active,
            removed_at: None,
            removed_by: None,
            removal_reason: None,
        };
        self.posts.create_post(post.clone()).await?;
        tracing::info!(post = %post.id, target = %target.handle, "post created");
        Ok(post)
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
        Ok(self.posts.get_post(id).await?)
    }
}
