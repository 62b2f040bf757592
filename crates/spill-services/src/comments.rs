//! Anonymous comments on a post, with the hourly per-post cap.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use spill_core::error::{AppError, Result};
use spill_core::models::{Comment, ContentStatus, Visibility, COMMENT_MAX_LEN};
use spill_core::rules::{check_comment_rate_limit, Decision};
use spill_core::traits::{CommentRepo, PostRepo, ProfileRepo};

use crate::require_active_profile;

pub struct CommentService {
    comments: Arc<dyn CommentRepo>,
    posts: Arc<dyn PostRepo>,
    profiles: Arc<dyn ProfileRepo>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepo>,
        posts: Arc<dyn PostRepo>,
        profiles: Arc<dyn ProfileRepo>,
    ) -> Self {
        Self {
            comments,
            posts,
            profiles,
        }
    }

    /// Adds a comment to a live post on the commenter's campus.
    ///
    /// A post on another campus is reported as not found rather than
    /// forbidden, so its existence leaks nothing.
    pub async fn create_comment(
        &self,
        author_id: Uuid,
        post_id: Uuid,
        body: &str,
    ) -> Result<Comment> {
        let body = body.trim();
        if body.is_empty() || body.chars().count() > COMMENT_MAX_LEN {
            return Err(AppError::ValidationError(format!(
                "Comment must be between 1 and {COMMENT_MAX_LEN} characters"
            )));
        }

        let author = require_active_profile(self.profiles.as_ref(), author_id).await?;

        let post = self
            .posts
            .get_post(post_id)
            .await?
            .filter(|p| p.university_id == author.university_id)
            .ok_or_else(|| AppError::NotFound("Post".to_string()))?;

        let now = Utc::now();
        match post.visibility(now) {
            Visibility::Removed => {
                return Err(AppError::ValidationError(
                    "This post has been removed".to_string(),
                ))
            }
            Visibility::Expired => {
                return Err(AppError::ValidationError(
                    "This post has expired".to_string(),
                ))
            }
            Visibility::Active => {}
        }

        let hour_window = now - Duration::hours(1);
        let recent = self
            .comments
            .count_by_author_on_post_since(post.id, author.id, hour_window)
            .await?;
        if let Decision::Deny(reason) = check_comment_rate_limit(recent) {
            return Err(AppError::RateLimitExceeded(reason.message().to_string()));
        }

        let comment = Comment {
            id: Uuid::now_v7(),
            post_id: post.id,
            university_id: post.university_id,
            author_user_id: author.id,
            body: body.to_string(),
            created_at: now,
            status: ContentStatus::Active,
            removed_at: None,
            removed_by: None,
            removal_reason: None,
        };
        self.comments.create_comment(comment.clone()).await?;
        tracing::debug!(post = %post.id, comment = %comment.id, "comment created");
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::{NewPost, PostService};
    use crate::profiles::{NewProfile, ProfileService};
    use spill_core::models::Post;
    use spill_db_memory::MemoryStore;

    struct Fixture {
        store: Arc<MemoryStore>,
        comments: CommentService,
        university_id: Uuid,
    }

    impl Fixture {
        async fn new() -> Self {
            let store = Arc::new(MemoryStore::new());
            Fixture {
                comments: CommentService::new(store.clone(), store.clone(), store.clone()),
                university_id: Uuid::new_v4(),
                store,
            }
        }

        async fn member(&self, handle: &str) -> Uuid {
            let id = Uuid::new_v4();
            ProfileService::new(self.store.clone())
                .register(
                    id,
                    NewProfile {
                        university_id: self.university_id,
                        email: format!("{handle}@campus.edu"),
                        handle: handle.to_string(),
                        display_name: None,
                    },
                )
                .await
                .unwrap();
            id
        }

        async fn post(&self, author: Uuid, target_handle: &str) -> Post {
            PostService::new(self.store.clone(), self.store.clone())
                .create_post(
                    author,
                    NewPost {
                        target_handle: target_handle.to_string(),
                        subject: "Overheard in the quad".to_string(),
                        body: "Arguing with a pigeon, and losing".to_string(),
                    },
                )
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn comment_on_live_post() {
        let fx = Fixture::new().await;
        let author = fx.member("author1").await;
        fx.member("target1").await;
        let commenter = fx.member("commenter").await;
        let post = fx.post(author, "target1").await;

        let comment = fx
            .comments
            .create_comment(commenter, post.id, "  be nice  ")
            .await
            .unwrap();
        assert_eq!(comment.body, "be nice");
        assert_eq!(comment.post_id, post.id);
    }

    #[tokio::test]
    async fn hourly_cap_blocks_eleventh_comment() {
        let fx = Fixture::new().await;
        let author = fx.member("author1").await;
        fx.member("target1").await;
        let commenter = fx.member("commenter").await;
        let post = fx.post(author, "target1").await;

        for i in 0..10 {
            fx.comments
                .create_comment(commenter, post.id, &format!("comment {i}"))
                .await
                .unwrap();
        }
        let err = fx.comments.create_comment(commenter, post.id, "one more").await;
        assert!(matches!(err, Err(AppError::RateLimitExceeded(_))));
    }

    #[tokio::test]
    async fn rejects_removed_post() {
        let fx = Fixture::new().await;
        let author = fx.member("author1").await;
        fx.member("target1").await;
        let commenter = fx.member("commenter").await;
        let post = fx.post(author, "target1").await;

        spill_core::traits::PostRepo::mark_post_removed(
            fx.store.as_ref(),
            post.id,
            Uuid::new_v4(),
            "harassment",
            Utc::now(),
        )
        .await
        .unwrap();

        let err = fx.comments.create_comment(commenter, post.id, "hello").await;
        match err {
            Err(AppError::ValidationError(msg)) => assert!(msg.contains("removed")),
            other => panic!("expected removed-post error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejects_empty_body() {
        let fx = Fixture::new().await;
        let commenter = fx.member("commenter").await;
        let err = fx
            .comments
            .create_comment(commenter, Uuid::new_v4(), "   ")
            .await;
        assert!(matches!(err, Err(AppError::ValidationError(_))));
    }
}
