//! Thread view assembly: one post, its comments, and the per-rendering
//! anonymous identity map. Author ids are stripped before the view leaves
//! this module; readers only ever see "Anon N".

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use spill_core::error::{AppError, Result};
use spill_core::models::Post;
use spill_core::rules::assign_anon_numbers;
use spill_core::time::time_remaining;
use spill_core::traits::{CommentRepo, PostRepo, ProfileRepo};

/// A comment with its author id replaced by the thread-local anon number.
#[derive(Debug, Clone)]
pub struct ThreadComment {
    pub id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    /// 1 is always the post author.
    pub anon_number: u32,
    pub is_viewer: bool,
}

#[derive(Debug, Clone)]
pub struct ThreadView {
    pub post: Post,
    pub time_left: String,
    pub viewer_has_liked: bool,
    /// The viewer's own anon number, if they are the author or have
    /// commented. Shown next to the composer.
    pub viewer_anon_number: Option<u32>,
    pub comments: Vec<ThreadComment>,
}

pub struct ThreadService {
    posts: Arc<dyn PostRepo>,
    comments: Arc<dyn CommentRepo>,
    profiles: Arc<dyn ProfileRepo>,
}

impl ThreadService {
    pub fn new(
        posts: Arc<dyn PostRepo>,
        comments: Arc<dyn CommentRepo>,
        profiles: Arc<dyn ProfileRepo>,
    ) -> Self {
        Self {
            posts,
            comments,
            profiles,
        }
    }

    /// Builds the thread view for one post.
    ///
    /// The anon map is recomputed from (author, comments in ascending
    /// creation order) on every call; numbering is stable within this one
    /// rendering only and may shift across requests if comment visibility
    /// changes.
    pub async fn view(&self, viewer_id: Uuid, post_id: Uuid) -> Result<ThreadView> {
        let viewer = self
            .profiles
            .get_profile(viewer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile".to_string()))?;

        let post = self
            .posts
            .get_post(post_id)
            .await?
            .filter(|p| p.university_id == viewer.university_id)
            .ok_or_else(|| AppError::NotFound("Post".to_string()))?;

        let comments = self.comments.list_active_comments(post.id).await?;
        let anon = assign_anon_numbers(
            post.author_user_id,
            comments.iter().map(|c| c.author_user_id),
        );

        let now = Utc::now();
        let viewer_has_liked = self.posts.like_exists(post.id, viewer.id).await?;

        Ok(ThreadView {
            time_left: time_remaining(post.expires_at, now),
            viewer_has_liked,
            viewer_anon_number: anon.get(&viewer.id).copied(),
            comments: comments
                .into_iter()
                .map(|c| ThreadComment {
                    id: c.id,
                    body: c.body,
                    created_at: c.created_at,
                    anon_number: anon.get(&c.author_user_id).copied().unwrap_or(0),
                    is_viewer: c.author_user_id == viewer.id,
                })
                .collect(),
            post,
        })
    }
}
