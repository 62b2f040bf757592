//! Like toggling. Presence of a row is the whole story: insert to like,
//! delete to unlike.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use spill_core::error::{AppError, Result};
use spill_core::models::Like;
use spill_core::traits::PostRepo;

/// Resulting state after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeState {
    Liked,
    Unliked,
}

pub struct LikeService {
    posts: Arc<dyn PostRepo>,
}

impl LikeService {
    pub fn new(posts: Arc<dyn PostRepo>) -> Self {
        Self { posts }
    }

    /// Toggles the user's like on a post and reports the new state.
    pub async fn toggle_like(&self, user_id: Uuid, post_id: Uuid) -> Result<LikeState> {
        self.posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post".to_string()))?;

        if self.posts.like_exists(post_id, user_id).await? {
            self.posts.delete_like(post_id, user_id).await?;
            Ok(LikeState::Unliked)
        } else {
            self.posts
                .insert_like(Like {
                    post_id,
                    user_id,
                    created_at: Utc::now(),
                })
                .await?;
            Ok(LikeState::Liked)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::{NewPost, PostService};
    use crate::profiles::{NewProfile, ProfileService};
    use spill_core::traits::PostRepo as _;
    use spill_db_memory::MemoryStore;

    #[tokio::test]
    async fn toggle_flips_state_and_count() {
        let store = Arc::new(MemoryStore::new());
        let university_id = Uuid::new_v4();
        let profiles = ProfileService::new(store.clone());
        let author = Uuid::new_v4();
        let liker = Uuid::new_v4();
        for (id, handle) in [(author, "author1"), (liker, "liker"), (Uuid::new_v4(), "target1")] {
            profiles
                .register(
                    id,
                    NewProfile {
                        university_id,
                        email: format!("{handle}@campus.edu"),
                        handle: handle.to_string(),
                        display_name: None,
                    },
                )
                .await
                .unwrap();
        }
        let post = PostService::new(store.clone(), store.clone())
            .create_post(
                author,
                NewPost {
                    target_handle: "target1".to_string(),
                    subject: "s".to_string(),
                    body: "b".to_string(),
                },
            )
            .await
            .unwrap();

        let likes = LikeService::new(store.clone());
        assert_eq!(likes.toggle_like(liker, post.id).await.unwrap(), LikeState::Liked);
        let counted = store.get_post(post.id).await.unwrap().unwrap();
        assert_eq!(counted.like_count, 1);

        assert_eq!(
            likes.toggle_like(liker, post.id).await.unwrap(),
            LikeState::Unliked
        );
        let counted = store.get_post(post.id).await.unwrap().unwrap();
        assert_eq!(counted.like_count, 0);
    }

    #[tokio::test]
    async fn toggle_missing_post_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let likes = LikeService::new(store);
        let err = likes.toggle_like(Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(err, Err(AppError::NotFound(_))));
    }
}
