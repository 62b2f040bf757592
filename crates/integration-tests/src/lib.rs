//! Shared fixtures for the end-to-end tests: one SQLite-backed campus with
//! helpers to enroll members, promote moderators, and build services.

use std::sync::Arc;

use uuid::Uuid;

use spill_core::models::Role;
use spill_core::traits::ProfileRepo;
use spill_db_sqlite::SqliteStore;
use spill_services::{
    CommentService, FeedService, LikeService, ModerationService, NewPost, NewProfile,
    PostService, ProfileService, ReportService, ThreadService,
};

pub struct TestCampus {
    pub store: Arc<SqliteStore>,
    pub university_id: Uuid,
}

impl TestCampus {
    pub async fn new() -> anyhow::Result<Self> {
        Ok(TestCampus {
            store: Arc::new(SqliteStore::connect("sqlite::memory:").await?),
            university_id: Uuid::now_v7(),
        })
    }

    pub async fn member(&self, handle: &str) -> anyhow::Result<Uuid> {
        let id = Uuid::new_v4();
        self.profiles()
            .register(
                id,
                NewProfile {
                    university_id: self.university_id,
                    email: format!("{handle}@campus.edu"),
                    handle: handle.to_string(),
                    display_name: None,
                },
            )
            .await?;
        Ok(id)
    }

    pub async fn moderator(&self, handle: &str) -> anyhow::Result<Uuid> {
        let id = self.member(handle).await?;
        // Promotion happens out of band in production, via admin tooling.
        self.store.set_role(id, Role::Moderator).await?;
        Ok(id)
    }

    pub fn profiles(&self) -> ProfileService {
        ProfileService::new(self.store.clone())
    }

    pub fn posts(&self) -> PostService {
        PostService::new(self.store.clone(), self.store.clone())
    }

    pub fn comments(&self) -> CommentService {
        CommentService::new(self.store.clone(), self.store.clone(), self.store.clone())
    }

    pub fn likes(&self) -> LikeService {
        LikeService::new(self.store.clone())
    }

    pub fn feed(&self) -> FeedService {
        FeedService::new(self.store.clone())
    }

    pub fn threads(&self) -> ThreadService {
        ThreadService::new(self.store.clone(), self.store.clone(), self.store.clone())
    }

    pub fn reports(&self) -> ReportService {
        ReportService::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
        )
    }

    pub fn moderation(&self) -> ModerationService {
        ModerationService::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
        )
    }

    /// Creates a post from `author` about `target_handle` with filler text.
    pub async fn quick_post(
        &self,
        author: Uuid,
        target_handle: &str,
    ) -> anyhow::Result<spill_core::models::Post> {
        Ok(self
            .posts()
            .create_post(
                author,
                NewPost {
                    target_handle: target_handle.to_string(),
                    subject: format!("About @{target_handle}"),
                    body: "Something happened on campus".to_string(),
                },
            )
            .await?)
    }
}
