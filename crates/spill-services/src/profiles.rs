//! Profile registration and lookup.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use spill_core::error::{AppError, Result};
use spill_core::models::{is_valid_handle, AccountStatus, Profile, Role};
use spill_core::traits::ProfileRepo;

/// Input for creating a profile after email verification.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub university_id: Uuid,
    pub email: String,
    pub handle: String,
    pub display_name: Option<String>,
}

pub struct ProfileService {
    profiles: Arc<dyn ProfileRepo>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileRepo>) -> Self {
        Self { profiles }
    }

    /// Creates a profile for a freshly verified user. The handle must match
    /// `[A-Za-z0-9_]{3,20}` and be unused campus-wide.
    pub async fn register(&self, user_id: Uuid, input: NewProfile) -> Result<Profile> {
        if !is_valid_handle(&input.handle) {
            return Err(AppError::ValidationError(
                "Handle must be 3-20 characters: letters, numbers, underscores".to_string(),
            ));
        }

        if self.profiles.find_by_handle(&input.handle).await?.is_some() {
            return Err(AppError::Conflict("That handle is already taken.".to_string()));
        }

        let profile = Profile {
            id: user_id,
            university_id: input.university_id,
            email: input.email,
            handle: input.handle,
            display_name: input.display_name.filter(|n| !n.trim().is_empty()),
            role: Role::Member,
            status: AccountStatus::Active,
            created_at: Utc::now(),
        };
        self.profiles.create_profile(profile.clone()).await?;
        tracing::info!(user = %profile.id, handle = %profile.handle, "profile registered");
        Ok(profile)
    }

    pub async fn get(&self, user_id: Uuid) -> Result<Option<Profile>> {
        Ok(self.profiles.get_profile(user_id).await?)
    }

    pub async fn find_by_handle(&self, handle: &str) -> Result<Option<Profile>> {
        Ok(self.profiles.find_by_handle(handle).await?)
    }

    /// Substring search over handles and display names, for the target
    /// picker and the search page.
    pub async fn search(&self, query: &str, limit: i64) -> Result<Vec<Profile>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.profiles.search_profiles(query, limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spill_db_memory::MemoryStore;

    fn service() -> ProfileService {
        ProfileService::new(Arc::new(MemoryStore::new()))
    }

    fn input(handle: &str) -> NewProfile {
        NewProfile {
            university_id: Uuid::new_v4(),
            email: format!("{handle}@campus.edu"),
            handle: handle.to_string(),
            display_name: None,
        }
    }

    #[tokio::test]
    async fn register_and_find() {
        let svc = service();
        let id = Uuid::new_v4();
        svc.register(id, input("wren_22")).await.unwrap();

        let found = svc.find_by_handle("wren_22").await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.role, Role::Member);
    }

    #[tokio::test]
    async fn register_rejects_bad_handles() {
        let svc = service();
        let err = svc.register(Uuid::new_v4(), input("no spaces")).await;
        assert!(matches!(err, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn register_rejects_taken_handle() {
        let svc = service();
        svc.register(Uuid::new_v4(), input("wren_22")).await.unwrap();
        let err = svc.register(Uuid::new_v4(), input("wren_22")).await;
        assert!(matches!(err, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn empty_query_returns_nothing() {
        let svc = service();
        svc.register(Uuid::new_v4(), input("wren_22")).await.unwrap();
        assert!(svc.search("", 10).await.unwrap().is_empty());
        assert_eq!(svc.search("wren", 10).await.unwrap().len(), 1);
    }
}
