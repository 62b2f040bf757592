//! spill/crates/spill-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Spill: models,
//! the pure rules engine, time formatting, errors, and the storage ports.

pub mod error;
pub mod models;
pub mod rules;
pub mod time;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn sample_post(created_at: chrono::DateTime<Utc>) -> Post {
        Post {
            id: Uuid::now_v7(),
            university_id: Uuid::now_v7(),
            author_user_id: Uuid::new_v4(),
            target_user_id: Uuid::new_v4(),
            subject: "Seen at the library".to_string(),
            body: "Wearing the same hoodie three days running".to_string(),
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

    #[test]
    fn visibility_follows_expiry_clock() {
        let now = Utc::now();
        let post = sample_post(now);
        assert_eq!(post.visibility(now), Visibility::Active);
        assert!(post.is_live(now));

        let later = now + Duration::hours(POST_LIFETIME_HOURS);
        assert_eq!(post.visibility(later), Visibility::Expired);
        assert!(!post.is_live(later));
    }

    #[test]
    fn removal_is_terminal_regardless_of_expiry() {
        let now = Utc::now();
        let mut post = sample_post(now);
        post.status = ContentStatus::Removed;
        assert_eq!(post.visibility(now), Visibility::Removed);
        assert_eq!(
            post.visibility(now + Duration::days(30)),
            Visibility::Removed
        );
    }

    #[test]
    fn handle_validation() {
        assert!(is_valid_handle("wren_22"));
        assert!(is_valid_handle("abc"));
        assert!(!is_valid_handle("ab"));
        assert!(!is_valid_handle("way_too_long_for_a_handle"));
        assert!(!is_valid_handle("has space"));
        assert!(!is_valid_handle("dot.dot"));
    }
}
