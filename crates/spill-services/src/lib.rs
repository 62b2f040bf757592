//! # spill-services
//!
//! Use-case orchestration for Spill. Each service owns handles to the
//! storage ports from `spill-core::traits` and composes them with the pure
//! rules engine: fetch the rows or counts a decision needs, let the rules
//! decide, then write. Authentication is the caller's concern; every entry
//! point takes the acting user's id and trusts it.

pub mod comments;
pub mod feed;
pub mod likes;
pub mod moderation;
pub mod posts;
pub mod profiles;
pub mod reports;
pub mod thread;

pub use comments::CommentService;
pub use feed::{FeedItem, FeedService, FeedTab};
pub use likes::{LikeService, LikeState};
pub use moderation::ModerationService;
pub use posts::{NewPost, PostService};
pub use profiles::{NewProfile, ProfileService};
pub use reports::{NewReport, ReportService};
pub use thread::{ThreadComment, ThreadService, ThreadView};

use spill_core::error::{AppError, Result};
use spill_core::models::{AccountStatus, Profile};
use spill_core::traits::ProfileRepo;
use uuid::Uuid;

/// Loads the acting user's profile and rejects suspended accounts.
/// Shared preamble of every write path.
pub(crate) async fn require_active_profile(
    profiles: &dyn ProfileRepo,
    user_id: Uuid,
) -> Result<Profile> {
    let profile = profiles
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile".to_string()))?;
    if profile.status == AccountStatus::Suspended {
        return Err(AppError::Unauthorized(
            "Your account is suspended".to_string(),
        ));
    }
    Ok(profile)
}
