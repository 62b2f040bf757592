//! Moderator actions: the report queue, content removal, suspensions, and
//! the audit log. Every decision writes a `ModerationAction` row.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use spill_core::error::{AppError, Result};
use spill_core::models::{
    AccountStatus, EntityType, ModActionType, ModerationAction, Profile, Report, ReportStatus,
};
use spill_core::traits::{CommentRepo, PostRepo, ProfileRepo, ReportRepo};

pub struct ModerationService {
    posts: Arc<dyn PostRepo>,
    comments: Arc<dyn CommentRepo>,
    profiles: Arc<dyn ProfileRepo>,
    reports: Arc<dyn ReportRepo>,
}

impl ModerationService {
    pub fn new(
        posts: Arc<dyn PostRepo>,
        comments: Arc<dyn CommentRepo>,
        profiles: Arc<dyn ProfileRepo>,
        reports: Arc<dyn ReportRepo>,
    ) -> Self {
        Self {
            posts,
            comments,
            profiles,
            reports,
        }
    }

    async fn verify_moderator(&self, moderator_id: Uuid) -> Result<Profile> {
        let profile = self
            .profiles
            .get_profile(moderator_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))?;
        if !profile.role.can_moderate() {
            return Err(AppError::Unauthorized("Unauthorized".to_string()));
        }
        Ok(profile)
    }

    /// The moderation queue, filtered by status, newest first.
    pub async fn list_reports(
        &self,
        moderator_id: Uuid,
        status: ReportStatus,
        limit: i64,
    ) -> Result<Vec<Report>> {
        self.verify_moderator(moderator_id).await?;
        Ok(self.reports.list_reports(status, limit).await?)
    }

    /// Removes a post, logs the action, and marks the triggering report
    /// reviewed. Removal is terminal.
    pub async fn remove_post(
        &self,
        moderator_id: Uuid,
        post_id: Uuid,
        report_id: Uuid,
        reason: &str,
    ) -> Result<()> {
        let moderator = self.verify_moderator(moderator_id).await?;
        let now = Utc::now();

        self.posts
            .get_post(post_id)
            .await?
            .filter(|p| p.university_id == moderator.university_id)
            .ok_or_else(|| AppError::NotFound("Post".to_string()))?;

        self.posts
            .mark_post_removed(post_id, moderator.id, reason, now)
            .await?;
        self.log(&moderator, ModActionType::RemovePost, EntityType::Post, post_id, reason)
            .await?;
        self.reports
            .set_report_status(report_id, ReportStatus::Reviewed)
            .await?;
        tracing::info!(post = %post_id, moderator = %moderator.id, "post removed");
        Ok(())
    }

    /// Removes a comment; same bookkeeping as [`Self::remove_post`].
    pub async fn remove_comment(
        &self,
        moderator_id: Uuid,
        comment_id: Uuid,
        report_id: Uuid,
        reason: &str,
    ) -> Result<()> {
        let moderator = self.verify_moderator(moderator_id).await?;
        let now = Utc::now();

        self.comments
            .get_comment(comment_id)
            .await?
            .filter(|c| c.university_id == moderator.university_id)
            .ok_or_else(|| AppError::NotFound("Comment".to_string()))?;

        self.comments
            .mark_comment_removed(comment_id, moderator.id, reason, now)
            .await?;
        self.log(
            &moderator,
            ModActionType::RemoveComment,
            EntityType::Comment,
            comment_id,
            reason,
        )
        .await?;
        self.reports
            .set_report_status(report_id, ReportStatus::Reviewed)
            .await?;
        tracing::info!(comment = %comment_id, moderator = %moderator.id, "comment removed");
        Ok(())
    }

    /// Suspends a member. Moderators and admins cannot be suspended.
    pub async fn suspend_user(
        &self,
        moderator_id: Uuid,
        user_id: Uuid,
        report_id: Uuid,
        reason: &str,
    ) -> Result<()> {
        let moderator = self.verify_moderator(moderator_id).await?;

        let target = self
            .profiles
            .get_profile(user_id)
            .await?
            .filter(|p| p.university_id == moderator.university_id)
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;
        if target.role.can_moderate() {
            return Err(AppError::ValidationError(
                "Cannot suspend moderators or admins".to_string(),
            ));
        }

        self.profiles
            .set_account_status(target.id, AccountStatus::Suspended)
            .await?;
        self.log(&moderator, ModActionType::SuspendUser, EntityType::User, user_id, reason)
            .await?;
        self.reports
            .set_report_status(report_id, ReportStatus::Reviewed)
            .await?;
        tracing::info!(user = %user_id, moderator = %moderator.id, "user suspended");
        Ok(())
    }

    /// Closes a report without acting on the reported content.
    pub async fn dismiss_report(&self, moderator_id: Uuid, report_id: Uuid) -> Result<()> {
        let moderator = self.verify_moderator(moderator_id).await?;

        let report = self
            .reports
            .get_report(report_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Report".to_string()))?;

        self.reports
            .set_report_status(report.id, ReportStatus::Dismissed)
            .await?;
        self.log(
            &moderator,
            ModActionType::DismissReport,
            EntityType::Report,
            report.id,
            "Dismissed by moderator",
        )
        .await?;
        Ok(())
    }

    async fn log(
        &self,
        moderator: &Profile,
        action_type: ModActionType,
        entity_type: EntityType,
        entity_id: Uuid,
        reason: &str,
    ) -> Result<()> {
        self.reports
            .log_action(ModerationAction {
                id: Uuid::now_v7(),
                moderator_user_id: moderator.id,
                action_type,
                entity_type,
                entity_id,
                reason: reason.to_string(),
                created_at: Utc::now(),
            })
            .await?;
        Ok(())
    }
}
