//! User-filed reports against posts, comments, and users.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use spill_core::error::{AppError, Result};
use spill_core::models::{EntityType, Report, ReportReason, ReportStatus};
use spill_core::rules::{check_report_rate_limit, Decision};
use spill_core::traits::{CommentRepo, PostRepo, ProfileRepo, ReportRepo};

use crate::require_active_profile;

#[derive(Debug, Clone)]
pub struct NewReport {
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub reason: ReportReason,
    pub details: Option<String>,
}

pub struct ReportService {
    reports: Arc<dyn ReportRepo>,
    posts: Arc<dyn PostRepo>,
    comments: Arc<dyn CommentRepo>,
    profiles: Arc<dyn ProfileRepo>,
}

impl ReportService {
    pub fn new(
        reports: Arc<dyn ReportRepo>,
        posts: Arc<dyn PostRepo>,
        comments: Arc<dyn CommentRepo>,
        profiles: Arc<dyn ProfileRepo>,
    ) -> Self {
        Self {
            reports,
            posts,
            comments,
            profiles,
        }
    }

    /// Files a report. The reported entity must exist on the reporter's
    /// campus and must not be the reporter's own content (or, for user
    /// reports, the reporter themselves).
    pub async fn create_report(&self, reporter_id: Uuid, input: NewReport) -> Result<Report> {
        let reporter = require_active_profile(self.profiles.as_ref(), reporter_id).await?;

        let now = Utc::now();
        let day_window = now - Duration::hours(24);
        let recent = self
            .reports
            .count_by_reporter_since(reporter.id, day_window)
            .await?;
        if let Decision::Deny(reason) = check_report_rate_limit(recent) {
            return Err(AppError::RateLimitExceeded(reason.message().to_string()));
        }

        match input.entity_type {
            EntityType::Post => {
                let post = self
                    .posts
                    .get_post(input.entity_id)
                    .await?
                    .filter(|p| p.university_id == reporter.university_id)
                    .ok_or_else(|| AppError::NotFound("Post".to_string()))?;
                if post.author_user_id == reporter.id {
                    return Err(AppError::ValidationError(
                        "You cannot report your own content".to_string(),
                    ));
                }
            }
            EntityType::Comment => {
                let comment = self
                    .comments
                    .get_comment(input.entity_id)
                    .await?
                    .filter(|c| c.university_id == reporter.university_id)
                    .ok_or_else(|| AppError::NotFound("Comment".to_string()))?;
                if comment.author_user_id == reporter.id {
                    return Err(AppError::ValidationError(
                        "You cannot report your own content".to_string(),
                    ));
                }
            }
            EntityType::User => {
                let target = self
                    .profiles
                    .get_profile(input.entity_id)
                    .await?
                    .filter(|p| p.university_id == reporter.university_id)
                    .ok_or_else(|| AppError::NotFound("User".to_string()))?;
                if target.id == reporter.id {
                    return Err(AppError::ValidationError(
                        "You cannot report yourself".to_string(),
                    ));
                }
            }
            EntityType::Report => {
                return Err(AppError::ValidationError(
                    "Reports cannot be reported".to_string(),
                ));
            }
        }

        let report = Report {
            id: Uuid::now_v7(),
            reporter_user_id: reporter.id,
            entity_type: input.entity_type,
            entity_id: input.entity_id,
            reason: input.reason,
            details: input
                .details
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            status: ReportStatus::Open,
            created_at: now,
        };
        self.reports.create_report(report.clone()).await?;
        tracing::info!(
            report = %report.id,
            entity = input.entity_type.as_str(),
            "report filed"
        );
        Ok(report)
    }
}
