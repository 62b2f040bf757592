//! Rate limit behavior through the services, backed by SQLite. Exercises the
//! cooldown, the daily post cap, the hourly comment cap, and the daily
//! report cap with the real count queries.

use integration_tests::TestCampus;
use spill_core::error::AppError;
use spill_core::models::{EntityType, ReportReason};
use spill_services::{NewPost, NewReport};

fn post_about(target: &str) -> NewPost {
    NewPost {
        target_handle: target.to_string(),
        subject: format!("About @{target}"),
        body: "Something happened on campus".to_string(),
    }
}

#[tokio::test]
async fn cooldown_blocks_back_to_back_posts_about_same_person() -> anyhow::Result<()> {
    let campus = TestCampus::new().await?;
    let author = campus.member("wren").await?;
    campus.member("theo").await?;

    let posts = campus.posts();
    posts.create_post(author, post_about("theo")).await?;
    let err = posts.create_post(author, post_about("theo")).await;
    match err {
        Err(AppError::RateLimitExceeded(msg)) => {
            assert_eq!(msg, "You can only post about this person once every 30 minutes");
        }
        other => panic!("expected cooldown denial, got {other:?}"),
    }

    // A different target is fine.
    campus.member("priya").await?;
    posts.create_post(author, post_about("priya")).await?;

    Ok(())
}

#[tokio::test]
async fn daily_cap_blocks_fourth_post() -> anyhow::Result<()> {
    let campus = TestCampus::new().await?;
    let author = campus.member("wren").await?;
    for target in ["theo", "priya", "maya", "jonah"] {
        campus.member(target).await?;
    }

    let posts = campus.posts();
    for target in ["theo", "priya", "maya"] {
        posts.create_post(author, post_about(target)).await?;
    }
    let err = posts.create_post(author, post_about("jonah")).await;
    match err {
        Err(AppError::RateLimitExceeded(msg)) => {
            assert_eq!(msg, "You can only create 3 posts per day");
        }
        other => panic!("expected daily cap denial, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn hourly_comment_cap_is_per_post() -> anyhow::Result<()> {
    let campus = TestCampus::new().await?;
    let author = campus.member("wren").await?;
    campus.member("theo").await?;
    let commenter = campus.member("alice").await?;

    let first = campus.quick_post(author, "theo").await?;
    let comments = campus.comments();
    for i in 0..10 {
        comments
            .create_comment(commenter, first.id, &format!("comment {i}"))
            .await?;
    }
    let err = comments.create_comment(commenter, first.id, "one more").await;
    match err {
        Err(AppError::RateLimitExceeded(msg)) => {
            assert_eq!(msg, "Too many comments. Try again later.");
        }
        other => panic!("expected comment cap denial, got {other:?}"),
    }

    // The cap counts per post, so a second thread is still open.
    campus.member("priya").await?;
    let second = campus.quick_post(author, "priya").await?;
    comments.create_comment(commenter, second.id, "fresh thread").await?;

    Ok(())
}

#[tokio::test]
async fn daily_report_cap_blocks_eleventh_report() -> anyhow::Result<()> {
    let campus = TestCampus::new().await?;
    let reporter = campus.member("reporter").await?;
    let offender = campus.member("offender").await?;

    let reports = campus.reports();
    for _ in 0..10 {
        reports
            .create_report(
                reporter,
                NewReport {
                    entity_type: EntityType::User,
                    entity_id: offender,
                    reason: ReportReason::Harassment,
                    details: None,
                },
            )
            .await?;
    }
    let err = reports
        .create_report(
            reporter,
            NewReport {
                entity_type: EntityType::User,
                entity_id: offender,
                reason: ReportReason::Harassment,
                details: None,
            },
        )
        .await;
    match err {
        Err(AppError::RateLimitExceeded(msg)) => {
            assert_eq!(msg, "Too many reports today. Try again tomorrow.");
        }
        other => panic!("expected report cap denial, got {other:?}"),
    }

    Ok(())
}
