//! End-to-end flow against the SQLite plugin: enroll, post, comment, like,
//! read the thread, report, moderate, and watch the feed reflect it all.

use integration_tests::TestCampus;
use spill_core::error::AppError;
use spill_core::models::{ContentStatus, EntityType, ReportReason, ReportStatus};
use spill_services::{FeedTab, LikeState, NewReport};

#[tokio::test]
async fn full_campus_lifecycle() -> anyhow::Result<()> {
    let campus = TestCampus::new().await?;
    let author = campus.member("wren").await?;
    campus.member("theo").await?;
    let alice = campus.member("alice").await?;
    let bob = campus.member("bob").await?;

    // Post about a classmate.
    let post = campus.quick_post(author, "theo").await?;
    assert_eq!(post.status, ContentStatus::Active);

    // Two commenters, then the author replies.
    let comments = campus.comments();
    comments.create_comment(alice, post.id, "saw it happen").await?;
    comments.create_comment(bob, post.id, "no way").await?;
    comments.create_comment(author, post.id, "all true").await?;

    // Likes from both commenters.
    let likes = campus.likes();
    assert_eq!(likes.toggle_like(alice, post.id).await?, LikeState::Liked);
    assert_eq!(likes.toggle_like(bob, post.id).await?, LikeState::Liked);

    // The thread hides authors behind first-seen anon numbers.
    let view = campus.threads().view(alice, post.id).await?;
    let numbers: Vec<u32> = view.comments.iter().map(|c| c.anon_number).collect();
    assert_eq!(numbers, vec![2, 3, 1]);
    assert_eq!(view.viewer_anon_number, Some(2));
    assert!(view.comments[0].is_viewer);
    assert_eq!(view.post.like_count, 2);
    assert_eq!(view.post.comment_count, 3);
    assert!(view.time_left.ends_with("left"));

    // Feed shows the post with the viewer's like flag set.
    let items = campus
        .feed()
        .load(alice, campus.university_id, FeedTab::Trending, 50)
        .await?;
    assert_eq!(items.len(), 1);
    assert!(items[0].viewer_has_liked);

    // A reader reports the post; a moderator removes it.
    let report = campus
        .reports()
        .create_report(
            bob,
            NewReport {
                entity_type: EntityType::Post,
                entity_id: post.id,
                reason: ReportReason::Harassment,
                details: Some("goes too far".to_string()),
            },
        )
        .await?;
    assert_eq!(report.status, ReportStatus::Open);

    let moderator = campus.moderator("maya").await?;
    let moderation = campus.moderation();
    let queue = moderation
        .list_reports(moderator, ReportStatus::Open, 50)
        .await?;
    assert_eq!(queue.len(), 1);

    moderation
        .remove_post(moderator, post.id, report.id, "harassment")
        .await?;

    // Removal empties the feed and the open queue, and blocks new comments.
    let items = campus
        .feed()
        .load(alice, campus.university_id, FeedTab::New, 50)
        .await?;
    assert!(items.is_empty());
    let queue = moderation
        .list_reports(moderator, ReportStatus::Open, 50)
        .await?;
    assert!(queue.is_empty());
    let err = comments.create_comment(alice, post.id, "late").await;
    assert!(matches!(err, Err(AppError::ValidationError(_))));

    Ok(())
}

#[tokio::test]
async fn suspension_cuts_off_posting() -> anyhow::Result<()> {
    let campus = TestCampus::new().await?;
    let offender = campus.member("offender").await?;
    let reporter = campus.member("reporter").await?;
    campus.member("theo").await?;
    let moderator = campus.moderator("maya").await?;

    campus.quick_post(offender, "theo").await?;
    let report = campus
        .reports()
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

    campus
        .moderation()
        .suspend_user(moderator, offender, report.id, "repeat offender")
        .await?;

    campus.member("priya").await?;
    let err = campus.quick_post(offender, "priya").await;
    match err {
        Err(err) => match err.downcast::<AppError>() {
            Ok(AppError::Unauthorized(msg)) => assert_eq!(msg, "Your account is suspended"),
            other => panic!("expected suspension error, got {other:?}"),
        },
        Ok(_) => panic!("suspended member should not post"),
    }

    Ok(())
}

#[tokio::test]
async fn handles_are_unique_per_campus() -> anyhow::Result<()> {
    let campus = TestCampus::new().await?;
    campus.member("wren").await?;

    let err = campus.member("WREN").await;
    match err {
        Err(err) => match err.downcast::<AppError>() {
            Ok(AppError::Conflict(msg)) => assert_eq!(msg, "That handle is already taken."),
            other => panic!("expected handle conflict, got {other:?}"),
        },
        Ok(_) => panic!("case-insensitive duplicate handle should be rejected"),
    }

    Ok(())
}
