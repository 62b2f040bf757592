//! The campus feed: trending, new, and ending-soon tabs.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use spill_core::error::Result;
use spill_core::models::Post;
use spill_core::rules::trending_score;
use spill_core::traits::PostRepo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedTab {
    #[default]
    Trending,
    New,
    Ending,
}

impl FeedTab {
    pub fn parse(s: &str) -> Option<FeedTab> {
        match s {
            "trending" => Some(FeedTab::Trending),
            "new" => Some(FeedTab::New),
            "ending" => Some(FeedTab::Ending),
            _ => None,
        }
    }
}

/// One feed entry, ready to render.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub post: Post,
    pub viewer_has_liked: bool,
}

pub struct FeedService {
    posts: Arc<dyn PostRepo>,
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostRepo>) -> Self {
        Self { posts }
    }

    /// Loads live posts for the viewer's campus, sorted per tab.
    ///
    /// The repository returns newest-first; trending re-sorts with a stable
    /// sort, so posts with equal scores keep that fetch order.
    pub async fn load(
        &self,
        viewer_id: Uuid,
        university_id: Uuid,
        tab: FeedTab,
        limit: i64,
    ) -> Result<Vec<FeedItem>> {
        let now = Utc::now();
        let mut posts = self.posts.list_live_posts(university_id, now, limit).await?;

        match tab {
            FeedTab::New => {}
            FeedTab::Ending => {
                posts.sort_by(|a, b| a.expires_at.cmp(&b.expires_at));
            }
            FeedTab::Trending => {
                let mut scored: Vec<(f64, Post)> = posts
                    .into_iter()
                    .map(|p| {
                        (
                            trending_score(p.like_count, p.comment_count, p.created_at, now),
                            p,
                        )
                    })
                    .collect();
                scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
                posts = scored.into_iter().map(|(_, p)| p).collect();
            }
        }

        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let liked = self.posts.liked_post_ids(viewer_id, &ids).await?;

        Ok(posts
            .into_iter()
            .map(|post| FeedItem {
                viewer_has_liked: liked.contains(&post.id),
                post,
            })
            .collect())
    }
}
