//! # Spill Binary
//!
//! Assembles the services on top of the SQLite plugin and exposes a small
//! CLI for poking at a local database: `spill seed` fills in a demo campus,
//! `spill feed [trending|new|ending]` prints the feed the way a client
//! would render it.

use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::Utc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use spill_core::models::{EntityType, ReportReason};
use spill_core::time::{format_relative_time, time_remaining};
use spill_db_sqlite::SqliteStore;
use spill_services::{
    CommentService, FeedService, FeedTab, LikeService, NewPost, NewProfile, NewReport,
    PostService, ProfileService, ReportService, ThreadService,
};

struct App {
    profiles: ProfileService,
    posts: PostService,
    comments: CommentService,
    likes: LikeService,
    feed: FeedService,
    threads: ThreadService,
    reports: ReportService,
}

impl App {
    fn new(store: Arc<SqliteStore>) -> Self {
        App {
            profiles: ProfileService::new(store.clone()),
            posts: PostService::new(store.clone(), store.clone()),
            comments: CommentService::new(store.clone(), store.clone(), store.clone()),
            likes: LikeService::new(store.clone()),
            feed: FeedService::new(store.clone()),
            threads: ThreadService::new(store.clone(), store.clone(), store.clone()),
            reports: ReportService::new(store.clone(), store.clone(), store.clone(), store),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let url = std::env::var("SPILL_DATABASE_URL").unwrap_or_else(|_| "sqlite:spill.db".to_string());
    let store = Arc::new(
        SqliteStore::connect(&url)
            .await
            .with_context(|| format!("opening database {url}"))?,
    );
    let app = App::new(store);

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("seed") => seed(&app).await,
        Some("feed") => feed(&app, args.next().as_deref().unwrap_or("trending")).await,
        Some("thread") => {
            let id = args.next().context("usage: spill thread <post-id>")?;
            thread(&app, id.parse().context("post id must be a UUID")?).await
        }
        _ => {
            eprintln!("usage: spill <seed | feed [trending|new|ending] | thread <post-id>>");
            Ok(())
        }
    }
}

/// Resolves the acting user from SPILL_HANDLE (default: wren).
async fn viewer(app: &App) -> anyhow::Result<spill_core::models::Profile> {
    let handle = std::env::var("SPILL_HANDLE").unwrap_or_else(|_| "wren".to_string());
    match app.profiles.find_by_handle(&handle).await? {
        Some(profile) => Ok(profile),
        None => bail!("no profile with handle {handle:?}; run `spill seed` first"),
    }
}

async fn seed(app: &App) -> anyhow::Result<()> {
    if app.profiles.find_by_handle("wren").await?.is_some() {
        bail!("database already seeded");
    }
    let university_id = Uuid::now_v7();

    let mut ids = Vec::new();
    for (handle, name) in [
        ("wren", "Wren"),
        ("maya", "Maya P"),
        ("theo", "Theo"),
        ("priya", "Priya"),
        ("jonah", "Jonah K"),
    ] {
        let id = Uuid::new_v4();
        app.profiles
            .register(
                id,
                NewProfile {
                    university_id,
                    email: format!("{handle}@demo.edu"),
                    handle: handle.to_string(),
                    display_name: Some(name.to_string()),
                },
            )
            .await?;
        ids.push(id);
    }
    let [wren, maya, theo, priya, jonah]: [Uuid; 5] = ids.try_into().expect("five profiles");

    let sighting = app
        .posts
        .create_post(
            maya,
            NewPost {
                target_handle: "theo".to_string(),
                subject: "Caught feeding the campus cats again".to_string(),
                body: "Every morning outside the library. Never misses a day.".to_string(),
            },
        )
        .await?;
    let dining = app
        .posts
        .create_post(
            theo,
            NewPost {
                target_handle: "jonah".to_string(),
                subject: "Dining hall line jumper".to_string(),
                body: "Walked straight past forty people like we were invisible.".to_string(),
            },
        )
        .await?;
    app.posts
        .create_post(
            jonah,
            NewPost {
                target_handle: "maya".to_string(),
                subject: "Left an umbrella at the bus stop for strangers".to_string(),
                body: "Taped a note on it: take me if it rains.".to_string(),
            },
        )
        .await?;

    for user in [wren, theo, priya, jonah] {
        app.likes.toggle_like(user, sighting.id).await?;
    }
    app.likes.toggle_like(wren, dining.id).await?;

    app.comments
        .create_comment(wren, sighting.id, "The cats have a favorite human and it shows")
        .await?;
    app.comments
        .create_comment(priya, sighting.id, "Saw this too, can confirm")
        .await?;
    app.comments
        .create_comment(maya, sighting.id, "They queue up for him at 8am sharp")
        .await?;
    app.comments
        .create_comment(wren, dining.id, "Name and shame, honestly")
        .await?;

    let report = app
        .reports
        .create_report(
            jonah,
            NewReport {
                entity_type: EntityType::Post,
                entity_id: dining.id,
                reason: ReportReason::FalseInfo,
                details: Some("I was invited to the front, there's context".to_string()),
            },
        )
        .await?;

    // Left open so the moderation queue has something to show.
    tracing::info!(report = %report.id, "demo report filed");
    tracing::info!(university = %university_id, "demo campus seeded");
    println!("Seeded demo campus. Try: spill feed trending");
    Ok(())
}

async fn feed(app: &App, tab: &str) -> anyhow::Result<()> {
    let tab = FeedTab::parse(tab).context("tab must be one of: trending, new, ending")?;
    let me = viewer(app).await?;
    let items = app.feed.load(me.id, me.university_id, tab, 50).await?;
    let now = Utc::now();

    if items.is_empty() {
        println!("No posts yet. Be the first to spill.");
        return Ok(());
    }
    for item in items {
        let post = &item.post;
        let target = app
            .profiles
            .get(post.target_user_id)
            .await?
            .map(|p| p.handle)
            .unwrap_or_else(|| "unknown".to_string());
        let heart = if item.viewer_has_liked { "liked" } else { "    " };
        println!(
            "[{:>2} likes | {:>2} comments] {}  about @{}  ({}, {})  {}",
            post.like_count,
            post.comment_count,
            post.subject,
            target,
            time_remaining(post.expires_at, now),
            format_relative_time(post.created_at, now),
            heart,
        );
        println!("    id: {}", post.id);
    }
    Ok(())
}

async fn thread(app: &App, post_id: Uuid) -> anyhow::Result<()> {
    let me = viewer(app).await?;
    let view = app.threads.view(me.id, post_id).await?;
    let now = Utc::now();

    println!("{}  ({})", view.post.subject, view.time_left);
    println!("{}", view.post.body);
    println!();
    for comment in &view.comments {
        let op = if comment.anon_number == 1 { " (OP)" } else { "" };
        let you = if comment.is_viewer { " (you)" } else { "" };
        println!(
            "Anon {}{op}{you} · {}: {}",
            comment.anon_number,
            format_relative_time(comment.created_at, now),
            comment.body,
        );
    }
    if let Some(n) = view.viewer_anon_number {
        println!("\nCommenting as Anon {n}");
    }
    Ok(())
}
