//! Toggle record and account integration tests.
//!
//! These tests require a running `PostgreSQL` instance. Each test creates its
//! own database, so they can run in parallel.
//! Run with: `cargo test -p utopia-db --test toggle_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `utopia_test`)
//!   `TEST_DB_PASSWORD` (default: `utopia_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
    prelude::DateTimeWithTimeZone,
};
use utopia_common::AppError;
use utopia_db::{
    entities::{Like, like, user, video},
    repositories::{FollowRepository, LikeRepository, UserRepository, VideoRepository},
    test_utils::{TestDatabase, TestDbConfig},
};

async fn seed_user(db: &Arc<DatabaseConnection>, username: &str) -> i32 {
    let now: DateTimeWithTimeZone = Utc::now().into();
    UserRepository::new(Arc::clone(db))
        .create(user::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set("x".to_string()),
            nickname: Set(username.to_string()),
            avatar_url: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .await
        .unwrap()
        .id
}

async fn seed_video(db: &Arc<DatabaseConnection>, author_id: i32) -> i32 {
    VideoRepository::new(Arc::clone(db))
        .create(video::ActiveModel {
            author_id: Set(author_id),
            play_url: Set("https://cdn.example.com/v.mp4".to_string()),
            cover_url: Set("https://cdn.example.com/v.jpg".to_string()),
            description: Set(String::new()),
            video_type: Set(1),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        })
        .await
        .unwrap()
        .id
}

async fn like_rows(db: &DatabaseConnection, user_id: i32, video_id: i32) -> u64 {
    Like::find()
        .filter(like::Column::UserId.eq(user_id))
        .filter(like::Column::VideoId.eq(video_id))
        .count(db)
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_like_twice_keeps_one_row() {
    let test_db = TestDatabase::migrated().await.expect("Failed to create database");
    let db = Arc::new(test_db.connection().clone());
    let user_id = seed_user(&db, "alice").await;
    let video_id = seed_video(&db, user_id).await;

    let likes = LikeRepository::new(Arc::clone(&db));
    likes.like(user_id, video_id).await.unwrap();
    likes.like(user_id, video_id).await.unwrap();

    assert_eq!(like_rows(&db, user_id, video_id).await, 1);
    assert_eq!(likes.count_likes(video_id).await.unwrap(), 1);
    assert!(likes.is_liked(user_id, video_id).await.unwrap());

    test_db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_unlike_never_liked_creates_nothing() {
    let test_db = TestDatabase::migrated().await.expect("Failed to create database");
    let db = Arc::new(test_db.connection().clone());
    let user_id = seed_user(&db, "bob").await;
    let video_id = seed_video(&db, user_id).await;

    let likes = LikeRepository::new(Arc::clone(&db));
    likes.unlike(user_id, video_id).await.unwrap();

    assert_eq!(like_rows(&db, user_id, video_id).await, 0);
    assert!(!likes.is_liked(user_id, video_id).await.unwrap());

    test_db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_like_unlike_like_reuses_row() {
    let test_db = TestDatabase::migrated().await.expect("Failed to create database");
    let db = Arc::new(test_db.connection().clone());
    let user_id = seed_user(&db, "carol").await;
    let video_id = seed_video(&db, user_id).await;

    let likes = LikeRepository::new(Arc::clone(&db));
    likes.like(user_id, video_id).await.unwrap();
    let first = likes.find_by_pair(user_id, video_id).await.unwrap().unwrap();

    likes.unlike(user_id, video_id).await.unwrap();
    assert_eq!(likes.count_likes(video_id).await.unwrap(), 0);
    assert!(likes.liked_user_ids(video_id).await.unwrap().is_empty());

    likes.like(user_id, video_id).await.unwrap();
    let again = likes.find_by_pair(user_id, video_id).await.unwrap().unwrap();

    assert!(again.status);
    assert_eq!(again.created_at, first.created_at);
    assert_eq!(like_rows(&db, user_id, video_id).await, 1);

    test_db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_concurrent_likes_do_not_duplicate() {
    let test_db = TestDatabase::migrated().await.expect("Failed to create database");
    let db = Arc::new(test_db.connection().clone());
    let user_id = seed_user(&db, "dave").await;
    let video_id = seed_video(&db, user_id).await;

    let likes = LikeRepository::new(Arc::clone(&db));
    let (a, b, c) = tokio::join!(
        likes.like(user_id, video_id),
        likes.like(user_id, video_id),
        likes.like(user_id, video_id),
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());

    assert_eq!(like_rows(&db, user_id, video_id).await, 1);
    assert_eq!(likes.count_likes(video_id).await.unwrap(), 1);

    test_db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_like_count_tracks_distinct_users() {
    let test_db = TestDatabase::migrated().await.expect("Failed to create database");
    let db = Arc::new(test_db.connection().clone());
    let erin = seed_user(&db, "erin").await;
    let frank = seed_user(&db, "frank").await;
    let video_id = seed_video(&db, erin).await;

    let likes = LikeRepository::new(Arc::clone(&db));
    likes.like(erin, video_id).await.unwrap();
    likes.like(frank, video_id).await.unwrap();
    assert_eq!(likes.count_likes(video_id).await.unwrap(), 2);

    likes.unlike(erin, video_id).await.unwrap();
    assert_eq!(likes.count_likes(video_id).await.unwrap(), 1);
    assert_eq!(likes.liked_user_ids(video_id).await.unwrap(), vec![frank]);
    assert!(!likes.is_liked(erin, video_id).await.unwrap());

    test_db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_follow_lists_only_active_pairs() {
    let test_db = TestDatabase::migrated().await.expect("Failed to create database");
    let db = Arc::new(test_db.connection().clone());
    let alice = seed_user(&db, "alice").await;
    let bob = seed_user(&db, "bob").await;
    let carol = seed_user(&db, "carol").await;

    let follows = FollowRepository::new(Arc::clone(&db));
    follows.follow(bob, alice).await.unwrap();
    follows.follow(carol, alice).await.unwrap();
    follows.unfollow(carol, alice).await.unwrap();

    assert_eq!(follows.follower_ids(alice).await.unwrap(), vec![bob]);
    assert_eq!(follows.followee_ids(bob).await.unwrap(), vec![alice]);
    assert_eq!(follows.count_followers(alice).await.unwrap(), 1);
    assert!(follows.followee_ids(carol).await.unwrap().is_empty());

    test_db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_username_is_conflict() {
    let test_db = TestDatabase::migrated().await.expect("Failed to create database");
    let db = Arc::new(test_db.connection().clone());
    seed_user(&db, "grace").await;

    let now: DateTimeWithTimeZone = Utc::now().into();
    let result = UserRepository::new(Arc::clone(&db))
        .create(user::ActiveModel {
            username: Set("grace".to_string()),
            password_hash: Set("x".to_string()),
            nickname: Set("grace".to_string()),
            avatar_url: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    test_db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.database.is_empty());
}
