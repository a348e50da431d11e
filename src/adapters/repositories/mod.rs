pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
	comment::{Comment, CommentWithUser},
	follow::Follow,
	like::Like,
	post::{NewPost, Post, PostWithStats, PostWithUser},
	user::{User, UserStats},
};

pub use memory::InMemoryFeedStore;
pub use postgres::PgFeedStore;

#[derive(Debug, Error)]
pub enum StoreError {
	#[error("unique constraint violated")]
	UniqueViolation,
	#[error("check constraint violated")]
	CheckViolation,
	#[error("foreign key constraint violated")]
	ForeignKeyViolation,
	#[error("store unavailable")]
	Unavailable,
	#[error(transparent)]
	Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
	fn from(value: sqlx::Error) -> Self {
		let code = match &value {
			sqlx::Error::Database(db) => db.code().map(|code| code.into_owned()),
			_ => None,
		};
		match code.as_deref() {
			Some("23505") => StoreError::UniqueViolation,
			Some("23514") => StoreError::CheckViolation,
			Some("23503") => StoreError::ForeignKeyViolation,
			_ => StoreError::Database(value),
		}
	}
}

/// Relational store holding users, posts, comments, likes and follows.
///
/// Implementations own the integrity rules: unique like and follow pairs,
/// `follower != following`, and removal of a post's comments and likes
/// together with the post.
#[async_trait]
pub trait FeedStore: Send + Sync {
	async fn find_user_by_external_id(
		&self,
		external_id: &str,
	) -> Result<Option<User>, StoreError>;

	/// Creates the user for `external_id` or renames the existing one.
	async fn upsert_user(
		&self,
		external_id: &str,
		name: &str,
	) -> Result<User, StoreError>;

	async fn user_stats(
		&self,
		user_id: Uuid,
	) -> Result<UserStats, StoreError>;

	async fn is_following(
		&self,
		follower_id: Uuid,
		following_id: Uuid,
	) -> Result<bool, StoreError>;

	/// Newest first, with like and comment counts filled in and no comments.
	async fn list_posts(
		&self,
		author_id: Option<Uuid>,
		offset: i64,
		limit: i64,
	) -> Result<Vec<PostWithStats>, StoreError>;

	async fn count_posts(
		&self,
		author_id: Option<Uuid>,
	) -> Result<i64, StoreError>;

	async fn find_post(
		&self,
		post_id: Uuid,
	) -> Result<Option<PostWithUser>, StoreError>;

	async fn insert_post(
		&self,
		post: NewPost,
	) -> Result<Post, StoreError>;

	/// Deletes the post only when `owner_id` owns it. Returns whether a row went away.
	async fn delete_post(
		&self,
		post_id: Uuid,
		owner_id: Uuid,
	) -> Result<bool, StoreError>;

	async fn count_likes(
		&self,
		post_id: Uuid,
	) -> Result<i64, StoreError>;

	async fn has_liked(
		&self,
		post_id: Uuid,
		user_id: Uuid,
	) -> Result<bool, StoreError>;

	async fn insert_like(
		&self,
		post_id: Uuid,
		user_id: Uuid,
	) -> Result<Like, StoreError>;

	async fn delete_like(
		&self,
		post_id: Uuid,
		user_id: Uuid,
	) -> Result<bool, StoreError>;

	async fn count_comments(
		&self,
		post_id: Uuid,
	) -> Result<i64, StoreError>;

	/// Newest first.
	async fn latest_comments(
		&self,
		post_id: Uuid,
		limit: i64,
	) -> Result<Vec<CommentWithUser>, StoreError>;

	/// Oldest first.
	async fn list_comments(
		&self,
		post_id: Uuid,
	) -> Result<Vec<CommentWithUser>, StoreError>;

	async fn find_comment(
		&self,
		comment_id: Uuid,
	) -> Result<Option<Comment>, StoreError>;

	async fn insert_comment(
		&self,
		post_id: Uuid,
		user_id: Uuid,
		content: &str,
	) -> Result<Comment, StoreError>;

	async fn delete_comment(
		&self,
		comment_id: Uuid,
	) -> Result<bool, StoreError>;

	async fn insert_follow(
		&self,
		follower_id: Uuid,
		following_id: Uuid,
	) -> Result<Follow, StoreError>;

	async fn delete_follow(
		&self,
		follower_id: Uuid,
		following_id: Uuid,
	) -> Result<bool, StoreError>;
}
