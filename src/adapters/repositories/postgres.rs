use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{FeedStore, StoreError};
use crate::domain::{
	comment::{Comment, CommentWithUser},
	follow::Follow,
	like::Like,
	post::{NewPost, Post, PostWithStats, PostWithUser},
	user::{User, UserStats, UserSummary},
};

const POST_COLUMNS: &str = r#"
	p.id, p.user_id, p.image_url, p.caption, p.created_at, p.updated_at,
	u.external_id AS author_external_id, u.name AS author_name
"#;

const COMMENT_COLUMNS: &str = r#"
	c.id, c.post_id, c.user_id, c.content, c.created_at, c.updated_at,
	u.external_id AS author_external_id, u.name AS author_name
"#;

#[derive(sqlx::FromRow)]
struct PostRow {
	id: Uuid,
	user_id: Uuid,
	image_url: String,
	caption: Option<String>,
	created_at: DateTime<Utc>,
	updated_at: DateTime<Utc>,
	author_external_id: String,
	author_name: String,
}

impl From<PostRow> for PostWithUser {
	fn from(row: PostRow) -> Self {
		PostWithUser {
			user: UserSummary {
				id: row.user_id,
				external_id: row.author_external_id,
				name: row.author_name,
			},
			post: Post {
				id: row.id,
				user_id: row.user_id,
				image_url: row.image_url,
				caption: row.caption,
				created_at: row.created_at,
				updated_at: row.updated_at,
			},
		}
	}
}

#[derive(sqlx::FromRow)]
struct FeedRow {
	#[sqlx(flatten)]
	post: PostRow,
	likes_count: i64,
	comments_count: i64,
}

impl From<FeedRow> for PostWithStats {
	fn from(row: FeedRow) -> Self {
		let PostWithUser { post, user } = row.post.into();
		PostWithStats {
			post,
			user,
			likes_count: row.likes_count,
			comments_count: row.comments_count,
			comments: Vec::new(),
			is_liked: false,
		}
	}
}

#[derive(sqlx::FromRow)]
struct CommentRow {
	id: Uuid,
	post_id: Uuid,
	user_id: Uuid,
	content: String,
	created_at: DateTime<Utc>,
	updated_at: DateTime<Utc>,
	author_external_id: String,
	author_name: String,
}

impl From<CommentRow> for CommentWithUser {
	fn from(row: CommentRow) -> Self {
		CommentWithUser {
			user: UserSummary {
				id: row.user_id,
				external_id: row.author_external_id,
				name: row.author_name,
			},
			comment: Comment {
				id: row.id,
				post_id: row.post_id,
				user_id: row.user_id,
				content: row.content,
				created_at: row.created_at,
				updated_at: row.updated_at,
			},
		}
	}
}

/// Postgres-backed store. Integrity rules live in the schema (see `migrations/`).
#[derive(Clone)]
pub struct PgFeedStore {
	pool: PgPool,
}

impl PgFeedStore {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}
}

#[async_trait]
impl FeedStore for PgFeedStore {
	async fn find_user_by_external_id(
		&self,
		external_id: &str,
	) -> Result<Option<User>, StoreError> {
		let user = sqlx::query_as::<_, User>(
			r#"
			SELECT id, external_id, name, created_at
			FROM users
			WHERE external_id = $1
			"#,
		)
		.bind(external_id)
		.fetch_optional(&self.pool)
		.await?;
		Ok(user)
	}

	async fn upsert_user(
		&self,
		external_id: &str,
		name: &str,
	) -> Result<User, StoreError> {
		let user = sqlx::query_as::<_, User>(
			r#"
			INSERT INTO users (id, external_id, name)
			VALUES ($1, $2, $3)
			ON CONFLICT (external_id) DO UPDATE
			SET name = EXCLUDED.name
			RETURNING id, external_id, name, created_at
			"#,
		)
		.bind(Uuid::new_v4())
		.bind(external_id)
		.bind(name)
		.fetch_one(&self.pool)
		.await?;
		Ok(user)
	}

	async fn user_stats(
		&self,
		user_id: Uuid,
	) -> Result<UserStats, StoreError> {
		let (posts_count, followers_count, following_count) = sqlx::query_as::<_, (i64, i64, i64)>(
			r#"
			SELECT
				(SELECT COUNT(*) FROM posts WHERE user_id = $1),
				(SELECT COUNT(*) FROM follows WHERE following_id = $1),
				(SELECT COUNT(*) FROM follows WHERE follower_id = $1)
			"#,
		)
		.bind(user_id)
		.fetch_one(&self.pool)
		.await?;
		Ok(UserStats {
			posts_count,
			followers_count,
			following_count,
		})
	}

	async fn is_following(
		&self,
		follower_id: Uuid,
		following_id: Uuid,
	) -> Result<bool, StoreError> {
		let exists: bool = sqlx::query_scalar(
			r#"
			SELECT EXISTS(
				SELECT 1 FROM follows
				WHERE follower_id = $1 AND following_id = $2
			)
			"#,
		)
		.bind(follower_id)
		.bind(following_id)
		.fetch_one(&self.pool)
		.await?;
		Ok(exists)
	}

	async fn list_posts(
		&self,
		author_id: Option<Uuid>,
		offset: i64,
		limit: i64,
	) -> Result<Vec<PostWithStats>, StoreError> {
		let query = format!(
			r#"
			SELECT {POST_COLUMNS},
				(SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS likes_count,
				(SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count
			FROM posts p
			JOIN users u ON u.id = p.user_id
			WHERE ($1::uuid IS NULL OR p.user_id = $1)
			ORDER BY p.created_at DESC, p.id DESC
			LIMIT $2 OFFSET $3
			"#
		);
		let rows = sqlx::query_as::<_, FeedRow>(&query)
			.bind(author_id)
			.bind(limit)
			.bind(offset)
			.fetch_all(&self.pool)
			.await?;
		Ok(rows.into_iter().map(Into::into).collect())
	}

	async fn count_posts(
		&self,
		author_id: Option<Uuid>,
	) -> Result<i64, StoreError> {
		let count: i64 = sqlx::query_scalar(
			r#"
			SELECT COUNT(*) FROM posts
			WHERE ($1::uuid IS NULL OR user_id = $1)
			"#,
		)
		.bind(author_id)
		.fetch_one(&self.pool)
		.await?;
		Ok(count)
	}

	async fn find_post(
		&self,
		post_id: Uuid,
	) -> Result<Option<PostWithUser>, StoreError> {
		let query = format!(
			r#"
			SELECT {POST_COLUMNS}
			FROM posts p
			JOIN users u ON u.id = p.user_id
			WHERE p.id = $1
			"#
		);
		let row = sqlx::query_as::<_, PostRow>(&query)
			.bind(post_id)
			.fetch_optional(&self.pool)
			.await?;
		Ok(row.map(Into::into))
	}

	async fn insert_post(
		&self,
		post: NewPost,
	) -> Result<Post, StoreError> {
		let post = sqlx::query_as::<_, Post>(
			r#"
			INSERT INTO posts (id, user_id, image_url, caption)
			VALUES ($1, $2, $3, $4)
			RETURNING id, user_id, image_url, caption, created_at, updated_at
			"#,
		)
		.bind(Uuid::new_v4())
		.bind(post.user_id)
		.bind(post.image_url)
		.bind(post.caption)
		.fetch_one(&self.pool)
		.await?;
		Ok(post)
	}

	async fn delete_post(
		&self,
		post_id: Uuid,
		owner_id: Uuid,
	) -> Result<bool, StoreError> {
		let result = sqlx::query(
			r#"
			DELETE FROM posts
			WHERE id = $1 AND user_id = $2
			"#,
		)
		.bind(post_id)
		.bind(owner_id)
		.execute(&self.pool)
		.await?;
		Ok(result.rows_affected() > 0)
	}

	async fn count_likes(
		&self,
		post_id: Uuid,
	) -> Result<i64, StoreError> {
		let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE post_id = $1")
			.bind(post_id)
			.fetch_one(&self.pool)
			.await?;
		Ok(count)
	}

	async fn has_liked(
		&self,
		post_id: Uuid,
		user_id: Uuid,
	) -> Result<bool, StoreError> {
		let exists: bool = sqlx::query_scalar(
			r#"
			SELECT EXISTS(
				SELECT 1 FROM likes
				WHERE post_id = $1 AND user_id = $2
			)
			"#,
		)
		.bind(post_id)
		.bind(user_id)
		.fetch_one(&self.pool)
		.await?;
		Ok(exists)
	}

	async fn insert_like(
		&self,
		post_id: Uuid,
		user_id: Uuid,
	) -> Result<Like, StoreError> {
		let like = sqlx::query_as::<_, Like>(
			r#"
			INSERT INTO likes (id, post_id, user_id)
			VALUES ($1, $2, $3)
			RETURNING id, post_id, user_id, created_at
			"#,
		)
		.bind(Uuid::new_v4())
		.bind(post_id)
		.bind(user_id)
		.fetch_one(&self.pool)
		.await?;
		Ok(like)
	}

	async fn delete_like(
		&self,
		post_id: Uuid,
		user_id: Uuid,
	) -> Result<bool, StoreError> {
		let result = sqlx::query("DELETE FROM likes WHERE post_id = $1 AND user_id = $2")
			.bind(post_id)
			.bind(user_id)
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected() > 0)
	}

	async fn count_comments(
		&self,
		post_id: Uuid,
	) -> Result<i64, StoreError> {
		let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = $1")
			.bind(post_id)
			.fetch_one(&self.pool)
			.await?;
		Ok(count)
	}

	async fn latest_comments(
		&self,
		post_id: Uuid,
		limit: i64,
	) -> Result<Vec<CommentWithUser>, StoreError> {
		let query = format!(
			r#"
			SELECT {COMMENT_COLUMNS}
			FROM comments c
			JOIN users u ON u.id = c.user_id
			WHERE c.post_id = $1
			ORDER BY c.created_at DESC, c.id DESC
			LIMIT $2
			"#
		);
		let rows = sqlx::query_as::<_, CommentRow>(&query)
			.bind(post_id)
			.bind(limit)
			.fetch_all(&self.pool)
			.await?;
		Ok(rows.into_iter().map(Into::into).collect())
	}

	async fn list_comments(
		&self,
		post_id: Uuid,
	) -> Result<Vec<CommentWithUser>, StoreError> {
		let query = format!(
			r#"
			SELECT {COMMENT_COLUMNS}
			FROM comments c
			JOIN users u ON u.id = c.user_id
			WHERE c.post_id = $1
			ORDER BY c.created_at ASC, c.id ASC
			"#
		);
		let rows = sqlx::query_as::<_, CommentRow>(&query)
			.bind(post_id)
			.fetch_all(&self.pool)
			.await?;
		Ok(rows.into_iter().map(Into::into).collect())
	}

	async fn find_comment(
		&self,
		comment_id: Uuid,
	) -> Result<Option<Comment>, StoreError> {
		let comment = sqlx::query_as::<_, Comment>(
			r#"
			SELECT id, post_id, user_id, content, created_at, updated_at
			FROM comments
			WHERE id = $1
			"#,
		)
		.bind(comment_id)
		.fetch_optional(&self.pool)
		.await?;
		Ok(comment)
	}

	async fn insert_comment(
		&self,
		post_id: Uuid,
		user_id: Uuid,
		content: &str,
	) -> Result<Comment, StoreError> {
		let comment = sqlx::query_as::<_, Comment>(
			r#"
			INSERT INTO comments (id, post_id, user_id, content)
			VALUES ($1, $2, $3, $4)
			RETURNING id, post_id, user_id, content, created_at, updated_at
			"#,
		)
		.bind(Uuid::new_v4())
		.bind(post_id)
		.bind(user_id)
		.bind(content)
		.fetch_one(&self.pool)
		.await?;
		Ok(comment)
	}

	async fn delete_comment(
		&self,
		comment_id: Uuid,
	) -> Result<bool, StoreError> {
		let result = sqlx::query("DELETE FROM comments WHERE id = $1")
			.bind(comment_id)
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected() > 0)
	}

	async fn insert_follow(
		&self,
		follower_id: Uuid,
		following_id: Uuid,
	) -> Result<Follow, StoreError> {
		let follow = sqlx::query_as::<_, Follow>(
			r#"
			INSERT INTO follows (id, follower_id, following_id)
			VALUES ($1, $2, $3)
			RETURNING id, follower_id, following_id, created_at
			"#,
		)
		.bind(Uuid::new_v4())
		.bind(follower_id)
		.bind(following_id)
		.fetch_one(&self.pool)
		.await?;
		Ok(follow)
	}

	async fn delete_follow(
		&self,
		follower_id: Uuid,
		following_id: Uuid,
	) -> Result<bool, StoreError> {
		let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
			.bind(follower_id)
			.bind(following_id)
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected() > 0)
	}
}
