use std::{
	collections::HashMap,
	sync::atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{FeedStore, StoreError};
use crate::domain::{
	comment::{Comment, CommentWithUser},
	follow::Follow,
	like::Like,
	post::{NewPost, Post, PostWithStats, PostWithUser},
	user::{User, UserStats, UserSummary},
};

#[derive(Default)]
struct Tables {
	users: HashMap<Uuid, User>,
	posts: HashMap<Uuid, Post>,
	comments: HashMap<Uuid, Comment>,
	likes: Vec<Like>,
	follows: Vec<Follow>,
	/// Last timestamp handed out; keeps insertion order strictly increasing.
	clock: Option<DateTime<Utc>>,
}

impl Tables {
	fn now(&mut self) -> DateTime<Utc> {
		let mut now = Utc::now();
		if let Some(last) = self.clock {
			if now <= last {
				now = last + Duration::microseconds(1);
			}
		}
		self.clock = Some(now);
		now
	}

	fn summary(
		&self,
		user_id: Uuid,
	) -> Result<UserSummary, StoreError> {
		self.users
			.get(&user_id)
			.map(UserSummary::from)
			.ok_or(StoreError::ForeignKeyViolation)
	}

	fn with_user(
		&self,
		comment: &Comment,
	) -> Result<CommentWithUser, StoreError> {
		Ok(CommentWithUser {
			user: self.summary(comment.user_id)?,
			comment: comment.clone(),
		})
	}

	fn comments_of(
		&self,
		post_id: Uuid,
	) -> Vec<&Comment> {
		let mut comments: Vec<&Comment> = self.comments.values().filter(|c| c.post_id == post_id).collect();
		comments.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
		comments
	}
}

/// In-process store with the same integrity rules as the Postgres schema.
/// Used by tests and for running the service without a database.
#[derive(Default)]
pub struct InMemoryFeedStore {
	tables: RwLock<Tables>,
	unavailable: AtomicBool,
}

impl InMemoryFeedStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// While set, every write fails with [`StoreError::Unavailable`].
	pub fn set_unavailable(
		&self,
		unavailable: bool,
	) {
		self.unavailable.store(unavailable, Ordering::SeqCst);
	}

	fn check_writable(&self) -> Result<(), StoreError> {
		if self.unavailable.load(Ordering::SeqCst) {
			return Err(StoreError::Unavailable);
		}
		Ok(())
	}
}

#[async_trait]
impl FeedStore for InMemoryFeedStore {
	async fn find_user_by_external_id(
		&self,
		external_id: &str,
	) -> Result<Option<User>, StoreError> {
		let tables = self.tables.read().await;
		Ok(tables.users.values().find(|u| u.external_id == external_id).cloned())
	}

	async fn upsert_user(
		&self,
		external_id: &str,
		name: &str,
	) -> Result<User, StoreError> {
		self.check_writable()?;
		let mut tables = self.tables.write().await;
		if let Some(user) = tables.users.values_mut().find(|u| u.external_id == external_id) {
			user.name = name.to_string();
			return Ok(user.clone());
		}
		let user = User {
			id: Uuid::new_v4(),
			external_id: external_id.to_string(),
			name: name.to_string(),
			created_at: tables.now(),
		};
		tables.users.insert(user.id, user.clone());
		Ok(user)
	}

	async fn user_stats(
		&self,
		user_id: Uuid,
	) -> Result<UserStats, StoreError> {
		let tables = self.tables.read().await;
		Ok(UserStats {
			posts_count: tables.posts.values().filter(|p| p.user_id == user_id).count() as i64,
			followers_count: tables.follows.iter().filter(|f| f.following_id == user_id).count() as i64,
			following_count: tables.follows.iter().filter(|f| f.follower_id == user_id).count() as i64,
		})
	}

	async fn is_following(
		&self,
		follower_id: Uuid,
		following_id: Uuid,
	) -> Result<bool, StoreError> {
		let tables = self.tables.read().await;
		Ok(tables
			.follows
			.iter()
			.any(|f| f.follower_id == follower_id && f.following_id == following_id))
	}

	async fn list_posts(
		&self,
		author_id: Option<Uuid>,
		offset: i64,
		limit: i64,
	) -> Result<Vec<PostWithStats>, StoreError> {
		let tables = self.tables.read().await;
		let mut posts: Vec<&Post> = tables
			.posts
			.values()
			.filter(|p| author_id.map_or(true, |author| p.user_id == author))
			.collect();
		posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

		posts
			.into_iter()
			.skip(offset.max(0) as usize)
			.take(limit.max(0) as usize)
			.map(|post| {
				Ok(PostWithStats {
					user: tables.summary(post.user_id)?,
					likes_count: tables.likes.iter().filter(|l| l.post_id == post.id).count() as i64,
					comments_count: tables.comments.values().filter(|c| c.post_id == post.id).count() as i64,
					comments: Vec::new(),
					is_liked: false,
					post: post.clone(),
				})
			})
			.collect()
	}

	async fn count_posts(
		&self,
		author_id: Option<Uuid>,
	) -> Result<i64, StoreError> {
		let tables = self.tables.read().await;
		Ok(tables
			.posts
			.values()
			.filter(|p| author_id.map_or(true, |author| p.user_id == author))
			.count() as i64)
	}

	async fn find_post(
		&self,
		post_id: Uuid,
	) -> Result<Option<PostWithUser>, StoreError> {
		let tables = self.tables.read().await;
		match tables.posts.get(&post_id) {
			Some(post) => Ok(Some(PostWithUser {
				user: tables.summary(post.user_id)?,
				post: post.clone(),
			})),
			None => Ok(None),
		}
	}

	async fn insert_post(
		&self,
		post: NewPost,
	) -> Result<Post, StoreError> {
		self.check_writable()?;
		let mut tables = self.tables.write().await;
		if !tables.users.contains_key(&post.user_id) {
			return Err(StoreError::ForeignKeyViolation);
		}
		let now = tables.now();
		let post = Post {
			id: Uuid::new_v4(),
			user_id: post.user_id,
			image_url: post.image_url,
			caption: post.caption,
			created_at: now,
			updated_at: now,
		};
		tables.posts.insert(post.id, post.clone());
		Ok(post)
	}

	async fn delete_post(
		&self,
		post_id: Uuid,
		owner_id: Uuid,
	) -> Result<bool, StoreError> {
		self.check_writable()?;
		let mut tables = self.tables.write().await;
		match tables.posts.get(&post_id) {
			Some(post) if post.user_id == owner_id => {}
			_ => return Ok(false),
		}
		tables.posts.remove(&post_id);
		// cascade
		tables.comments.retain(|_, c| c.post_id != post_id);
		tables.likes.retain(|l| l.post_id != post_id);
		Ok(true)
	}

	async fn count_likes(
		&self,
		post_id: Uuid,
	) -> Result<i64, StoreError> {
		let tables = self.tables.read().await;
		Ok(tables.likes.iter().filter(|l| l.post_id == post_id).count() as i64)
	}

	async fn has_liked(
		&self,
		post_id: Uuid,
		user_id: Uuid,
	) -> Result<bool, StoreError> {
		let tables = self.tables.read().await;
		Ok(tables.likes.iter().any(|l| l.post_id == post_id && l.user_id == user_id))
	}

	async fn insert_like(
		&self,
		post_id: Uuid,
		user_id: Uuid,
	) -> Result<Like, StoreError> {
		self.check_writable()?;
		let mut tables = self.tables.write().await;
		if !tables.posts.contains_key(&post_id) || !tables.users.contains_key(&user_id) {
			return Err(StoreError::ForeignKeyViolation);
		}
		if tables.likes.iter().any(|l| l.post_id == post_id && l.user_id == user_id) {
			return Err(StoreError::UniqueViolation);
		}
		let like = Like {
			id: Uuid::new_v4(),
			post_id,
			user_id,
			created_at: tables.now(),
		};
		tables.likes.push(like.clone());
		Ok(like)
	}

	async fn delete_like(
		&self,
		post_id: Uuid,
		user_id: Uuid,
	) -> Result<bool, StoreError> {
		self.check_writable()?;
		let mut tables = self.tables.write().await;
		let before = tables.likes.len();
		tables.likes.retain(|l| !(l.post_id == post_id && l.user_id == user_id));
		Ok(tables.likes.len() < before)
	}

	async fn count_comments(
		&self,
		post_id: Uuid,
	) -> Result<i64, StoreError> {
		let tables = self.tables.read().await;
		Ok(tables.comments.values().filter(|c| c.post_id == post_id).count() as i64)
	}

	async fn latest_comments(
		&self,
		post_id: Uuid,
		limit: i64,
	) -> Result<Vec<CommentWithUser>, StoreError> {
		let tables = self.tables.read().await;
		tables
			.comments_of(post_id)
			.into_iter()
			.rev()
			.take(limit.max(0) as usize)
			.map(|c| tables.with_user(c))
			.collect()
	}

	async fn list_comments(
		&self,
		post_id: Uuid,
	) -> Result<Vec<CommentWithUser>, StoreError> {
		let tables = self.tables.read().await;
		tables.comments_of(post_id).into_iter().map(|c| tables.with_user(c)).collect()
	}

	async fn find_comment(
		&self,
		comment_id: Uuid,
	) -> Result<Option<Comment>, StoreError> {
		let tables = self.tables.read().await;
		Ok(tables.comments.get(&comment_id).cloned())
	}

	async fn insert_comment(
		&self,
		post_id: Uuid,
		user_id: Uuid,
		content: &str,
	) -> Result<Comment, StoreError> {
		self.check_writable()?;
		let mut tables = self.tables.write().await;
		if !tables.posts.contains_key(&post_id) || !tables.users.contains_key(&user_id) {
			return Err(StoreError::ForeignKeyViolation);
		}
		let now = tables.now();
		let comment = Comment {
			id: Uuid::new_v4(),
			post_id,
			user_id,
			content: content.to_string(),
			created_at: now,
			updated_at: now,
		};
		tables.comments.insert(comment.id, comment.clone());
		Ok(comment)
	}

	async fn delete_comment(
		&self,
		comment_id: Uuid,
	) -> Result<bool, StoreError> {
		self.check_writable()?;
		let mut tables = self.tables.write().await;
		Ok(tables.comments.remove(&comment_id).is_some())
	}

	async fn insert_follow(
		&self,
		follower_id: Uuid,
		following_id: Uuid,
	) -> Result<Follow, StoreError> {
		self.check_writable()?;
		let mut tables = self.tables.write().await;
		if follower_id == following_id {
			return Err(StoreError::CheckViolation);
		}
		if !tables.users.contains_key(&follower_id) || !tables.users.contains_key(&following_id) {
			return Err(StoreError::ForeignKeyViolation);
		}
		if tables
			.follows
			.iter()
			.any(|f| f.follower_id == follower_id && f.following_id == following_id)
		{
			return Err(StoreError::UniqueViolation);
		}
		let follow = Follow {
			id: Uuid::new_v4(),
			follower_id,
			following_id,
			created_at: tables.now(),
		};
		tables.follows.push(follow.clone());
		Ok(follow)
	}

	async fn delete_follow(
		&self,
		follower_id: Uuid,
		following_id: Uuid,
	) -> Result<bool, StoreError> {
		self.check_writable()?;
		let mut tables = self.tables.write().await;
		let before = tables.follows.len();
		tables
			.follows
			.retain(|f| !(f.follower_id == follower_id && f.following_id == following_id));
		Ok(tables.follows.len() < before)
	}
}
