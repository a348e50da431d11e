use std::sync::Arc;

use uuid::Uuid;

use super::{ClientError, FeedClient};
use crate::domain::{comment::CommentWithUser, post::PostWithStats};

/// Infinite-scroll state of the feed, or of one author's grid when built with
/// [`FeedPager::for_author`].
pub struct FeedPager {
	client: Arc<FeedClient>,
	author: Option<String>,
	posts: Vec<PostWithStats>,
	page: i64,
	has_more: bool,
	error: Option<String>,
}

impl FeedPager {
	pub fn new(client: Arc<FeedClient>) -> Self {
		Self {
			client,
			author: None,
			posts: Vec::new(),
			page: 0,
			has_more: true,
			error: None,
		}
	}

	pub fn for_author(
		client: Arc<FeedClient>,
		external_id: impl Into<String>,
	) -> Self {
		Self {
			author: Some(external_id.into()),
			..Self::new(client)
		}
	}

	pub fn posts(&self) -> &[PostWithStats] {
		&self.posts
	}

	/// Last page loaded successfully, 0 before the first load.
	pub fn page(&self) -> i64 {
		self.page
	}

	pub fn has_more(&self) -> bool {
		self.has_more
	}

	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	/// Page 1 replaces the list, later pages append to it. A failed load keeps
	/// what is already shown.
	pub async fn load(
		&mut self,
		page: i64,
	) -> Result<(), ClientError> {
		match self.client.list_posts(page, self.author.as_deref()).await {
			Ok(response) => {
				if page == 1 {
					self.posts = response.posts;
				} else {
					self.posts.extend(response.posts);
				}
				self.page = response.page;
				self.has_more = response.has_more;
				self.error = None;
				Ok(())
			}
			Err(err) => {
				self.error = Some(err.to_string());
				Err(err)
			}
		}
	}

	pub async fn refresh(&mut self) -> Result<(), ClientError> {
		self.load(1).await
	}

	/// Loads the next page; does nothing once the server reported the end.
	pub async fn load_more(&mut self) -> Result<(), ClientError> {
		if !self.has_more {
			return Ok(());
		}
		self.load(self.page + 1).await
	}
}

/// Comments of an open post together with its comment count.
pub struct CommentThread {
	client: Arc<FeedClient>,
	post_id: Uuid,
	comments: Vec<CommentWithUser>,
	count: i64,
	error: Option<String>,
}

impl CommentThread {
	pub fn new(
		client: Arc<FeedClient>,
		post: &PostWithStats,
	) -> Self {
		Self {
			client,
			post_id: post.post.id,
			comments: post.comments.clone(),
			count: post.comments_count,
			error: None,
		}
	}

	pub fn comments(&self) -> &[CommentWithUser] {
		&self.comments
	}

	pub fn count(&self) -> i64 {
		self.count
	}

	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	/// Appends the comment once the server has stored it.
	pub async fn add(
		&mut self,
		content: &str,
	) -> Result<&CommentWithUser, ClientError> {
		match self.client.create_comment(self.post_id, content).await {
			Ok(comment) => {
				self.count += 1;
				self.error = None;
				self.comments.push(comment);
				Ok(&self.comments[self.comments.len() - 1])
			}
			Err(err) => {
				self.error = Some(err.to_string());
				Err(err)
			}
		}
	}

	/// Drops the comment locally before asking the server; on failure it is put
	/// back at its old position and the count is restored.
	pub async fn remove(
		&mut self,
		comment_id: Uuid,
	) -> Result<(), ClientError> {
		let Some(index) = self.comments.iter().position(|c| c.comment.id == comment_id) else {
			return Ok(());
		};
		let removed = self.comments.remove(index);
		let previous_count = self.count;
		self.count = (self.count - 1).max(0);
		self.error = None;

		match self.client.delete_comment(comment_id).await {
			Ok(_) => Ok(()),
			Err(err) => {
				self.comments.insert(index, removed);
				self.count = previous_count;
				self.error = Some(err.to_string());
				Err(err)
			}
		}
	}
}
