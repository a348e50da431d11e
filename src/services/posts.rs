use futures::future::join_all;
use uuid::Uuid;

use super::{parse_path_id, resolve_caller, resolve_viewer};
use crate::common::middleware_identity::Identity;
use crate::domain::{
	pagination::{ListPostsQuery, PageWindow},
	post::{commands::CreatePost, NewPost, Post, PostWithStats, COMMENT_PREVIEW_LEN},
};
use crate::services::response::{DeletePostResponse, PostsResponse, ServiceError};
use crate::state::AppState;

pub struct PostHandler;
impl PostHandler {
	/// One page of the feed, newest first. `userId` narrows it to one author.
	pub async fn list(
		state: &AppState,
		identity: &Identity,
		query: ListPostsQuery,
	) -> Result<PostsResponse, ServiceError> {
		let window = PageWindow::parse(query.page.as_deref(), state.posts_per_page)?;

		let author_id = match query.user_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
			Some(external_id) => match state.store.find_user_by_external_id(external_id).await? {
				Some(author) => Some(author.id),
				None => {
					return Ok(PostsResponse {
						posts: Vec::new(),
						has_more: false,
						page: window.page,
					})
				}
			},
			None => None,
		};
		let viewer_id = resolve_viewer(state, identity.subject()).await?.map(|viewer| viewer.id);

		let posts = state.store.list_posts(author_id, window.offset, window.limit).await?;
		let posts = join_all(posts.into_iter().map(|post| Self::decorate(state, post, viewer_id))).await;

		let total = state.store.count_posts(author_id).await?;
		let has_more = window.has_more(total);
		tracing::debug!(page = window.page, returned = posts.len(), total, has_more, "Listed posts");

		Ok(PostsResponse {
			posts,
			has_more,
			page: window.page,
		})
	}

	/// Adds the comment preview and the viewer's like state to a feed row.
	/// Failed lookups degrade to no preview and `isLiked: false`.
	async fn decorate(
		state: &AppState,
		mut post: PostWithStats,
		viewer_id: Option<Uuid>,
	) -> PostWithStats {
		if post.comments_count > 0 {
			match state.store.latest_comments(post.post.id, COMMENT_PREVIEW_LEN).await {
				Ok(comments) => post.comments = comments,
				Err(err) => tracing::warn!(post_id = %post.post.id, error = %err, "Comment preview lookup failed"),
			}
		}
		if let Some(viewer_id) = viewer_id {
			match state.store.has_liked(post.post.id, viewer_id).await {
				Ok(liked) => post.is_liked = liked,
				Err(err) => tracing::warn!(post_id = %post.post.id, error = %err, "Like state lookup failed"),
			}
		}
		post
	}

	/// Full post with every comment, oldest first.
	pub async fn get(
		state: &AppState,
		identity: &Identity,
		post_id: &str,
	) -> Result<PostWithStats, ServiceError> {
		let post_id = parse_path_id(post_id, "post")?;
		let viewer = resolve_viewer(state, identity.subject()).await?;

		let found = state
			.store
			.find_post(post_id)
			.await?
			.ok_or_else(|| ServiceError::NotFound("post not found".into()))?;

		let likes_count = state.store.count_likes(post_id).await?;
		let comments_count = state.store.count_comments(post_id).await?;
		let comments = state.store.list_comments(post_id).await?;
		let is_liked = match viewer {
			Some(viewer) => state.store.has_liked(post_id, viewer.id).await?,
			None => false,
		};

		Ok(PostWithStats {
			post: found.post,
			user: found.user,
			likes_count,
			comments_count,
			comments,
			is_liked,
		})
	}

	/// Uploads the image, then records the post. If recording fails the
	/// uploaded object is removed again; a failure there is only logged.
	pub async fn create(
		state: &AppState,
		identity: &Identity,
		form: CreatePost,
	) -> Result<Post, ServiceError> {
		let subject = identity.require()?;
		let upload = form.validate()?;
		let owner = resolve_caller(state, subject).await?;

		let path = format!("{}/{}.{}", owner.id, Uuid::new_v4(), upload.extension);
		let image_url = state.storage.upload(&path, &upload.content_type, upload.bytes).await?;

		let inserted = state
			.store
			.insert_post(NewPost {
				user_id: owner.id,
				image_url,
				caption: upload.caption,
			})
			.await;

		match inserted {
			Ok(post) => {
				tracing::info!(post_id = %post.id, user_id = %owner.id, "Post created");
				Ok(post)
			}
			Err(err) => {
				if let Err(cleanup) = state.storage.remove(&path).await {
					tracing::error!(path = %path, error = %cleanup, "Failed to remove orphaned upload");
				}
				Err(err.into())
			}
		}
	}

	/// Owner-only delete. Comments and likes go with the post; the stored image
	/// is removed in the background and a failure there is only logged.
	pub async fn delete(
		state: &AppState,
		identity: &Identity,
		post_id: &str,
	) -> Result<DeletePostResponse, ServiceError> {
		let subject = identity.require()?;
		let post_id = parse_path_id(post_id, "post")?;
		let caller = resolve_caller(state, subject).await?;

		let found = state
			.store
			.find_post(post_id)
			.await?
			.ok_or_else(|| ServiceError::NotFound("post not found".into()))?;
		if found.post.user_id != caller.id {
			tracing::warn!(post_id = %post_id, user_id = %caller.id, "Refused to delete another user's post");
			return Err(ServiceError::Forbidden("you can only delete your own posts".into()));
		}

		if !state.store.delete_post(post_id, caller.id).await? {
			return Err(ServiceError::NotFound("post not found".into()));
		}
		tracing::info!(post_id = %post_id, "Post deleted");

		match state.storage.path_from_public_url(&found.post.image_url) {
			Some(path) => {
				let storage = state.storage.clone();
				tokio::spawn(async move {
					if let Err(err) = storage.remove(&path).await {
						tracing::error!(path = %path, error = %err, "Failed to remove post image, ignoring");
					}
				});
			}
			None => tracing::warn!(image_url = %found.post.image_url, "Post image is not a storage object, skipping removal"),
		}

		Ok(DeletePostResponse {
			success: true,
			message: "post deleted".into(),
		})
	}
}
