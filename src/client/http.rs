use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::ClientError;
use crate::domain::{
	comment::CommentWithUser,
	follow::FollowRequest,
	like::LikeRequest,
	post::PostWithStats,
	user::{User, UserProfile},
};
use crate::services::response::{
	CreateCommentResponse, DeleteCommentResponse, ErrorBody, FollowResponse, LikeResponse, PostsResponse, UserResponse,
};

/// Typed client for the feed REST API. A session token, when set, is sent as
/// a bearer token on every request.
pub struct FeedClient {
	http_client: Client,
	base_url: Url,
	token: Option<String>,
}

impl FeedClient {
	pub fn new(base_url: &str) -> Result<Self, ClientError> {
		let base_url = Url::parse(base_url).map_err(|err| ClientError::InvalidBaseUrl(err.to_string()))?;
		if base_url.cannot_be_a_base() {
			return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
		}
		let http_client = Client::builder().timeout(Duration::from_secs(30)).build()?;
		Ok(Self {
			http_client,
			base_url,
			token: None,
		})
	}

	pub fn with_token(
		mut self,
		token: impl Into<String>,
	) -> Self {
		self.token = Some(token.into());
		self
	}

	/// Each segment is percent-encoded, so ids may contain `/`, spaces and the like.
	fn request(
		&self,
		method: Method,
		segments: &[&str],
	) -> RequestBuilder {
		let mut url = self.base_url.clone();
		if let Ok(mut path) = url.path_segments_mut() {
			path.pop_if_empty().extend(segments);
		}
		let builder = self.http_client.request(method, url);
		match &self.token {
			Some(token) => builder.bearer_auth(token),
			None => builder,
		}
	}

	async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
		let response = builder.send().await?;
		let status = response.status();
		if status.is_success() {
			return Ok(response.json::<T>().await?);
		}

		let body = response.text().await.unwrap_or_default();
		let message = serde_json::from_str::<ErrorBody>(&body)
			.map(|body| body.error)
			.unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());
		Err(ClientError::Api {
			status: status.as_u16(),
			message,
		})
	}

	pub async fn list_posts(
		&self,
		page: i64,
		user_id: Option<&str>,
	) -> Result<PostsResponse, ClientError> {
		let mut builder = self.request(Method::GET, &["posts"]).query(&[("page", page.to_string())]);
		if let Some(user_id) = user_id {
			builder = builder.query(&[("userId", user_id)]);
		}
		Self::send(builder).await
	}

	pub async fn get_post(
		&self,
		post_id: Uuid,
	) -> Result<PostWithStats, ClientError> {
		Self::send(self.request(Method::GET, &["posts", &post_id.to_string()])).await
	}

	pub async fn create_comment(
		&self,
		post_id: Uuid,
		content: &str,
	) -> Result<CommentWithUser, ClientError> {
		let body = serde_json::json!({ "postId": post_id, "content": content });
		let response: CreateCommentResponse = Self::send(self.request(Method::POST, &["comments"]).json(&body)).await?;
		Ok(response.comment)
	}

	pub async fn delete_comment(
		&self,
		comment_id: Uuid,
	) -> Result<DeleteCommentResponse, ClientError> {
		Self::send(self.request(Method::DELETE, &["comments", &comment_id.to_string()])).await
	}

	pub async fn like(
		&self,
		post_id: Uuid,
	) -> Result<LikeResponse, ClientError> {
		self.like_request(Method::POST, post_id).await
	}

	pub async fn unlike(
		&self,
		post_id: Uuid,
	) -> Result<LikeResponse, ClientError> {
		self.like_request(Method::DELETE, post_id).await
	}

	async fn like_request(
		&self,
		method: Method,
		post_id: Uuid,
	) -> Result<LikeResponse, ClientError> {
		let body = LikeRequest {
			post_id: Some(post_id.to_string()),
		};
		Self::send(self.request(method, &["likes"]).json(&body)).await
	}

	pub async fn follow(
		&self,
		external_id: &str,
	) -> Result<FollowResponse, ClientError> {
		self.follow_request(Method::POST, external_id).await
	}

	pub async fn unfollow(
		&self,
		external_id: &str,
	) -> Result<FollowResponse, ClientError> {
		self.follow_request(Method::DELETE, external_id).await
	}

	async fn follow_request(
		&self,
		method: Method,
		external_id: &str,
	) -> Result<FollowResponse, ClientError> {
		let body = FollowRequest {
			following_id: Some(external_id.to_string()),
		};
		Self::send(self.request(method, &["follows"]).json(&body)).await
	}

	pub async fn get_user(
		&self,
		external_id: &str,
	) -> Result<UserProfile, ClientError> {
		Self::send(self.request(Method::GET, &["users", external_id])).await
	}

	pub async fn sync_user(
		&self,
		name: &str,
	) -> Result<User, ClientError> {
		let body = serde_json::json!({ "name": name });
		let response: UserResponse = Self::send(self.request(Method::POST, &["users"]).json(&body)).await?;
		Ok(response.user)
	}
}
