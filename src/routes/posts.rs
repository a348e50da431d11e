use axum::{
	extract::{multipart::MultipartRejection, Multipart, Path, Query, State},
	http::StatusCode,
	Extension, Json,
};
use axum_macros::debug_handler;

use crate::common::middleware_identity::Identity;
use crate::domain::{
	pagination::ListPostsQuery,
	post::{
		commands::{CreatePost, ImageUpload},
		PostWithStats,
	},
};
use crate::services::{
	response::{CreatePostResponse, DeletePostResponse, PostsResponse, ServiceError},
	PostHandler,
};
use crate::state::AppState;

pub async fn list_posts(
	State(state): State<AppState>,
	Extension(identity): Extension<Identity>,
	Query(query): Query<ListPostsQuery>,
) -> Result<Json<PostsResponse>, ServiceError> {
	Ok(Json(PostHandler::list(&state, &identity, query).await?))
}

pub async fn get_post(
	State(state): State<AppState>,
	Extension(identity): Extension<Identity>,
	Path(id): Path<String>,
) -> Result<Json<PostWithStats>, ServiceError> {
	Ok(Json(PostHandler::get(&state, &identity, &id).await?))
}

#[debug_handler]
pub async fn create_post(
	State(state): State<AppState>,
	Extension(identity): Extension<Identity>,
	multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<CreatePostResponse>), ServiceError> {
	identity.require()?;
	let form = read_form(multipart).await?;
	let post = PostHandler::create(&state, &identity, form).await?;
	Ok((StatusCode::CREATED, Json(CreatePostResponse { post })))
}

pub async fn delete_post(
	State(state): State<AppState>,
	Extension(identity): Extension<Identity>,
	Path(id): Path<String>,
) -> Result<Json<DeletePostResponse>, ServiceError> {
	Ok(Json(PostHandler::delete(&state, &identity, &id).await?))
}

/// Collects the `image` and `caption` fields; unknown fields are skipped.
async fn read_form(multipart: Result<Multipart, MultipartRejection>) -> Result<CreatePost, ServiceError> {
	let mut multipart = multipart.map_err(|err| ServiceError::BadRequest(format!("expected a multipart form: {err}")))?;
	let mut form = CreatePost::default();

	while let Some(field) = multipart.next_field().await.map_err(malformed)? {
		let name = field.name().unwrap_or_default().to_string();
		match name.as_str() {
			"image" => {
				let content_type = field.content_type().unwrap_or_default().to_string();
				let bytes = field.bytes().await.map_err(malformed)?;
				form.image = Some(ImageUpload { content_type, bytes });
			}
			"caption" => form.caption = Some(field.text().await.map_err(malformed)?),
			_ => continue,
		}
	}
	Ok(form)
}

fn malformed(err: axum::extract::multipart::MultipartError) -> ServiceError {
	ServiceError::BadRequest(format!("malformed multipart body: {err}"))
}
