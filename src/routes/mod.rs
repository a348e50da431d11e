mod comments;
mod follows;
mod likes;
mod posts;
mod users;

use axum::{
	extract::DefaultBodyLimit,
	middleware,
	routing::{delete, get, post},
	Router,
};

use crate::common::middleware_identity::set_identity;
use crate::domain::post::commands::MAX_IMAGE_BYTES;
use crate::state::AppState;

/// Room for a maximal image plus the caption and multipart framing.
const MAX_BODY_BYTES: usize = MAX_IMAGE_BYTES + 1024 * 1024;

pub fn create_routes(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/posts", get(posts::list_posts).post(posts::create_post))
		.route("/posts/:id", get(posts::get_post).delete(posts::delete_post))
		.route("/comments", post(comments::create_comment))
		.route("/comments/:id", delete(comments::delete_comment))
		.route("/likes", post(likes::like_post).delete(likes::unlike_post))
		.route("/follows", post(follows::follow_user).delete(follows::unfollow_user))
		.route("/users", post(users::sync_user))
		.route("/users/:external_id", get(users::get_user))
		.layer(middleware::from_fn_with_state(state.clone(), set_identity))
		.layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
		.with_state(state)
}

async fn health() -> &'static str {
	"ok"
}
