//! Request handling independent of HTTP plumbing.
//!
//! Every mutating operation runs the same chain, stopping at the first failure:
//! caller identity, payload validation, caller record, target record,
//! ownership, mutation. Additive relations (likes, follows) treat an existing
//! row as success.

pub mod comments;
pub mod follows;
pub mod likes;
pub mod posts;
pub mod response;
pub mod users;

use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::domain::user::User;
use crate::services::response::ServiceError;
use crate::state::AppState;

pub use comments::CommentHandler;
pub use follows::FollowHandler;
pub use likes::LikeHandler;
pub use posts::PostHandler;
pub use users::UserHandler;

pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ServiceError> {
	if body.is_empty() {
		return Err(ServiceError::BadRequest("request body is required".into()));
	}
	serde_json::from_slice(body).map_err(|err| ServiceError::BadRequest(format!("malformed request body: {err}")))
}

/// Path identifiers that do not parse cannot name an existing record.
pub(crate) fn parse_path_id(
	raw: &str,
	what: &str,
) -> Result<Uuid, ServiceError> {
	Uuid::parse_str(raw.trim()).map_err(|_| ServiceError::NotFound(format!("{what} not found")))
}

pub(crate) async fn resolve_caller(
	state: &AppState,
	subject: &str,
) -> Result<User, ServiceError> {
	state
		.store
		.find_user_by_external_id(subject)
		.await?
		.ok_or_else(|| ServiceError::NotFound("user not found".into()))
}

/// Internal id of the caller when signed in and known to the store.
pub(crate) async fn resolve_viewer(
	state: &AppState,
	subject: Option<&str>,
) -> Result<Option<User>, ServiceError> {
	match subject {
		Some(subject) => Ok(state.store.find_user_by_external_id(subject).await?),
		None => Ok(None),
	}
}
