use axum::extract::State;
use axum::headers::{authorization::Bearer, Authorization};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use axum::TypedHeader;

use crate::services::response::ServiceError;
use crate::state::AppState;

/// External identity subject of the caller, `None` for anonymous requests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Identity(pub Option<String>);

impl Identity {
	pub fn subject(&self) -> Option<&str> {
		self.0.as_deref()
	}

	pub fn require(&self) -> Result<&str, ServiceError> {
		self.subject().ok_or(ServiceError::Unauthenticated)
	}
}

/// Verifies the bearer token, if any, and stores the resulting [`Identity`]
/// in the request extensions. Invalid tokens are treated as anonymous so
/// public reads keep working; mutating handlers reject anonymous callers.
pub async fn set_identity<B>(
	State(state): State<AppState>,
	bearer: Option<TypedHeader<Authorization<Bearer>>>,
	mut request: Request<B>,
	next: Next<B>,
) -> Response {
	let subject = bearer.and_then(|TypedHeader(Authorization(bearer))| match state.identity.verify(bearer.token()) {
		Ok(subject) => Some(subject),
		Err(err) => {
			tracing::debug!(error = %err, "Rejected session token");
			None
		}
	});

	request.extensions_mut().insert(Identity(subject));
	next.run(request).await
}

#[test]
fn test_require() {
	assert!(matches!(Identity(None).require(), Err(ServiceError::Unauthenticated)));
	assert_eq!(Identity(Some("user_1".into())).require().unwrap(), "user_1");
}
