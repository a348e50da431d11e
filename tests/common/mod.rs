#![allow(dead_code)]

use std::sync::Arc;

use axum::{
	body::Body,
	http::{header, Method, Request, StatusCode},
	Router,
};
use chrono::{Duration, Utc};
use feed::{
	adapters::{
		identity::{JwtVerifier, SessionClaims},
		repositories::{FeedStore, InMemoryFeedStore},
		storage::InMemoryObjectStorage,
	},
	domain::{
		post::{NewPost, Post},
		user::User,
	},
	routes::create_routes,
	state::AppState,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use rand::{distributions::Alphanumeric, Rng};
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &[u8] = b"integration-secret";
pub const BOUNDARY: &str = "feed-test-boundary";

pub struct TestApp {
	pub store: Arc<InMemoryFeedStore>,
	pub storage: Arc<InMemoryObjectStorage>,
	pub router: Router,
}

pub fn app(posts_per_page: i64) -> TestApp {
	let store = Arc::new(InMemoryFeedStore::new());
	let storage = Arc::new(InMemoryObjectStorage::new());
	let state = AppState::new(store.clone(), storage.clone(), Arc::new(JwtVerifier::hs256(SECRET, None)), posts_per_page);
	TestApp {
		store,
		storage,
		router: create_routes(state),
	}
}

pub fn random_subject() -> String {
	let suffix: String = rand::thread_rng().sample_iter(&Alphanumeric).take(12).map(char::from).collect();
	format!("user_{suffix}")
}

pub fn token(subject: &str) -> String {
	let claims = SessionClaims {
		sub: subject.to_string(),
		exp: (Utc::now() + Duration::hours(1)).timestamp(),
		iss: None,
	};
	encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

impl TestApp {
	/// Registers a user with a random external id; returns it with a session token.
	pub async fn user(&self) -> (User, String) {
		let subject = random_subject();
		let user = self.store.upsert_user(&subject, &subject).await.unwrap();
		(user, token(&subject))
	}

	pub async fn post(
		&self,
		owner: &User,
	) -> Post {
		self.store
			.insert_post(NewPost {
				user_id: owner.id,
				image_url: format!("http://storage.local/storage/v1/object/public/uploads/{}/seed.png", owner.id),
				caption: None,
			})
			.await
			.unwrap()
	}

	pub async fn call(
		&self,
		request: Request<Body>,
	) -> (StatusCode, Value) {
		let response = self.router.clone().oneshot(request).await.unwrap();
		let status = response.status();
		let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
		let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
		(status, body)
	}
}

pub fn request(
	method: Method,
	uri: &str,
	token: Option<&str>,
	body: Option<Value>,
) -> Request<Body> {
	let mut builder = Request::builder().method(method).uri(uri);
	if let Some(token) = token {
		builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
	}
	match body {
		Some(body) => builder.header(header::CONTENT_TYPE, "application/json").body(Body::from(body.to_string())).unwrap(),
		None => builder.body(Body::empty()).unwrap(),
	}
}

/// `multipart/form-data` upload with an optional image part and caption.
pub fn upload(
	token: Option<&str>,
	image: Option<(&str, &[u8])>,
	caption: Option<&str>,
) -> Request<Body> {
	let mut body = Vec::new();
	if let Some((content_type, bytes)) = image {
		body.extend_from_slice(
			format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"photo\"\r\nContent-Type: {content_type}\r\n\r\n").as_bytes(),
		);
		body.extend_from_slice(bytes);
		body.extend_from_slice(b"\r\n");
	}
	if let Some(caption) = caption {
		body.extend_from_slice(format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"caption\"\r\n\r\n{caption}\r\n").as_bytes());
	}
	body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

	let mut builder = Request::builder()
		.method(Method::POST)
		.uri("/posts")
		.header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));
	if let Some(token) = token {
		builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
	}
	builder.body(Body::from(body)).unwrap()
}
