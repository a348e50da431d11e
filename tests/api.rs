mod common;

use axum::http::{Method, StatusCode};
use feed::adapters::repositories::FeedStore;
use serde_json::json;

use common::{app, request, token, upload};

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

#[tokio::test]
async fn test_health() {
	let app = app(10);
	let (status, body) = app.call(request(Method::GET, "/health", None, None)).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_post_lifecycle() {
	'_given: {
		let app = app(10);
		let (_, owner_token) = app.user().await;
		let (_, viewer_token) = app.user().await;

		'_when: {
			let (status, created) = app.call(upload(Some(&owner_token), Some(("image/png", PNG)), Some("first light"))).await;
			assert_eq!(status, StatusCode::CREATED);
			assert_eq!(created["post"]["caption"], "first light");
			let post_id = created["post"]["id"].as_str().unwrap().to_string();
			assert_eq!(app.storage.len(), 1);

			let (status, liked) = app.call(request(Method::POST, "/likes", Some(&viewer_token), Some(json!({ "postId": post_id })))).await;
			assert_eq!(status, StatusCode::OK);
			assert_eq!(liked, json!({ "success": true, "liked": true }));

			let (status, comment) = app
				.call(request(Method::POST, "/comments", Some(&viewer_token), Some(json!({ "postId": post_id, "content": "great" }))))
				.await;
			assert_eq!(status, StatusCode::CREATED);
			assert_eq!(comment["comment"]["content"], "great");

			let (status, listed) = app.call(request(Method::GET, "/posts?page=1", Some(&viewer_token), None)).await;
			assert_eq!(status, StatusCode::OK);
			assert_eq!(listed["hasMore"], false);
			assert_eq!(listed["page"], 1);
			let item = &listed["posts"][0];
			assert_eq!(item["likes_count"], 1);
			assert_eq!(item["comments_count"], 1);
			assert_eq!(item["isLiked"], true);
			assert_eq!(item["comments"][0]["content"], "great");

			let (status, _) = app.call(request(Method::DELETE, &format!("/posts/{post_id}"), Some(&viewer_token), None)).await;
			assert_eq!(status, StatusCode::FORBIDDEN);
			assert_eq!(app.storage.len(), 1);

			let (status, deleted) = app.call(request(Method::DELETE, &format!("/posts/{post_id}"), Some(&owner_token), None)).await;
			assert_eq!(status, StatusCode::OK);
			assert_eq!(deleted["success"], true);
			for _ in 0..16 {
				tokio::task::yield_now().await;
			}
			assert!(app.storage.is_empty());

			let (status, _) = app.call(request(Method::GET, &format!("/posts/{post_id}"), None, None)).await;
			assert_eq!(status, StatusCode::NOT_FOUND);
		}
	}
}

#[tokio::test]
async fn test_mutations_require_identity() {
	let app = app(10);

	let (status, body) = app.call(request(Method::POST, "/likes", None, Some(json!({ "postId": uuid::Uuid::new_v4() })))).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert!(body["error"].is_string());

	// Identity is checked before the payload is looked at.
	let (status, _) = app.call(upload(None, None, None)).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);

	let (status, _) = app.call(request(Method::POST, "/follows", Some("not-a-jwt"), Some(json!({ "followingId": "x" })))).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);

	// A bad token on a public read is just an anonymous caller.
	let (status, _) = app.call(request(Method::GET, "/posts", Some("not-a-jwt"), None)).await;
	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_caller_is_not_found() {
	let app = app(10);
	let (status, _) = app
		.call(request(Method::POST, "/users", Some(&token("ghost")), Some(json!({ "name": "Ghost" }))))
		.await;
	assert_eq!(status, StatusCode::OK);

	let (status, body) = app
		.call(request(Method::POST, "/likes", Some(&token("never-synced")), Some(json!({ "postId": uuid::Uuid::new_v4() }))))
		.await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["error"], "user not found");
}

#[tokio::test]
async fn test_pagination_over_http() {
	let app = app(10);
	let (author, _) = app.user().await;
	for _ in 0..12 {
		app.post(&author).await;
	}

	let (status, second) = app.call(request(Method::GET, "/posts?page=2", None, None)).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(second["posts"].as_array().unwrap().len(), 2);
	assert_eq!(second["hasMore"], false);

	for bad in ["0", "-1", "abc", "922337203685477581"] {
		let (status, _) = app.call(request(Method::GET, &format!("/posts?page={bad}"), None, None)).await;
		assert_eq!(status, StatusCode::BAD_REQUEST, "page={bad}");
	}

	let (_, grid) = app.call(request(Method::GET, &format!("/posts?userId={}", author.external_id), None, None)).await;
	assert_eq!(grid["posts"].as_array().unwrap().len(), 10);
	assert_eq!(grid["hasMore"], true);
}

#[tokio::test]
async fn test_upload_validation() {
	let app = app(10);
	let (_, owner_token) = app.user().await;

	let (status, _) = app.call(upload(Some(&owner_token), Some(("image/gif", PNG)), None)).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, _) = app.call(upload(Some(&owner_token), None, Some("caption only"))).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let long_caption = "c".repeat(2201);
	let (status, _) = app.call(upload(Some(&owner_token), Some(("image/png", PNG)), Some(&long_caption))).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let oversized = vec![0u8; 5 * 1024 * 1024 + 1];
	let (status, _) = app.call(upload(Some(&owner_token), Some(("image/jpeg", &oversized)), None)).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	assert!(app.storage.is_empty());
}

#[tokio::test]
async fn test_path_ids_that_are_not_uuids() {
	let app = app(10);
	let (_, owner_token) = app.user().await;

	let (status, _) = app.call(request(Method::GET, "/posts/not-a-uuid", None, None)).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, _) = app.call(request(Method::DELETE, "/comments/42", Some(&owner_token), None)).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_follow_flow_and_profile() {
	let app = app(10);
	let (alice, alice_token) = app.user().await;
	let (bob, _) = app.user().await;
	let follow = || json!({ "followingId": bob.external_id });

	let (status, first) = app.call(request(Method::POST, "/follows", Some(&alice_token), Some(follow()))).await;
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(first["success"], true);
	assert!(first["follow"].is_object());

	let (status, again) = app.call(request(Method::POST, "/follows", Some(&alice_token), Some(follow()))).await;
	assert_eq!(status, StatusCode::OK);
	assert!(again.get("follow").is_none());

	let (status, _) = app
		.call(request(Method::POST, "/follows", Some(&alice_token), Some(json!({ "followingId": alice.external_id }))))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, profile) = app.call(request(Method::GET, &format!("/users/{}", bob.external_id), Some(&alice_token), None)).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(profile["isFollowing"], true);
	assert_eq!(profile["isOwnProfile"], false);
	assert_eq!(profile["followers_count"], 1);

	let (status, _) = app.call(request(Method::DELETE, "/follows", Some(&alice_token), Some(follow()))).await;
	assert_eq!(status, StatusCode::OK);
	assert!(!app.store.is_following(alice.id, bob.id).await.unwrap());
}

#[tokio::test]
async fn test_malformed_json_body() {
	let app = app(10);
	let (_, viewer_token) = app.user().await;

	let (status, _) = app.call(request(Method::POST, "/comments", Some(&viewer_token), None)).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, _) = app
		.call(request(Method::POST, "/likes", Some(&viewer_token), Some(json!({ "postId": "nope" }))))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_every_external_id_is_addressable() {
	let app = app(10);
	app.store.upsert_user("sync", "Sync").await.unwrap();

	let (status, profile) = app.call(request(Method::GET, "/users/sync", None, None)).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(profile["name"], "Sync");

	let (status, _) = app.call(request(Method::POST, "/users", Some(&token("sync")), Some(json!({ "name": "Renamed" })))).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(app.store.find_user_by_external_id("sync").await.unwrap().unwrap().name, "Renamed");
}
