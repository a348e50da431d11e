mod common;

use std::{
	net::{SocketAddr, TcpListener},
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc,
	},
};

use feed::{
	adapters::repositories::FeedStore,
	client::{follow_toggle, like_toggle, ClientError, CommentThread, FeedClient, FeedPager},
};

use common::{app, TestApp};

/// Serves the router on an ephemeral local port.
fn serve(app: &TestApp) -> SocketAddr {
	let listener = TcpListener::bind("127.0.0.1:0").unwrap();
	let addr = listener.local_addr().unwrap();
	let server = axum::Server::from_tcp(listener).unwrap().serve(app.router.clone().into_make_service());
	tokio::spawn(server);
	addr
}

fn client(
	addr: SocketAddr,
	token: &str,
) -> Arc<FeedClient> {
	Arc::new(FeedClient::new(&format!("http://{addr}")).unwrap().with_token(token))
}

#[tokio::test]
async fn test_like_toggle_round_trip() {
	'_given: {
		let app = app(10);
		let addr = serve(&app);
		let (author, _) = app.user().await;
		let (_, viewer_token) = app.user().await;
		let post = app.post(&author).await;
		let toggle = like_toggle(client(addr, &viewer_token), post.id, false, 0);

		'_when: {
			assert!(toggle.toggle().await.unwrap());
			assert_eq!(toggle.state().count, 1);
			assert_eq!(app.store.count_likes(post.id).await.unwrap(), 1);

			assert!(!toggle.toggle().await.unwrap());
			assert_eq!(toggle.state().count, 0);
			assert_eq!(app.store.count_likes(post.id).await.unwrap(), 0);
		}
	}
}

#[tokio::test]
async fn test_like_toggle_rolls_back_on_api_error() {
	let app = app(10);
	let addr = serve(&app);
	let (_, viewer_token) = app.user().await;
	let toggle = like_toggle(client(addr, &viewer_token), uuid::Uuid::new_v4(), false, 4);

	let result = toggle.toggle().await;
	assert!(matches!(result, Err(ClientError::Api { status: 404, .. })));

	let state = toggle.state();
	assert!(!state.active);
	assert_eq!(state.count, 4);
	assert_eq!(state.error.as_deref(), Some("post not found"));
}

#[tokio::test]
async fn test_follow_toggle_reports_success() {
	let app = app(10);
	let addr = serve(&app);
	let (alice, alice_token) = app.user().await;
	let (bob, _) = app.user().await;

	let confirmed = Arc::new(AtomicBool::new(false));
	let toggle = follow_toggle(client(addr, &alice_token), bob.external_id.clone(), false, 0).on_success({
		let confirmed = confirmed.clone();
		move |following| confirmed.store(following, Ordering::SeqCst)
	});

	toggle.toggle().await.unwrap();
	assert!(confirmed.load(Ordering::SeqCst));
	assert!(app.store.is_following(alice.id, bob.id).await.unwrap());

	let profile = client(addr, &alice_token).get_user(&bob.external_id).await.unwrap();
	assert!(profile.is_following);
	assert_eq!(profile.stats.followers_count, toggle.state().count);
}

#[tokio::test]
async fn test_pager_appends_until_exhausted() {
	let app = app(10);
	let addr = serve(&app);
	let (author, token) = app.user().await;
	for _ in 0..25 {
		app.post(&author).await;
	}
	let mut pager = FeedPager::new(client(addr, &token));

	pager.refresh().await.unwrap();
	assert_eq!(pager.posts().len(), 10);
	assert!(pager.has_more());

	pager.load_more().await.unwrap();
	pager.load_more().await.unwrap();
	assert_eq!(pager.posts().len(), 25);
	assert_eq!(pager.page(), 3);
	assert!(!pager.has_more());

	pager.load_more().await.unwrap();
	assert_eq!(pager.page(), 3);

	pager.refresh().await.unwrap();
	assert_eq!(pager.posts().len(), 10);
}

#[tokio::test]
async fn test_pager_keeps_posts_on_failure() {
	let app = app(10);
	let addr = serve(&app);
	let (author, token) = app.user().await;
	app.post(&author).await;
	let mut pager = FeedPager::new(client(addr, &token));
	pager.refresh().await.unwrap();

	assert!(pager.load(0).await.is_err());
	assert_eq!(pager.posts().len(), 1);
	assert!(pager.error().is_some());
}

#[tokio::test]
async fn test_comment_thread_restores_failed_removal() {
	let app = app(10);
	let addr = serve(&app);
	let (author, author_token) = app.user().await;
	let (_, guest_token) = app.user().await;
	let post = app.post(&author).await;

	let author_client = client(addr, &author_token);
	let detail = author_client.get_post(post.id).await.unwrap();
	let mut thread = CommentThread::new(author_client, &detail);
	thread.add("first").await.unwrap();
	thread.add("second").await.unwrap();
	assert_eq!(thread.count(), 2);

	let guest_client = client(addr, &guest_token);
	let guest_detail = guest_client.get_post(post.id).await.unwrap();
	let mut guest_thread = CommentThread::new(guest_client, &guest_detail);
	let first_id = guest_thread.comments()[0].comment.id;

	let result = guest_thread.remove(first_id).await;
	assert!(matches!(result, Err(ClientError::Api { status: 403, .. })));
	assert_eq!(guest_thread.comments()[0].comment.id, first_id);
	assert_eq!(guest_thread.count(), 2);

	let first_id = thread.comments()[0].comment.id;
	thread.remove(first_id).await.unwrap();
	assert_eq!(thread.count(), 1);
	assert_eq!(thread.comments()[0].comment.content, "second");
	assert_eq!(app.store.count_comments(post.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_user_ids_are_path_encoded() {
	let app = app(10);
	let addr = serve(&app);
	let (_, token) = app.user().await;
	app.store.upsert_user("ext with space/slash", "Odd").await.unwrap();

	let profile = client(addr, &token).get_user("ext with space/slash").await.unwrap();
	assert_eq!(profile.user.external_id, "ext with space/slash");
	assert!(!profile.is_own_profile);

	let synced = client(addr, &token).sync_user("Renamed").await.unwrap();
	assert_eq!(synced.name, "Renamed");
}

#[test]
fn test_rejects_unusable_base_url() {
	assert!(matches!(FeedClient::new("not a url"), Err(ClientError::InvalidBaseUrl(_))));
	assert!(matches!(FeedClient::new("mailto:feed@example.com"), Err(ClientError::InvalidBaseUrl(_))));
	assert!(FeedClient::new("http://localhost:3000/api/").is_ok());
}
