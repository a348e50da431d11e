use std::net::SocketAddr;

use axum::http::{HeaderValue, Method};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feed::{bootstrap::Bootstrap, dependencies::config, routes::create_routes, services::response::ServiceError};

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
	println!("Environment Variable Is Being Set...");
	dotenv::dotenv().ok();
	let config = config()?;

	// ! Tracing
	tracing_subscriber::registry()
		.with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			// axum logs rejections from built-in extractors with the `axum::rejection`
			// target, at `TRACE` level. `axum::rejection=trace` enables showing those events
			format!("feed={0},tower_http={0},axum::rejection=trace", config.log_level).into()
		}))
		.with(tracing_subscriber::fmt::layer())
		.init();

	// ! Connection
	tracing::info!("Connections Are Being Pooled...");
	let state = Bootstrap::app_state().await?;

	let origins = config
		.allow_origins
		.split(',')
		.map(str::trim)
		.filter(|origin| !origin.is_empty())
		.filter_map(|origin| match origin.parse::<HeaderValue>() {
			Ok(origin) => Some(origin),
			Err(_) => {
				tracing::warn!(origin, "Ignoring invalid CORS origin");
				None
			}
		})
		.collect::<Vec<_>>();

	let app = create_routes(state)
		.layer(
			CorsLayer::new()
				.allow_origin(origins)
				.allow_methods([Method::GET, Method::POST, Method::DELETE])
				.allow_headers([axum::http::header::AUTHORIZATION, axum::http::header::CONTENT_TYPE]),
		)
		.layer(TraceLayer::new_for_http());

	let addr: SocketAddr = config
		.server_ip_port
		.parse()
		.map_err(|err| ServiceError::Config(format!("SERVER_IP_PORT: {err}")))?;

	tracing::info!(%addr, "Start Web Server...");
	axum::Server::bind(&addr)
		.serve(app.into_make_service())
		.await
		.map_err(|err| ServiceError::Internal(format!("server error: {err}")))
}
