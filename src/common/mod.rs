pub mod middleware_identity;
pub mod time;
