pub mod commands;
pub mod entity;

pub use entity::{NewPost, Post, PostWithStats, PostWithUser};

/// Number of latest comments embedded into each feed item.
pub const COMMENT_PREVIEW_LEN: i64 = 2;
