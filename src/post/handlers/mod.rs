//! HTTP handlers for the posting domain
//!
//! - `posts` - post CRUD
//! - `comments` - comment create/list (alarm producer)
//! - `likes` - like create/count (alarm producer)

pub mod comments;
pub mod likes;
pub mod posts;
pub mod types;

pub use comments::{handle_comment_list, handle_post_comment};
pub use likes::{handle_like_count, handle_post_like};
pub use posts::{
    handle_my_posts, handle_post_create, handle_post_delete, handle_post_list, handle_post_modify,
};
