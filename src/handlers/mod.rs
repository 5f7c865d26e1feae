pub mod feed;

pub use feed::{get_feed, query_error_handler, FeedHandlerState, FeedQueryParams};
