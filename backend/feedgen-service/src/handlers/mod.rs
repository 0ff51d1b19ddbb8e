pub mod describe;
pub mod feed;
pub mod well_known;

pub use describe::describe_feed_generator;
pub use feed::{get_feed_skeleton, FeedHandlerState};
pub use well_known::did_document;
