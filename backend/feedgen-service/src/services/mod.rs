pub mod appview;
pub mod fetcher;

pub use appview::{AppViewClient, AuthorFeedFilter, ContentSource};
pub use fetcher::fetch_all;
