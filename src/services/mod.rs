pub mod apify_client;
pub mod crawl;
pub mod spreadsheet;

pub use apify_client::*;
pub use crawl::*;
pub use spreadsheet::*;
