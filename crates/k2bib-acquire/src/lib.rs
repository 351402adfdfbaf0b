pub mod types;
pub mod fetch;
pub mod output;

pub use fetch::{FetchConfig, PageFetcher, PageSource};
pub use types::RawPage;
