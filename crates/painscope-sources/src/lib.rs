//! Signal collection for painscope.
//!
//! Pulls raw pain-point text from Reddit, Hacker News and a search-engine
//! provider, normalizes it into [`Signal`](painscope_core::Signal)s, and
//! tolerates per-source failures: a source that keeps failing after its
//! bounded retries is dropped from the run and reported as a warning.

pub mod cache;
pub mod collector;
pub mod error;
pub mod hackernews;
pub mod reddit;
pub mod search;
pub mod source;

mod html;
mod http;
mod retry;

pub use cache::{load_signals, replay, save_signals};
pub use collector::{Collection, Collector, FetchPolicy};
pub use error::SourceError;
pub use hackernews::HackerNewsSource;
pub use http::build_client;
pub use reddit::RedditSource;
pub use search::{GoogleSearchClient, SearchProvider, SearchResult, SearchSource};
pub use source::SignalSource;
