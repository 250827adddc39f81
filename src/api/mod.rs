//! Hacker News search API access.
//!
//! The session controller only sees the [`SearchBackend`] trait; [`HnClient`]
//! is the production implementation backed by a blocking `reqwest` client.

mod client;
mod error;
mod types;

pub use client::{
	ApiOptions, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HITS_PER_PAGE, HnClient, SEARCH_PATH,
	SearchBackend,
};
pub use error::FetchError;
pub use types::{Item, SearchRequest, SearchResponse};
