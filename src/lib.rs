//! Core crate exports for the `hnsearch` terminal client.
//!
//! The [`session`] module holds the search state machine, [`api`] talks to the
//! Hacker News search endpoint, and [`ui`] renders a session in the terminal.

pub mod api;
pub mod app_dirs;
pub mod logging;
pub mod session;
pub mod theme;
pub mod ui;

pub use api::{ApiOptions, FetchError, HnClient, Item, SearchBackend, SearchResponse};
pub use session::{DEFAULT_QUERY, ResultPage, ResultsStore, SearchSession, SessionStatus};
pub use theme::{Theme, default_theme};
pub use ui::{App, SearchOutcome, run};
