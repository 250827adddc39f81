//! Search session state: accumulated results, the active query, and the
//! lifecycle of the requests issued on its behalf.

mod cancel;
mod controller;
mod store;
mod worker;

pub use cancel::CancelToken;
pub use controller::{DEFAULT_QUERY, SearchSession, SessionStatus};
pub use store::{ResultPage, ResultsStore};
