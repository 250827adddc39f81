use thiserror::Error;

/// Failures reported for a single search request.
///
/// Only [`FetchError::Cancelled`] is expected during normal operation; the
/// session swallows it. Every other variant is surfaced to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
	/// The request was abandoned because the session's cancellation token fired.
	#[error("request cancelled")]
	Cancelled,

	/// The API answered with a non-success HTTP status.
	#[error("search API returned HTTP {status}")]
	Status { status: u16 },

	/// The request never produced a response (DNS, connect, timeout, TLS...).
	#[error("network error: {0}")]
	Transport(String),

	/// The response body was not a valid search result document.
	#[error("malformed search response: {0}")]
	Decode(String),

	/// The background fetch worker is gone and can no longer serve requests.
	#[error("search worker stopped unexpectedly")]
	WorkerStopped,
}

impl FetchError {
	/// Whether this failure came from an intentional abort.
	#[must_use]
	pub fn is_cancelled(&self) -> bool {
		matches!(self, FetchError::Cancelled)
	}
}

impl From<reqwest::Error> for FetchError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_decode() {
			FetchError::Decode(err.to_string())
		} else if let Some(status) = err.status() {
			FetchError::Status {
				status: status.as_u16(),
			}
		} else {
			FetchError::Transport(err.to_string())
		}
	}
}

impl From<serde_json::Error> for FetchError {
	fn from(err: serde_json::Error) -> Self {
		FetchError::Decode(err.to_string())
	}
}
