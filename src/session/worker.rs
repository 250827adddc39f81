use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::{debug, warn};

use super::cancel::CancelToken;
use crate::api::{FetchError, SearchBackend, SearchRequest, SearchResponse};

/// Commands understood by the background fetch worker.
#[derive(Debug)]
pub(crate) enum FetchCommand {
	/// Fetch one page and report a [`FetchOutcome`] tagged with `id`.
	Fetch { id: u64, request: SearchRequest },
	/// Stop the worker thread.
	Shutdown,
}

/// Result of one fetch, sent back to the session.
#[derive(Debug)]
pub(crate) struct FetchOutcome {
	/// Identifier of the [`FetchCommand::Fetch`] that produced this outcome.
	pub(crate) id: u64,
	pub(crate) query: String,
	pub(crate) page: u32,
	pub(crate) result: Result<SearchResponse, FetchError>,
}

/// Channels and thread handle of a running fetch worker.
pub(crate) type FetchWorker = (
	Sender<FetchCommand>,
	Receiver<FetchOutcome>,
	Option<JoinHandle<()>>,
);

/// Launch the fetch worker thread and return its channels and handle.
///
/// Requests are served one at a time in the order they were sent, so outcomes
/// arrive in issue order. The handle is `None` when the thread could not be
/// spawned.
pub(crate) fn spawn(backend: Arc<dyn SearchBackend>, cancel: CancelToken) -> FetchWorker {
	let (command_tx, command_rx) = mpsc::channel();
	let (outcome_tx, outcome_rx) = mpsc::channel();

	let spawned = thread::Builder::new()
		.name("hnsearch-fetch".into())
		.spawn(move || worker_loop(backend.as_ref(), &cancel, command_rx, outcome_tx));
	// The session notices the dropped channels and reports the worker as stopped.
	let handle = match spawned {
		Ok(handle) => Some(handle),
		Err(err) => {
			warn!("failed to spawn fetch worker: {err}");
			None
		}
	};

	(command_tx, outcome_rx, handle)
}

fn worker_loop(
	backend: &dyn SearchBackend,
	cancel: &CancelToken,
	command_rx: Receiver<FetchCommand>,
	outcome_tx: Sender<FetchOutcome>,
) {
	while let Ok(command) = command_rx.recv() {
		match command {
			FetchCommand::Fetch { id, request } => {
				let outcome = run_fetch(backend, cancel, id, request);
				if outcome_tx.send(outcome).is_err() {
					break;
				}
			}
			FetchCommand::Shutdown => break,
		}
	}
	debug!("fetch worker stopped");
}

fn run_fetch(
	backend: &dyn SearchBackend,
	cancel: &CancelToken,
	id: u64,
	request: SearchRequest,
) -> FetchOutcome {
	let result = if cancel.is_cancelled() {
		Err(FetchError::Cancelled)
	} else {
		match backend.search(&request, cancel) {
			// A response that lands after cancellation is discarded.
			Ok(_) if cancel.is_cancelled() => Err(FetchError::Cancelled),
			other => other,
		}
	};

	FetchOutcome {
		id,
		query: request.query,
		page: request.page,
		result,
	}
}
