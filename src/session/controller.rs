use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use super::cancel::CancelToken;
use super::store::{ResultPage, ResultsStore};
use super::worker::{self, FetchCommand, FetchOutcome};
use crate::api::{DEFAULT_TIMEOUT, FetchError, HITS_PER_PAGE, Item, SearchBackend, SearchRequest, SearchResponse};

/// Query searched when the session starts without one.
pub const DEFAULT_QUERY: &str = "redux";

const JOIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Coarse lifecycle state of a [`SearchSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
	Idle,
	Fetching,
	/// A request failed; stays here until [`SearchSession::clear_error`].
	Failed,
}

/// Owns the query text, the accumulated results and the outstanding requests
/// for one interactive search session.
///
/// All methods are meant to be called from a single thread. Network requests
/// run on a background worker and their outcomes are applied by [`pump`] or
/// [`settle`].
///
/// [`pump`]: SearchSession::pump
/// [`settle`]: SearchSession::settle
pub struct SearchSession {
	query_text: String,
	search_key: String,
	store: ResultsStore,
	error: Option<FetchError>,
	cancel: CancelToken,
	fetch_tx: Sender<FetchCommand>,
	fetch_rx: Receiver<FetchOutcome>,
	worker: Option<JoinHandle<()>>,
	shutdown_timeout: Duration,
	in_flight: usize,
	/// In-flight request count per query.
	pending: HashMap<String, usize>,
	next_request_id: u64,
	initialized: bool,
	torn_down: bool,
}

impl SearchSession {
	/// Create a session starting from [`DEFAULT_QUERY`].
	pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
		Self::with_query(backend, DEFAULT_QUERY)
	}

	/// Create a session whose query text starts as `query`.
	pub fn with_query(backend: Arc<dyn SearchBackend>, query: impl Into<String>) -> Self {
		let cancel = CancelToken::new();
		let (fetch_tx, fetch_rx, worker) = worker::spawn(backend, cancel.clone());
		Self {
			query_text: query.into(),
			search_key: String::new(),
			store: ResultsStore::new(),
			error: None,
			cancel,
			fetch_tx,
			fetch_rx,
			worker,
			shutdown_timeout: DEFAULT_TIMEOUT,
			in_flight: 0,
			pending: HashMap::new(),
			next_request_id: 0,
			initialized: false,
			torn_down: false,
		}
	}

	/// Bound how long [`teardown`](Self::teardown) waits for the worker to
	/// exit. A request stuck in the network past this is left to finish on
	/// its own.
	#[must_use]
	pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
		self.shutdown_timeout = timeout;
		self
	}

	/// Activate the current query text and fetch its first page.
	///
	/// Only the first call has an effect.
	pub fn initialize(&mut self) -> Option<u64> {
		if self.initialized {
			return None;
		}
		self.initialized = true;
		self.search_key = self.query_text.clone();
		info!("search session started with query '{}'", self.search_key);
		let key = self.search_key.clone();
		self.fetch_page(&key, 0)
	}

	/// Whether `query` still has to be fetched, i.e. has no stored entry.
	#[must_use]
	pub fn needs_fetch(&self, query: &str) -> bool {
		!self.store.contains(query)
	}

	/// Queue a request for `page` of `query`.
	///
	/// Returns the request id, or `None` when no request was issued because
	/// the session was torn down or is showing an error.
	pub fn fetch_page(&mut self, query: &str, page: u32) -> Option<u64> {
		if self.torn_down {
			debug!("ignoring fetch for '{query}' after teardown");
			return None;
		}
		if self.error.is_some() {
			debug!("ignoring fetch for '{query}' while an error is displayed");
			return None;
		}

		self.next_request_id = self.next_request_id.saturating_add(1);
		let id = self.next_request_id;
		let request = SearchRequest {
			query: query.to_string(),
			page,
			hits_per_page: HITS_PER_PAGE,
		};

		if self.fetch_tx.send(FetchCommand::Fetch { id, request }).is_err() {
			warn!("fetch worker is gone; cannot request '{query}' page {page}");
			self.error = Some(FetchError::WorkerStopped);
			return None;
		}

		self.in_flight += 1;
		*self.pending.entry(query.to_string()).or_default() += 1;
		debug!("request {id}: '{query}' page {page}");
		Some(id)
	}

	/// Append `response` to the entry of the active search key.
	pub fn merge_page(&mut self, response: SearchResponse) {
		let key = self.search_key.clone();
		self.store.merge(&key, response);
	}

	/// Remove the hit with `object_id` from the active results.
	///
	/// Returns `false` without touching anything when the active key has no
	/// entry yet or no hit carries that id.
	pub fn dismiss(&mut self, object_id: &str) -> bool {
		let removed = self.store.dismiss(&self.search_key, object_id);
		if removed {
			debug!("dismissed {object_id} from '{}'", self.search_key);
		}
		removed
	}

	pub fn change_query_text(&mut self, text: impl Into<String>) {
		self.query_text = text.into();
	}

	/// Make the current query text the active key, fetching it if uncached.
	///
	/// While an error is displayed the active key is left alone.
	pub fn submit(&mut self) -> Option<u64> {
		if self.error.is_some() {
			debug!("ignoring submit of '{}' while an error is displayed", self.query_text);
			return None;
		}
		self.search_key = self.query_text.clone();
		if self.is_pending(&self.search_key) {
			debug!("'{}' already has a request in flight", self.search_key);
			None
		} else if self.needs_fetch(&self.search_key) {
			let key = self.search_key.clone();
			self.fetch_page(&key, 0)
		} else {
			debug!("'{}' served from cache", self.search_key);
			None
		}
	}

	/// Fetch the page after the active one.
	///
	/// Does nothing while a request for the active key is in flight, so the
	/// same page is never requested twice.
	pub fn load_more(&mut self) -> Option<u64> {
		if self.is_pending(&self.search_key) {
			debug!("load more for '{}' skipped; a request is in flight", self.search_key);
			return None;
		}
		let key = self.search_key.clone();
		let next = self.current_page().saturating_add(1);
		self.fetch_page(&key, next)
	}

	/// Leave the error state. Returns whether there was an error to clear.
	pub fn clear_error(&mut self) -> bool {
		self.error.take().is_some()
	}

	/// Cancel outstanding requests and stop the worker.
	///
	/// Outcomes that arrive afterwards are drained without effect.
	pub fn teardown(&mut self) {
		if self.torn_down {
			return;
		}
		self.torn_down = true;
		self.cancel.cancel();
		let _ = self.fetch_tx.send(FetchCommand::Shutdown);
		info!(
			"search session torn down with {} request(s) in flight",
			self.in_flight
		);
		self.join_worker();
	}

	/// Wait up to `shutdown_timeout` for the worker thread to exit.
	fn join_worker(&mut self) {
		let Some(handle) = self.worker.take() else {
			return;
		};
		let deadline = Instant::now() + self.shutdown_timeout;
		while !handle.is_finished() {
			if Instant::now() >= deadline {
				warn!(
					"fetch worker still busy after {:?}; leaving it to finish",
					self.shutdown_timeout
				);
				return;
			}
			thread::sleep(JOIN_POLL_INTERVAL);
		}
		if handle.join().is_err() {
			warn!("fetch worker panicked");
		}
	}

	fn is_pending(&self, query: &str) -> bool {
		self.pending.get(query).is_some_and(|count| *count > 0)
	}

	fn request_finished(&mut self, query: &str) {
		if let Some(count) = self.pending.get_mut(query) {
			*count = count.saturating_sub(1);
			if *count == 0 {
				self.pending.remove(query);
			}
		}
	}

	/// Apply every outcome the worker has produced so far without blocking.
	///
	/// Returns whether visible state changed.
	pub fn pump(&mut self) -> bool {
		let mut changed = false;
		loop {
			match self.fetch_rx.try_recv() {
				Ok(outcome) => changed |= self.handle_outcome(outcome),
				Err(TryRecvError::Empty) => break,
				Err(TryRecvError::Disconnected) => {
					changed |= self.worker_disconnected();
					break;
				}
			}
		}
		changed
	}

	/// Block until no request is in flight or `timeout` elapses.
	///
	/// Returns `true` when every request completed in time.
	pub fn settle(&mut self, timeout: Duration) -> bool {
		let deadline = Instant::now() + timeout;
		while self.in_flight > 0 {
			let remaining = deadline.saturating_duration_since(Instant::now());
			if remaining.is_zero() {
				return false;
			}
			match self.fetch_rx.recv_timeout(remaining) {
				Ok(outcome) => {
					self.handle_outcome(outcome);
				}
				Err(RecvTimeoutError::Timeout) => return false,
				Err(RecvTimeoutError::Disconnected) => {
					self.worker_disconnected();
				}
			}
		}
		true
	}

	fn handle_outcome(&mut self, outcome: FetchOutcome) -> bool {
		self.in_flight = self.in_flight.saturating_sub(1);
		let FetchOutcome {
			id,
			query,
			page,
			result,
		} = outcome;
		self.request_finished(&query);

		if self.cancel.is_cancelled() {
			debug!("request {id} finished after cancellation; discarded");
			return false;
		}

		match result {
			Ok(response) => {
				let fetched = response.hits.len();
				let merged = self.store.merge(&query, response);
				debug!(
					"request {id}: merged {fetched} hit(s) into '{query}' (page {}, {} total)",
					merged.page,
					merged.hits.len()
				);
				true
			}
			Err(err) if err.is_cancelled() => {
				debug!("request {id} cancelled");
				false
			}
			Err(err) => {
				warn!("request {id} for '{query}' page {page} failed: {err}");
				self.error = Some(err);
				true
			}
		}
	}

	fn worker_disconnected(&mut self) -> bool {
		let pending = std::mem::take(&mut self.in_flight);
		self.pending.clear();
		if self.torn_down || pending == 0 {
			return false;
		}
		warn!("fetch worker stopped with {pending} request(s) in flight");
		self.error = Some(FetchError::WorkerStopped);
		true
	}

	pub fn query_text(&self) -> &str {
		&self.query_text
	}

	/// The query whose results are displayed and extended by [`load_more`].
	///
	/// [`load_more`]: SearchSession::load_more
	pub fn search_key(&self) -> &str {
		&self.search_key
	}

	pub fn store(&self) -> &ResultsStore {
		&self.store
	}

	pub fn active_page(&self) -> Option<&ResultPage> {
		self.store.get(&self.search_key)
	}

	pub fn hits(&self) -> &[Item] {
		self.active_page()
			.map(|page| page.hits.as_slice())
			.unwrap_or_default()
	}

	/// Page number of the active entry, 0 when nothing was fetched yet.
	pub fn current_page(&self) -> u32 {
		self.active_page().map(|page| page.page).unwrap_or(0)
	}

	pub fn error(&self) -> Option<&FetchError> {
		self.error.as_ref()
	}

	pub fn in_flight(&self) -> usize {
		self.in_flight
	}

	pub fn is_torn_down(&self) -> bool {
		self.torn_down
	}

	pub fn status(&self) -> SessionStatus {
		if self.error.is_some() {
			SessionStatus::Failed
		} else if self.in_flight > 0 {
			SessionStatus::Fetching
		} else {
			SessionStatus::Idle
		}
	}
}

impl Drop for SearchSession {
	fn drop(&mut self) {
		self.teardown();
	}
}
