use std::collections::HashMap;

use serde::Serialize;

use crate::api::{Item, SearchResponse};

/// Every hit fetched so far for one query, plus the last page number seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultPage {
	pub hits: Vec<Item>,
	pub page: u32,
}

/// Accumulated pages keyed by query, for the lifetime of a session.
#[derive(Debug, Clone, Default)]
pub struct ResultsStore {
	entries: HashMap<String, ResultPage>,
}

impl ResultsStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether `query` has an entry, regardless of how many hits it holds.
	#[must_use]
	pub fn contains(&self, query: &str) -> bool {
		self.entries.contains_key(query)
	}

	pub fn get(&self, query: &str) -> Option<&ResultPage> {
		self.entries.get(query)
	}

	/// Append a fetched page after the hits already stored for `query`.
	///
	/// No de-duplication happens here: a hit delivered twice appears twice.
	pub fn merge(&mut self, query: &str, response: SearchResponse) -> &ResultPage {
		let entry = self.entries.entry(query.to_string()).or_default();
		entry.hits.extend(response.hits);
		entry.page = response.page;
		entry
	}

	/// Remove the first hit for `query` whose id equals `object_id`.
	///
	/// Returns `false` when there is no entry for `query` or no hit matches.
	pub fn dismiss(&mut self, query: &str, object_id: &str) -> bool {
		let Some(entry) = self.entries.get_mut(query) else {
			return false;
		};
		match entry.hits.iter().position(|hit| hit.object_id == object_id) {
			Some(index) => {
				entry.hits.remove(index);
				true
			}
			None => false,
		}
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn queries(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}
}
