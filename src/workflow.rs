use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use hnsearch::{HnClient, SearchBackend, SearchOutcome, SearchSession, Theme};
use log::info;

use crate::cli::{OutputFormat, print_results_json, print_results_plain};
use crate::settings::ResolvedConfig;

/// Coordinates building a session and running it interactively or in print mode.
pub(crate) struct SearchWorkflow {
	session: SearchSession,
	theme: Theme,
	settle_timeout: Duration,
}

impl SearchWorkflow {
	pub(crate) fn from_config(config: ResolvedConfig) -> Result<Self> {
		let client = HnClient::new(&config.api).context("failed to build HTTP client")?;
		info!("using search API at {}", client.base_url());
		let backend: Arc<dyn SearchBackend> = Arc::new(client);
		// Requests run one at a time on the worker; allow slack over the HTTP timeout.
		let settle_timeout = config.api.timeout + Duration::from_secs(1);
		Ok(Self {
			session: SearchSession::with_query(backend, config.initial_query)
				.with_shutdown_timeout(config.api.timeout),
			theme: config.theme,
			settle_timeout,
		})
	}

	pub(crate) fn run(self) -> Result<SearchOutcome> {
		hnsearch::run(self.session, self.theme)
	}

	/// Fetch `pages` pages of the initial query and print them.
	pub(crate) fn print(mut self, pages: u32, format: OutputFormat) -> Result<()> {
		self.session.initialize();
		self.wait()?;
		for _ in 1..pages {
			if self.session.load_more().is_none() {
				break;
			}
			self.wait()?;
		}

		let query = self.session.search_key().to_string();
		let results = self.session.active_page();
		match format {
			OutputFormat::Plain => print_results_plain(&query, results),
			OutputFormat::Json => print_results_json(&query, results)?,
		}
		self.session.teardown();
		Ok(())
	}

	fn wait(&mut self) -> Result<()> {
		if !self.session.settle(self.settle_timeout) {
			bail!("timed out waiting for search results");
		}
		if let Some(err) = self.session.error() {
			bail!("search request failed: {err}");
		}
		Ok(())
	}
}
