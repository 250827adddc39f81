use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow, bail, ensure};
use config::{Config, ConfigError, File};
use log::LevelFilter;
use serde::Deserialize;

use hnsearch::api::{ApiOptions, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use hnsearch::theme::{self, Theme};
use hnsearch::{DEFAULT_QUERY, app_dirs, logging};

use crate::cli::CliArgs;

const ENV_PREFIX: &str = "hnsearch";
const DEFAULT_THEME: &str = "slate";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
	api: ApiSection,
	ui: UiSection,
	log: LogSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ApiSection {
	base_url: Option<String>,
	timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct UiSection {
	initial_query: Option<String>,
	theme: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LogSection {
	level: Option<String>,
}

pub(crate) struct ResolvedConfig {
	pub(crate) api: ApiOptions,
	pub(crate) initial_query: String,
	pub(crate) theme_name: String,
	pub(crate) theme: Theme,
	pub(crate) log_level: LevelFilter,
}

impl ResolvedConfig {
	pub(crate) fn print_summary(&self) {
		println!("Effective configuration:");
		println!("  API base URL: {}", self.api.base_url);
		println!("  Request timeout: {}s", self.api.timeout.as_secs());
		println!("  Initial query: {}", self.initial_query);
		println!("  UI theme: {}", self.theme_name);
		println!("  Log level: {}", self.log_level);
	}
}

pub(crate) fn load(cli: &CliArgs) -> Result<ResolvedConfig> {
	let builder = build_config(cli)?;
	let mut raw: RawConfig = builder
		.try_deserialize()
		.map_err(|err| anyhow!("failed to deserialize configuration: {err}"))?;
	raw.apply_cli_overrides(cli);
	raw.resolve()
}

fn build_config(cli: &CliArgs) -> Result<Config> {
	let mut builder = Config::builder();

	if !cli.no_config {
		for path in default_config_files() {
			builder = builder.add_source(File::from(path).required(false));
		}
	}

	for path in &cli.config {
		builder = builder.add_source(File::from(path.clone()).required(true));
	}

	builder = builder.add_source(
		config::Environment::with_prefix(ENV_PREFIX)
			.separator("__")
			.try_parsing(true),
	);

	builder.build().map_err(|err| match err {
		ConfigError::Frozen => anyhow!("configuration builder is frozen"),
		other => other.into(),
	})
}

fn default_config_files() -> Vec<PathBuf> {
	let mut files = Vec::new();

	if let Ok(dir) = app_dirs::get_config_dir() {
		files.push(dir.join("config.toml"));
	}

	if let Ok(current_dir) = env::current_dir() {
		files.push(current_dir.join(".hnsearch.toml"));
		files.push(current_dir.join("hnsearch.toml"));
	}

	files
}

impl RawConfig {
	fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(url) = cli.base_url.clone() {
			self.api.base_url = Some(url);
		}
		if let Some(secs) = cli.timeout {
			self.api.timeout_secs = Some(secs);
		}
		if let Some(query) = cli.query.clone() {
			self.ui.initial_query = Some(query);
		}
		if let Some(theme) = cli.theme.clone() {
			self.ui.theme = Some(theme);
		}
		if let Some(level) = cli.log_level.clone() {
			self.log.level = Some(level);
		}
	}

	fn resolve(self) -> Result<ResolvedConfig> {
		let base_url = match self.api.base_url {
			Some(url) => {
				let trimmed = url.trim();
				ensure!(!trimmed.is_empty(), "api.base_url must not be empty");
				trimmed.to_string()
			}
			None => DEFAULT_BASE_URL.to_string(),
		};
		let timeout = match self.api.timeout_secs {
			Some(0) => bail!("api.timeout_secs must be at least 1"),
			Some(secs) => Duration::from_secs(secs),
			None => DEFAULT_TIMEOUT,
		};

		let initial_query = self
			.ui
			.initial_query
			.unwrap_or_else(|| DEFAULT_QUERY.to_string());

		let theme_name = self
			.ui
			.theme
			.map(|name| name.trim().to_ascii_lowercase())
			.filter(|name| !name.is_empty())
			.unwrap_or_else(|| DEFAULT_THEME.to_string());
		let Some(theme) = theme::by_name(&theme_name) else {
			bail!(
				"unknown theme '{theme_name}' (available: {})",
				theme::names().join(", ")
			);
		};

		let log_level = match self.log.level {
			Some(level) => logging::parse_level(&level)?,
			None => LevelFilter::Info,
		};

		Ok(ResolvedConfig {
			api: ApiOptions { base_url, timeout },
			initial_query,
			theme_name,
			theme,
			log_level,
		})
	}
}
